use crate::config::model::ConnectionParams;
use crate::engine::connections::Segment;
use crate::engine::particle::Particle;
use crate::foundation::core::{Point, Rgba8, Viewport};

/// Drawing surface the engine paints onto.
///
/// Colors arrive straight (not premultiplied) with the final alpha already applied.
pub trait Painter {
    /// Surface size in pixels.
    fn size(&self) -> Viewport;

    /// Erase the whole surface.
    fn clear(&mut self);

    /// Blend `color` over the whole surface.
    fn fill_surface(&mut self, color: Rgba8);

    /// Fill a disc.
    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8);

    /// Draw a straight line of `width` pixels.
    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8);
}

/// Clear `painter`, then draw every particle, then every connection line.
///
/// Positions are taken as surface pixels (x, y); z is ignored.
pub fn paint_immediate(
    painter: &mut dyn Painter,
    particles: &[Particle],
    segments: &[Segment],
    lines: &ConnectionParams,
) {
    painter.clear();
    paint_planar(painter, particles, segments, lines, 0.0);
}

/// Opacity of a glow halo relative to its particle.
const GLOW_ALPHA: f64 = 0.25;

/// [`paint_immediate`] without the clear, for stacking several particle sets.
///
/// With `glow > 0` each disc sits on a fainter halo of radius `size * (1 + glow)`.
pub(crate) fn paint_planar(
    painter: &mut dyn Painter,
    particles: &[Particle],
    segments: &[Segment],
    lines: &ConnectionParams,
    glow: f64,
) {
    for p in particles {
        let alpha = p.paint_alpha();
        if alpha <= 0.0 || p.size <= 0.0 {
            continue;
        }
        let center = p.position.xy();
        if glow > 0.0 {
            painter.fill_circle(
                center,
                p.size * (1.0 + glow),
                p.color.with_opacity(alpha * GLOW_ALPHA),
            );
        }
        painter.fill_circle(center, p.size, p.color.with_opacity(alpha));
    }

    // Lines go in a second pass so they sit on top of every disc.
    for seg in segments {
        painter.stroke_line(
            seg.a.xy(),
            seg.b.xy(),
            lines.line_width,
            lines.color.with_opacity(seg.opacity),
        );
    }
}

/// One recorded [`Painter`] call.
#[derive(Clone, Debug, PartialEq)]
pub enum DrawCmd {
    /// [`Painter::clear`].
    Clear,
    /// [`Painter::fill_surface`].
    Fill {
        /// Wash color.
        color: Rgba8,
    },
    /// [`Painter::fill_circle`].
    Circle {
        /// Disc center.
        center: Point,
        /// Disc radius.
        radius: f64,
        /// Fill color.
        color: Rgba8,
    },
    /// [`Painter::stroke_line`].
    Line {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Line width.
        width: f64,
        /// Stroke color.
        color: Rgba8,
    },
}

/// [`Painter`] that only records calls.
#[derive(Clone, Debug)]
pub struct RecordingPainter {
    size: Viewport,
    /// Calls in order.
    pub commands: Vec<DrawCmd>,
}

impl RecordingPainter {
    /// Recorder reporting `size` as its surface.
    pub fn new(size: Viewport) -> Self {
        Self {
            size,
            commands: Vec::new(),
        }
    }

    /// Number of recorded circles.
    pub fn circles(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Circle { .. }))
            .count()
    }

    /// Number of recorded lines.
    pub fn lines(&self) -> usize {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCmd::Line { .. }))
            .count()
    }
}

impl Painter for RecordingPainter {
    fn size(&self) -> Viewport {
        self.size
    }

    fn clear(&mut self) {
        self.commands.push(DrawCmd::Clear);
    }

    fn fill_surface(&mut self, color: Rgba8) {
        self.commands.push(DrawCmd::Fill { color });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        self.commands.push(DrawCmd::Circle {
            center,
            radius,
            color,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) {
        self.commands.push(DrawCmd::Line {
            from,
            to,
            width,
            color,
        });
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/immediate.rs"]
mod tests;
