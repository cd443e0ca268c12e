use vello_cpu::kurbo::{BezPath, Circle, Shape};

use crate::foundation::core::{Point, Rgba8, Viewport};
use crate::foundation::error::{BackdropError, BackdropResult};
use crate::render::immediate::Painter;

/// Curve flattening tolerance in pixels.
const TOLERANCE: f64 = 0.1;

/// One rendered frame.
#[derive(Clone, Debug)]
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied: bool,
}

impl FrameRGBA {
    /// Convert to straight alpha, as PNG encoders expect.
    pub fn into_straight(mut self) -> Self {
        if self.premultiplied {
            unpremultiply_in_place(&mut self.data);
            self.premultiplied = false;
        }
        self
    }

    /// RGBA bytes of the pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        self.data.get(i..i + 4)?.try_into().ok()
    }
}

/// [`Painter`] that rasterizes on the CPU with `vello_cpu`.
///
/// Draw calls are recorded into a render context; [`CpuPainter::finish`] rasterizes them.
pub struct CpuPainter {
    width: u16,
    height: u16,
    background: Rgba8,
    ctx: vello_cpu::RenderContext,
}

impl std::fmt::Debug for CpuPainter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CpuPainter")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .finish_non_exhaustive()
    }
}

impl CpuPainter {
    /// Transparent surface of `width × height` pixels.
    pub fn new(width: u32, height: u32) -> BackdropResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| BackdropError::render("surface width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| BackdropError::render("surface height exceeds u16"))?;
        if w == 0 || h == 0 {
            return Err(BackdropError::render("surface must be at least 1x1"));
        }
        Ok(Self {
            width: w,
            height: h,
            background: Rgba8 {
                r: 0,
                g: 0,
                b: 0,
                a: 0,
            },
            ctx: vello_cpu::RenderContext::new(w, h),
        })
    }

    /// Use `background` instead of transparency on [`Painter::clear`].
    pub fn with_background(mut self, background: Rgba8) -> Self {
        self.background = background;
        self
    }

    /// Rasterize everything drawn since the last clear.
    pub fn finish(&mut self) -> FrameRGBA {
        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut pixmap);
        FrameRGBA {
            width: u32::from(self.width),
            height: u32::from(self.height),
            data: pixmap.data_as_u8_slice().to_vec(),
            premultiplied: true,
        }
    }

    fn set_color(&mut self, c: Rgba8) {
        self.ctx
            .set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
    }
}

impl Painter for CpuPainter {
    fn size(&self) -> Viewport {
        Viewport::new(f64::from(self.width), f64::from(self.height))
    }

    fn clear(&mut self) {
        self.ctx = vello_cpu::RenderContext::new(self.width, self.height);
        self.fill_surface(self.background);
    }

    fn fill_surface(&mut self, color: Rgba8) {
        if color.a == 0 {
            return;
        }
        self.set_color(color);
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Rgba8) {
        if color.a == 0 || !(radius > 0.0 && radius.is_finite()) || !center.is_finite() {
            return;
        }
        self.set_color(color);
        let circle = Circle::new(vello_cpu::kurbo::Point::new(center.x, center.y), radius);
        self.ctx.fill_path(&circle.to_path(TOLERANCE));
    }

    fn stroke_line(&mut self, from: Point, to: Point, width: f64, color: Rgba8) {
        if color.a == 0 || !(width > 0.0 && width.is_finite()) {
            return;
        }
        let Some(quad) = line_quad(from, to, width) else {
            return;
        };
        self.set_color(color);
        self.ctx.fill_path(&quad);
    }
}

/// Rectangle of `width` around the segment `from → to`, as a fillable path.
fn line_quad(from: Point, to: Point, width: f64) -> Option<BezPath> {
    let d = to - from;
    let len = d.hypot();
    if !(len > 0.0 && len.is_finite()) {
        return None;
    }
    let half = width * 0.5;
    let (nx, ny) = (-d.y / len * half, d.x / len * half);
    let p = |x: f64, y: f64| vello_cpu::kurbo::Point::new(x, y);

    let mut path = BezPath::new();
    path.move_to(p(from.x + nx, from.y + ny));
    path.line_to(p(to.x + nx, to.y + ny));
    path.line_to(p(to.x - nx, to.y - ny));
    path.line_to(p(from.x - nx, from.y - ny));
    path.close_path();
    Some(path)
}

fn unpremultiply_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[..3].fill(0);
            continue;
        }
        for c in &mut px[..3] {
            *c = ((u16::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
