use crate::config::model::ConnectionParams;
use crate::engine::connections::Segment;
use crate::engine::particle::ParticleStore;
use crate::foundation::core::{Rgba8, Vec3};
use crate::render::camera::PerspectiveCamera;
use crate::render::immediate::Painter;

/// Smallest on-screen radius a projected point is drawn with.
const MIN_POINT_RADIUS: f64 = 0.5;

/// Flat `f32` buffers mirroring a particle store, in the layout a GPU point list expects.
///
/// Positions (stride 3) and connection lines (stride 6) are rewritten in place on every
/// [`PointCloud::sync`]. Colors (stride 3) and sizes are written only when the store has been
/// regenerated since the previous sync.
#[derive(Clone, Debug, Default)]
pub struct PointCloud {
    positions: Vec<f32>,
    colors: Vec<f32>,
    sizes: Vec<f32>,
    line_positions: Vec<f32>,
    line_opacity: Vec<f32>,
    generation: Option<u64>,
    color_writes: u64,
    needs_update: bool,
}

impl PointCloud {
    /// Empty cloud.
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy the store (and its connection lines) into the buffers and flag them dirty.
    pub fn sync(&mut self, store: &ParticleStore, segments: &[Segment]) {
        let particles = store.as_slice();

        if self.generation != Some(store.generation()) {
            self.colors.clear();
            self.sizes.clear();
            for p in particles {
                self.colors.extend_from_slice(&p.color.rgb_f32());
                self.sizes.push(p.size as f32);
            }
            self.positions.resize(particles.len() * 3, 0.0);
            self.generation = Some(store.generation());
            self.color_writes += 1;
        }

        for (dst, p) in self.positions.chunks_exact_mut(3).zip(particles) {
            dst[0] = p.position.x as f32;
            dst[1] = p.position.y as f32;
            dst[2] = p.position.z as f32;
        }

        self.line_positions.clear();
        self.line_opacity.clear();
        for seg in segments {
            self.line_positions.extend_from_slice(&[
                seg.a.x as f32,
                seg.a.y as f32,
                seg.a.z as f32,
                seg.b.x as f32,
                seg.b.y as f32,
                seg.b.z as f32,
            ]);
            self.line_opacity.push(seg.opacity as f32);
        }

        self.needs_update = true;
    }

    /// Read and reset the dirty flag.
    pub fn take_needs_update(&mut self) -> bool {
        std::mem::take(&mut self.needs_update)
    }

    /// Dirty flag without resetting it.
    pub fn needs_update(&self) -> bool {
        self.needs_update
    }

    /// How many times the color buffer has been (re)written.
    pub fn color_writes(&self) -> u64 {
        self.color_writes
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.positions.len() / 3
    }

    /// `true` when the cloud holds no points.
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Interleaved `x, y, z` positions.
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    /// Interleaved `r, g, b` colors in `[0, 1]`.
    pub fn colors(&self) -> &[f32] {
        &self.colors
    }

    /// Line endpoints, six floats per line.
    pub fn line_positions(&self) -> &[f32] {
        &self.line_positions
    }

    /// Draw the cloud through `camera` with the scene rotated by `rotation` (pitch, yaw).
    ///
    /// Does not clear the surface.
    pub fn draw(
        &self,
        painter: &mut dyn Painter,
        camera: &PerspectiveCamera,
        rotation: (f64, f64),
        point_opacity: f64,
        lines: &ConnectionParams,
    ) {
        let viewport = painter.size();

        for ((pos, rgb), size) in self
            .positions
            .chunks_exact(3)
            .zip(self.colors.chunks_exact(3))
            .zip(&self.sizes)
        {
            let Some(proj) = camera.project(vec3(pos), rotation, viewport) else {
                continue;
            };
            let radius = (f64::from(*size) * proj.scale * 0.5).max(MIN_POINT_RADIUS);
            painter.fill_circle(proj.point, radius, color(rgb).with_opacity(point_opacity));
        }

        for (ends, opacity) in self
            .line_positions
            .chunks_exact(6)
            .zip(&self.line_opacity)
        {
            let a = camera.project(vec3(&ends[..3]), rotation, viewport);
            let b = camera.project(vec3(&ends[3..]), rotation, viewport);
            if let (Some(a), Some(b)) = (a, b) {
                painter.stroke_line(
                    a.point,
                    b.point,
                    lines.line_width,
                    lines.color.with_opacity(f64::from(*opacity)),
                );
            }
        }
    }
}

fn vec3(xyz: &[f32]) -> Vec3 {
    Vec3::new(f64::from(xyz[0]), f64::from(xyz[1]), f64::from(xyz[2]))
}

fn color(rgb: &[f32]) -> Rgba8 {
    let c = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
    Rgba8::rgb(c(rgb[0]), c(rgb[1]), c(rgb[2]))
}

#[cfg(test)]
#[path = "../../tests/unit/render/retained.rs"]
mod tests;
