use crate::foundation::core::{Point, Vec3, Viewport};

/// Nearest camera-space depth that is still drawn.
const NEAR: f64 = 0.1;

/// Perspective camera on the +z axis looking at the origin.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PerspectiveCamera {
    /// Distance from the origin along +z.
    pub distance: f64,
    /// Vertical field of view in degrees.
    pub fov_y_deg: f64,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self {
            distance: 5.0,
            fov_y_deg: 75.0,
        }
    }
}

/// A world point mapped onto the surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    /// Surface position in pixels.
    pub point: Point,
    /// Pixels per world unit at the point's depth.
    pub scale: f64,
}

impl PerspectiveCamera {
    fn focal(&self) -> f64 {
        1.0 / (self.fov_y_deg.to_radians() * 0.5).tan()
    }

    /// Project `p` after rotating the scene by `(pitch, yaw)`; `None` behind the camera.
    pub fn project(&self, p: Vec3, rotation: (f64, f64), viewport: Viewport) -> Option<Projected> {
        let r = rotate(p, rotation);
        let depth = self.distance - r.z;
        if depth.is_nan() || depth <= NEAR || !viewport.is_drawable() {
            return None;
        }
        let f = self.focal();
        let ndc_x = r.x * f / viewport.aspect() / depth;
        let ndc_y = r.y * f / depth;
        let point = Point::new(
            (ndc_x + 1.0) * 0.5 * viewport.width,
            (1.0 - ndc_y) * 0.5 * viewport.height,
        );
        let scale = f * viewport.height * 0.5 / depth;
        (point.is_finite() && scale.is_finite()).then_some(Projected { point, scale })
    }

    /// Map a surface pixel onto the `z = 0` world plane.
    pub fn unproject_to_plane(&self, screen: Point, viewport: Viewport) -> Vec3 {
        if !viewport.is_drawable() {
            return Vec3::ZERO;
        }
        let ndc_x = screen.x / viewport.width * 2.0 - 1.0;
        let ndc_y = 1.0 - screen.y / viewport.height * 2.0;
        let half_h = self.distance / self.focal();
        Vec3::new(ndc_x * half_h * viewport.aspect(), ndc_y * half_h, 0.0)
    }
}

/// Yaw around y, then pitch around x.
fn rotate(p: Vec3, (pitch, yaw): (f64, f64)) -> Vec3 {
    let (sy, cy) = yaw.sin_cos();
    let yawed = Vec3::new(p.x * cy + p.z * sy, p.y, -p.x * sy + p.z * cy);
    let (sp, cp) = pitch.sin_cos();
    Vec3::new(
        yawed.x,
        yawed.y * cp - yawed.z * sp,
        yawed.y * sp + yawed.z * cp,
    )
}
