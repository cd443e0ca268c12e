use std::ops::{Add, AddAssign, Mul, MulAssign, Neg, Sub};

use crate::foundation::error::{BackdropError, BackdropResult};

pub use kurbo::{Point, Vec2};

/// Three-component vector used for particle positions and velocities.
///
/// Planar particle sets keep `z` pinned to their bounds, so one type serves both 2D canvas
/// fields and 3D point clouds.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f64,
    /// Y component (screen-down for planar sets, world-up for spatial sets).
    pub y: f64,
    /// Z component.
    pub z: f64,
}

impl Vec3 {
    /// All components zero.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);

    /// Build a vector from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Build a vector on the `z = 0` plane.
    pub const fn planar(x: f64, y: f64) -> Self {
        Self { x, y, z: 0.0 }
    }

    /// Euclidean length.
    pub fn length(self) -> f64 {
        self.length_squared().sqrt()
    }

    /// Squared Euclidean length.
    pub fn length_squared(self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Distance to `other`.
    pub fn distance(self, other: Self) -> f64 {
        (self - other).length()
    }

    /// Distance to `other` ignoring the z component.
    pub fn distance_xy(self, other: Self) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// `true` when every component is finite.
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Read one component.
    pub fn get(self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Mutable access to one component.
    pub fn get_mut(&mut self, axis: Axis) -> &mut f64 {
        match axis {
            Axis::X => &mut self.x,
            Axis::Y => &mut self.y,
            Axis::Z => &mut self.z,
        }
    }

    /// Drop the z component.
    pub fn xy(self) -> Point {
        Point::new(self.x, self.y)
    }
}

impl Add for Vec3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl AddAssign for Vec3 {
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl Sub for Vec3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Vec3 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl MulAssign<f64> for Vec3 {
    fn mul_assign(&mut self, rhs: f64) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl Neg for Vec3 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }
}

/// One coordinate axis.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
    /// Depth axis.
    Z,
}

/// Dimensionality of a particle set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimensions {
    /// Two coordinates; drawn directly on a 2D canvas in pixel units.
    #[default]
    Planar,
    /// Three coordinates; drawn through a perspective camera in world units.
    Spatial,
}

impl Dimensions {
    /// Axes that move and obey the boundary policy.
    pub fn axes(self) -> &'static [Axis] {
        match self {
            Self::Planar => &[Axis::X, Axis::Y],
            Self::Spatial => &[Axis::X, Axis::Y, Axis::Z],
        }
    }
}

/// Axis-aligned box that particles live in.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Bounds {
    /// Inclusive lower corner.
    pub min: Vec3,
    /// Inclusive upper corner.
    pub max: Vec3,
}

impl Bounds {
    /// Build bounds from corners.
    pub const fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Pixel-space bounds `[0,width]×[0,height]` on the `z = 0` plane.
    pub fn planar(width: f64, height: f64) -> Self {
        Self {
            min: Vec3::ZERO,
            max: Vec3::planar(width, height),
        }
    }

    /// Box centered on the origin with the given half extents.
    pub fn centered(half_x: f64, half_y: f64, half_z: f64) -> Self {
        Self {
            min: Vec3::new(-half_x, -half_y, -half_z),
            max: Vec3::new(half_x, half_y, half_z),
        }
    }

    /// Cube centered on the origin.
    pub fn cube(half: f64) -> Self {
        Self::centered(half, half, half)
    }

    /// `max - min` along `axis`.
    pub fn extent(&self, axis: Axis) -> f64 {
        self.max.get(axis) - self.min.get(axis)
    }

    /// `true` when `p` lies inside (inclusive) on every axis of `dims`.
    pub fn contains(&self, p: Vec3, dims: Dimensions) -> bool {
        dims.axes().iter().all(|&axis| {
            let v = p.get(axis);
            v >= self.min.get(axis) && v <= self.max.get(axis)
        })
    }

    /// Copy with every axis ordered so that `min <= max`.
    pub fn normalized(self) -> Self {
        Self {
            min: Vec3::new(
                self.min.x.min(self.max.x),
                self.min.y.min(self.max.y),
                self.min.z.min(self.max.z),
            ),
            max: Vec3::new(
                self.min.x.max(self.max.x),
                self.min.y.max(self.max.y),
                self.min.z.max(self.max.z),
            ),
        }
    }

    /// `true` when every corner component is finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }
}

/// Drawable area of the host surface in pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    /// Width in pixels.
    pub width: f64,
    /// Height in pixels.
    pub height: f64,
}

impl Viewport {
    /// Build a viewport.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Width over height, `1.0` for degenerate sizes.
    pub fn aspect(self) -> f64 {
        if self.height > 0.0 && self.width.is_finite() && self.height.is_finite() {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// `true` for a finite, non-empty area.
    pub fn is_drawable(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Straight (non-premultiplied) RGBA8 color.
///
/// Serialized as a hex string (`#rrggbb`, `#rgb` or `#rrggbbaa`).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgba8 {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Rgba8 {
    /// Opaque color from components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Parse `#rrggbb`, `#rgb` or `#rrggbbaa` (leading `#` optional).
    pub fn from_hex(s: &str) -> BackdropResult<Self> {
        let hex = s.trim().trim_start_matches('#');
        let bad = || BackdropError::validation(format!("invalid hex color '{s}'"));
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                let nib = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| bad())
                };
                Ok(Self::rgb(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Self::rgb(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Self {
                r: byte(0)?,
                g: byte(2)?,
                b: byte(4)?,
                a: byte(6)?,
            }),
            _ => Err(bad()),
        }
    }

    /// Lowercase `#rrggbb` (or `#rrggbbaa` when not opaque).
    pub fn to_hex(self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }

    /// Copy with alpha scaled by `opacity` in `[0, 1]`.
    pub fn with_opacity(self, opacity: f64) -> Self {
        let o = if opacity.is_finite() {
            opacity.clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            a: (f64::from(self.a) * o).round() as u8,
            ..self
        }
    }

    /// Components as normalized floats `[r, g, b]`.
    pub fn rgb_f32(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

impl TryFrom<String> for Rgba8 {
    type Error = BackdropError;

    fn try_from(value: String) -> BackdropResult<Self> {
        Self::from_hex(&value)
    }
}

impl From<Rgba8> for String {
    fn from(value: Rgba8) -> Self {
        value.to_hex()
    }
}

/// Closed interval used for randomized particle attributes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ValueRange {
    /// Lower end.
    pub min: f64,
    /// Upper end.
    pub max: f64,
}

impl ValueRange {
    /// Build a range.
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Degenerate range holding one value.
    pub const fn fixed(v: f64) -> Self {
        Self { min: v, max: v }
    }

    /// `true` when both ends are finite and ordered.
    pub fn is_valid(self) -> bool {
        self.min.is_finite() && self.max.is_finite() && self.min <= self.max
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
