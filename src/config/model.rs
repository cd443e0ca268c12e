use crate::foundation::core::{Bounds, Dimensions, Rgba8, ValueRange};
use crate::foundation::error::{BackdropError, BackdropResult};
use crate::foundation::math::finite_or;

/// Palette used when a configuration arrives without colors.
pub const DEFAULT_PALETTE: [Rgba8; 4] = [
    Rgba8::rgb(0x06, 0xb6, 0xd4),
    Rgba8::rgb(0x8b, 0x5c, 0xf6),
    Rgba8::rgb(0x10, 0xb9, 0x81),
    Rgba8::rgb(0xf5, 0x9e, 0x0b),
];

/// What happens when a particle reaches the edge of its bounds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryPolicy {
    /// Leave through one side, re-enter through the opposite side.
    #[default]
    Wrap,
    /// Reflect off the edge, losing energy per [`ParticleConfig::restitution`].
    Bounce,
}

/// Direction of the pointer impulse.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerResponse {
    /// Push particles away from the pointer.
    #[default]
    Repel,
    /// Pull particles towards the pointer.
    Attract,
}

/// Pointer interaction tuning.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InteractionParams {
    /// Interaction radius `R`; particles at or beyond it are unaffected.
    pub radius: f64,
    /// Impulse added at distance zero; scaled by `(R - d) / R`.
    pub strength: f64,
    /// Push or pull.
    pub response: PointerResponse,
    /// Measure distance on x/y only (pointer lives on the screen plane).
    pub planar_distance: bool,
}

impl Default for InteractionParams {
    fn default() -> Self {
        Self {
            radius: 150.0,
            strength: 0.01,
            response: PointerResponse::Repel,
            planar_distance: false,
        }
    }
}

/// Secondary vertical sway: `y += amplitude * sin(clock * speed * frequency + index * phase_step)`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DriftParams {
    /// Peak vertical offset per frame.
    pub amplitude: f64,
    /// Angular frequency applied to the clock.
    pub frequency: f64,
    /// Phase offset between consecutive particle indices.
    pub phase_step: f64,
}

impl Default for DriftParams {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            frequency: 1.0,
            phase_step: 1.0,
        }
    }
}

/// How connection lines are searched for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionStrategy {
    /// Check every pair.
    BruteForce,
    /// Bucket particles into a uniform grid with cell size equal to the threshold.
    Grid,
    /// Brute force for small sets, grid above [`crate::GRID_THRESHOLD`] particles.
    #[default]
    Auto,
}

/// Connection-line tuning.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ConnectionParams {
    /// Pairs closer than this are connected.
    pub max_distance: f64,
    /// Opacity of a zero-length line; fades linearly to 0 at `max_distance`.
    pub max_opacity: f64,
    /// Stroke width in pixels.
    pub line_width: f64,
    /// Stroke color.
    pub color: Rgba8,
    /// Pair search strategy.
    pub strategy: ConnectionStrategy,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self {
            max_distance: 100.0,
            max_opacity: 0.2,
            line_width: 0.5,
            color: Rgba8::rgb(6, 182, 212),
            strategy: ConnectionStrategy::Auto,
        }
    }
}

/// Slow whole-scene rotation applied by the retained renderer.
///
/// `pitch = sin(t * pitch_rate) * pitch_amplitude`, `yaw = t * yaw_rate`, with `t = clock * speed`.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SceneSpin {
    /// Peak rotation around x in radians.
    pub pitch_amplitude: f64,
    /// Frequency of the x oscillation.
    pub pitch_rate: f64,
    /// Rotation speed around y in radians per clock unit.
    pub yaw_rate: f64,
}

impl SceneSpin {
    /// `(pitch, yaw)` in radians at `t`.
    pub fn angles(&self, t: f64) -> (f64, f64) {
        (
            (t * self.pitch_rate).sin() * self.pitch_amplitude,
            t * self.yaw_rate,
        )
    }
}

/// Configuration of one continuous particle set.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    /// Number of particles; negative values in JSON clamp to 0.
    #[serde(deserialize_with = "de_count")]
    pub count: usize,
    /// Multiplier on initial velocity and on the ambient clock.
    pub speed: f64,
    /// Palette particles draw their color from.
    pub colors: Vec<Rgba8>,
    /// Enables the pointer impulse.
    pub mouse_interaction: bool,
    /// Enables the connection-line pass.
    pub connection_lines: bool,
    /// Edge behavior.
    pub boundary_policy: BoundaryPolicy,
    /// 2D canvas or 3D point cloud.
    pub dimensions: Dimensions,
    /// Domain particles live in.
    pub bounds: Bounds,
    /// Planar only: bounds follow the viewport and the store reseeds on resize.
    pub fit_to_viewport: bool,
    /// Half-range of each initial velocity component before `speed` scaling.
    pub initial_velocity: f64,
    /// Per-step velocity multiplier.
    pub damping: f64,
    /// Velocity multiplier applied on a bounce.
    pub restitution: f64,
    /// Pointer interaction tuning.
    pub interaction: InteractionParams,
    /// Vertical sway tuning.
    pub drift: DriftParams,
    /// Connection-line tuning.
    pub connections: ConnectionParams,
    /// Particle radius range (pixels for planar sets, world units for spatial sets).
    pub size: ValueRange,
    /// Per-particle alpha range.
    pub alpha: ValueRange,
    /// Material opacity multiplied into every particle's alpha.
    pub point_opacity: f64,
    /// Retained-mode scene rotation.
    pub spin: SceneSpin,
    /// Planar only: halo radius as a multiple of particle size, 0 for none.
    pub glow: f64,
    /// Translucent color washed over the surface before this set paints.
    pub backdrop: Option<Rgba8>,
    /// Fixed random seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 120,
            speed: 1.0,
            colors: DEFAULT_PALETTE.to_vec(),
            mouse_interaction: true,
            connection_lines: true,
            boundary_policy: BoundaryPolicy::Wrap,
            dimensions: Dimensions::Planar,
            bounds: Bounds::planar(800.0, 600.0),
            fit_to_viewport: true,
            initial_velocity: 0.25,
            damping: 0.99,
            restitution: 0.8,
            interaction: InteractionParams::default(),
            drift: DriftParams::default(),
            connections: ConnectionParams::default(),
            size: ValueRange::new(1.0, 3.0),
            alpha: ValueRange::new(0.3, 0.8),
            point_opacity: 1.0,
            spin: SceneSpin::default(),
            glow: 0.0,
            backdrop: None,
            seed: None,
        }
    }
}

fn de_count<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = <i64 as serde::Deserialize>::deserialize(deserializer)?;
    Ok(usize::try_from(raw.max(0)).unwrap_or(usize::MAX))
}

impl ParticleConfig {
    /// Parse JSON and clamp anything out of range (see [`ParticleConfig::sanitized`]).
    pub fn from_json(json: &str) -> BackdropResult<Self> {
        let cfg: Self = serde_json::from_str(json)?;
        Ok(cfg.sanitized())
    }

    /// Strict check; reports the first field [`ParticleConfig::sanitized`] would have to change.
    pub fn validate(&self) -> BackdropResult<()> {
        if self.colors.is_empty() {
            return Err(BackdropError::validation("colors must not be empty"));
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            return Err(BackdropError::validation("speed must be finite and >= 0"));
        }
        if !self.bounds.is_finite() {
            return Err(BackdropError::validation("bounds must be finite"));
        }
        if self.bounds.normalized() != self.bounds {
            return Err(BackdropError::validation("bounds min must be <= max"));
        }
        if !(0.0..=1.0).contains(&self.damping) {
            return Err(BackdropError::validation("damping must be within [0, 1]"));
        }
        if !(0.0..=1.0).contains(&self.restitution) {
            return Err(BackdropError::validation("restitution must be within [0, 1]"));
        }
        if !self.interaction.radius.is_finite() || self.interaction.radius < 0.0 {
            return Err(BackdropError::validation(
                "interaction.radius must be finite and >= 0",
            ));
        }
        if !self.interaction.strength.is_finite() {
            return Err(BackdropError::validation(
                "interaction.strength must be finite",
            ));
        }
        if !self.connections.max_distance.is_finite() || self.connections.max_distance < 0.0 {
            return Err(BackdropError::validation(
                "connections.max_distance must be finite and >= 0",
            ));
        }
        if !self.size.is_valid() || self.size.min < 0.0 {
            return Err(BackdropError::validation("size must be an ordered, non-negative range"));
        }
        if !self.alpha.is_valid() {
            return Err(BackdropError::validation("alpha must be an ordered range"));
        }
        if !self.glow.is_finite() || self.glow < 0.0 {
            return Err(BackdropError::validation("glow must be finite and >= 0"));
        }
        if self.fit_to_viewport && self.dimensions == Dimensions::Spatial {
            return Err(BackdropError::config(
                "fit_to_viewport only applies to planar particle sets",
            ));
        }
        Ok(())
    }

    /// Copy with every out-of-range field clamped to a safe value.
    ///
    /// Decoration must never break the page, so nothing here is fatal.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.colors.is_empty() {
            tracing::warn!("empty palette, using default colors");
            self.colors = DEFAULT_PALETTE.to_vec();
        }
        if !self.speed.is_finite() || self.speed < 0.0 {
            tracing::warn!(speed = self.speed, "invalid speed, using 1.0");
            self.speed = 1.0;
        }
        if !self.bounds.is_finite() {
            tracing::warn!("non-finite bounds, using defaults");
            self.bounds = defaults.bounds;
        } else if self.bounds.normalized() != self.bounds {
            tracing::warn!("inverted bounds, swapping min and max");
            self.bounds = self.bounds.normalized();
        }
        self.initial_velocity = finite_or(self.initial_velocity, defaults.initial_velocity).abs();

        let damping = finite_or(self.damping, defaults.damping).clamp(0.0, 1.0);
        if damping != self.damping {
            tracing::warn!(damping = self.damping, clamped = damping, "damping clamped");
            self.damping = damping;
        }
        let restitution = finite_or(self.restitution, defaults.restitution).clamp(0.0, 1.0);
        if restitution != self.restitution {
            tracing::warn!(
                restitution = self.restitution,
                clamped = restitution,
                "restitution clamped"
            );
            self.restitution = restitution;
        }

        self.interaction.radius = finite_or(self.interaction.radius, 0.0).max(0.0);
        self.interaction.strength = finite_or(self.interaction.strength, 0.0);
        self.drift.amplitude = finite_or(self.drift.amplitude, 0.0);
        self.drift.frequency = finite_or(self.drift.frequency, 0.0);
        self.drift.phase_step = finite_or(self.drift.phase_step, 0.0);
        self.connections.max_distance = finite_or(self.connections.max_distance, 0.0).max(0.0);
        self.connections.max_opacity = finite_or(self.connections.max_opacity, 0.0).clamp(0.0, 1.0);
        self.connections.line_width = finite_or(self.connections.line_width, 0.5).max(0.0);
        self.point_opacity = finite_or(self.point_opacity, 1.0).clamp(0.0, 1.0);
        self.glow = finite_or(self.glow, 0.0).max(0.0);

        if !self.size.is_valid() || self.size.min < 0.0 {
            tracing::warn!("invalid size range, using defaults");
            self.size = defaults.size;
        }
        if !self.alpha.is_valid() {
            tracing::warn!("invalid alpha range, using defaults");
            self.alpha = defaults.alpha;
        }
        self.alpha.min = self.alpha.min.clamp(0.0, 1.0);
        self.alpha.max = self.alpha.max.clamp(0.0, 1.0);

        if self.fit_to_viewport && self.dimensions == Dimensions::Spatial {
            tracing::warn!("fit_to_viewport ignored for spatial particle sets");
            self.fit_to_viewport = false;
        }
        if self.dimensions == Dimensions::Planar {
            self.bounds.max.z = self.bounds.min.z;
        }
        self
    }

    /// `true` when switching from `self` to `next` requires regenerating the particle store.
    pub fn needs_respawn(&self, next: &Self) -> bool {
        self.count != next.count
            || self.colors != next.colors
            || self.speed != next.speed
            || self.dimensions != next.dimensions
            || self.bounds != next.bounds
            || self.initial_velocity != next.initial_velocity
            || self.size != next.size
            || self.alpha != next.alpha
            || self.seed != next.seed
    }

    /// Copy with `count` scaled by `factor` (rounded down).
    pub fn with_count_scaled(mut self, factor: f64) -> Self {
        self.count = (self.count as f64 * finite_or(factor, 1.0).max(0.0)).floor() as usize;
        self
    }
}

/// Configuration of a one-shot explosion burst.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct ExplosionConfig {
    /// Particles emitted per trigger.
    #[serde(deserialize_with = "de_count")]
    pub particle_count: usize,
    /// Palette particles draw their color from.
    pub colors: Vec<Rgba8>,
    /// Initial speed range in pixels per frame.
    pub speed: ValueRange,
    /// Lifetime range in frames.
    pub life_frames: ValueRange,
    /// Diameter range in pixels; particles paint with half of it as radius.
    pub size: ValueRange,
    /// Random angle added to each evenly spaced emission angle.
    pub angle_jitter: f64,
    /// Per-frame velocity multiplier.
    pub drag: f64,
    /// Added to vertical velocity every frame (screen-down).
    pub gravity: f64,
    /// Fixed random seed; `None` draws from entropy.
    pub seed: Option<u64>,
}

impl Default for ExplosionConfig {
    fn default() -> Self {
        Self {
            particle_count: 30,
            colors: vec![
                Rgba8::rgb(0xff, 0x6b, 0x6b),
                Rgba8::rgb(0xff, 0xd9, 0x3d),
                Rgba8::rgb(0x6b, 0xcf, 0x7f),
                Rgba8::rgb(0x4e, 0xcd, 0xc4),
                Rgba8::rgb(0x45, 0xb7, 0xd1),
            ],
            speed: ValueRange::new(2.0, 10.0),
            life_frames: ValueRange::new(30.0, 90.0),
            size: ValueRange::new(2.0, 8.0),
            angle_jitter: 0.5,
            drag: 0.98,
            gravity: 0.1,
            seed: None,
        }
    }
}

impl ExplosionConfig {
    /// Copy with every out-of-range field clamped to a safe value.
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.colors.is_empty() {
            tracing::warn!("empty explosion palette, using default colors");
            self.colors = defaults.colors.clone();
        }
        if !self.speed.is_valid() {
            self.speed = defaults.speed;
        }
        // Lifetimes below one frame would make `1 / max_frames` blow up.
        if !self.life_frames.is_valid() || self.life_frames.min < 1.0 {
            tracing::warn!("invalid explosion lifetime range, using defaults");
            self.life_frames = defaults.life_frames;
        }
        if !self.size.is_valid() || self.size.min < 0.0 {
            self.size = defaults.size;
        }
        self.angle_jitter = finite_or(self.angle_jitter, defaults.angle_jitter);
        self.drag = finite_or(self.drag, defaults.drag).clamp(0.0, 1.0);
        self.gravity = finite_or(self.gravity, defaults.gravity);
        self
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/model.rs"]
mod tests;
