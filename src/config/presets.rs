use crate::config::model::{
    BoundaryPolicy, ConnectionParams, ConnectionStrategy, DriftParams, InteractionParams,
    ParticleConfig, PointerResponse, SceneSpin,
};
use crate::foundation::core::{Bounds, Dimensions, Rgba8, ValueRange};
use crate::foundation::error::{BackdropError, BackdropResult};

/// Viewports narrower than this get reduced particle counts.
pub const MOBILE_BREAKPOINT_PX: f64 = 768.0;

/// Density of the ambient field.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Intensity {
    /// 75 particles, speed 0.3.
    Low,
    /// 150 particles, speed 0.5.
    #[default]
    Medium,
    /// 300 particles, speed 0.8.
    High,
}

impl Intensity {
    /// Base particle count.
    pub fn count(self) -> usize {
        match self {
            Self::Low => 75,
            Self::Medium => 150,
            Self::High => 300,
        }
    }

    /// Base speed multiplier.
    pub fn speed(self) -> f64 {
        match self {
            Self::Low => 0.3,
            Self::Medium => 0.5,
            Self::High => 0.8,
        }
    }
}

/// Named particle-set tunings, one per background style used across the site.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "preset")]
pub enum Preset {
    /// Slow floating 3D field with a sparser secondary layer for depth.
    Ambient {
        /// Field density.
        intensity: Intensity,
    },
    /// 3D field pushed away by the pointer, optionally linked by lines.
    Interactive,
    /// 2D canvas field drawn towards the pointer and linked by lines.
    Constellation {
        /// Dark-theme palette when `true`.
        dark: bool,
    },
    /// 2D field of glowing particles that bounce off the viewport edges.
    Drift {
        /// Dim translucent wash under the particles when `true`.
        trail: bool,
    },
    /// Multi-colored 3D field reacting to the pointer on the screen plane.
    Advanced,
}

impl Preset {
    /// Every preset with default parameters, in display order.
    pub const ALL: [Preset; 5] = [
        Preset::Ambient {
            intensity: Intensity::Medium,
        },
        Preset::Interactive,
        Preset::Constellation { dark: true },
        Preset::Drift { trail: false },
        Preset::Advanced,
    ];

    /// Parse a CLI-style name: `ambient`, `ambient-low`, `ambient-high`, `interactive`,
    /// `constellation`, `constellation-light`, `drift`, `drift-trail`, `advanced`.
    pub fn from_name(name: &str) -> BackdropResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "ambient" | "ambient-medium" => Ok(Self::Ambient {
                intensity: Intensity::Medium,
            }),
            "ambient-low" => Ok(Self::Ambient {
                intensity: Intensity::Low,
            }),
            "ambient-high" => Ok(Self::Ambient {
                intensity: Intensity::High,
            }),
            "interactive" => Ok(Self::Interactive),
            "constellation" | "constellation-dark" => Ok(Self::Constellation { dark: true }),
            "constellation-light" => Ok(Self::Constellation { dark: false }),
            "drift" => Ok(Self::Drift { trail: false }),
            "drift-trail" => Ok(Self::Drift { trail: true }),
            "advanced" => Ok(Self::Advanced),
            other => Err(BackdropError::config(format!("unknown preset '{other}'"))),
        }
    }

    /// Particle sets making up this background, back to front.
    pub fn layers(self) -> Vec<ParticleConfig> {
        match self {
            Self::Ambient { intensity } => {
                let primary = ambient_layer(intensity.count(), intensity.speed());
                let secondary = ambient_layer(
                    (intensity.count() as f64 * 0.3).floor() as usize,
                    intensity.speed() * 0.7,
                );
                vec![primary, secondary]
            }
            Self::Interactive => vec![interactive()],
            Self::Constellation { dark } => vec![constellation(dark)],
            Self::Drift { trail } => vec![drift(trail)],
            Self::Advanced => vec![advanced()],
        }
    }

    /// [`Preset::layers`] with counts reduced on narrow (mobile) viewports.
    pub fn layers_for_width(self, viewport_width: f64) -> Vec<ParticleConfig> {
        let layers = self.layers();
        if viewport_width >= MOBILE_BREAKPOINT_PX {
            return layers;
        }
        let factor = self.mobile_factor();
        layers
            .into_iter()
            .map(|cfg| cfg.with_count_scaled(factor))
            .collect()
    }

    /// Count multiplier below [`MOBILE_BREAKPOINT_PX`].
    pub fn mobile_factor(self) -> f64 {
        match self {
            Self::Ambient { .. } => 0.6,
            Self::Interactive => 0.5,
            Self::Constellation { .. } | Self::Drift { .. } | Self::Advanced => 1.0,
        }
    }
}

fn cyan() -> Rgba8 {
    Rgba8::rgb(0x06, 0xb6, 0xd4)
}

fn ambient_layer(count: usize, speed: f64) -> ParticleConfig {
    ParticleConfig {
        count,
        speed,
        colors: vec![cyan()],
        mouse_interaction: false,
        connection_lines: false,
        boundary_policy: BoundaryPolicy::Wrap,
        dimensions: Dimensions::Spatial,
        bounds: Bounds::cube(12.5),
        fit_to_viewport: false,
        initial_velocity: 0.01,
        damping: 1.0,
        restitution: 0.8,
        interaction: InteractionParams::default(),
        drift: DriftParams {
            amplitude: 0.001,
            frequency: 1.0,
            phase_step: 1.0,
        },
        connections: ConnectionParams::default(),
        size: ValueRange::fixed(0.03),
        alpha: ValueRange::fixed(1.0),
        point_opacity: 0.4,
        spin: SceneSpin {
            pitch_amplitude: 0.1,
            pitch_rate: 0.1,
            yaw_rate: 0.05,
        },
        glow: 0.0,
        backdrop: None,
        seed: None,
    }
}

fn interactive() -> ParticleConfig {
    ParticleConfig {
        count: 200,
        speed: 0.5,
        colors: vec![cyan()],
        mouse_interaction: true,
        connection_lines: false,
        boundary_policy: BoundaryPolicy::Wrap,
        dimensions: Dimensions::Spatial,
        bounds: Bounds::cube(15.0),
        fit_to_viewport: false,
        initial_velocity: 0.01,
        damping: 0.99,
        restitution: 0.8,
        interaction: InteractionParams {
            radius: 5.0,
            strength: 0.1,
            response: PointerResponse::Repel,
            planar_distance: false,
        },
        drift: DriftParams {
            amplitude: 0.001,
            frequency: 1.0,
            phase_step: 1.0,
        },
        connections: ConnectionParams {
            max_distance: 3.0,
            max_opacity: 0.2,
            line_width: 1.0,
            color: Rgba8::rgb(0x8b, 0x5c, 0xf6),
            strategy: ConnectionStrategy::Auto,
        },
        size: ValueRange::fixed(0.04),
        alpha: ValueRange::fixed(1.0),
        point_opacity: 0.6,
        spin: SceneSpin {
            pitch_amplitude: 0.0,
            pitch_rate: 0.0,
            yaw_rate: 0.02,
        },
        glow: 0.0,
        backdrop: None,
        seed: None,
    }
}

fn constellation(dark: bool) -> ParticleConfig {
    let colors = if dark {
        vec![
            Rgba8::rgb(0x06, 0xb6, 0xd4),
            Rgba8::rgb(0x8b, 0x5c, 0xf6),
            Rgba8::rgb(0x10, 0xb9, 0x81),
            Rgba8::rgb(0xf5, 0x9e, 0x0b),
        ]
    } else {
        vec![
            Rgba8::rgb(0x08, 0x91, 0xb2),
            Rgba8::rgb(0x7c, 0x3a, 0xed),
            Rgba8::rgb(0x05, 0x96, 0x69),
            Rgba8::rgb(0xd9, 0x77, 0x06),
        ]
    };
    ParticleConfig {
        count: 120,
        speed: 1.0,
        colors,
        mouse_interaction: true,
        connection_lines: true,
        boundary_policy: BoundaryPolicy::Wrap,
        dimensions: Dimensions::Planar,
        bounds: Bounds::planar(800.0, 600.0),
        fit_to_viewport: true,
        initial_velocity: 0.25,
        damping: 0.99,
        restitution: 0.8,
        interaction: InteractionParams {
            radius: 150.0,
            strength: 0.01,
            response: PointerResponse::Attract,
            planar_distance: true,
        },
        drift: DriftParams {
            amplitude: 0.1,
            frequency: 1.0,
            phase_step: 1.0,
        },
        connections: ConnectionParams {
            max_distance: 100.0,
            max_opacity: 0.2,
            line_width: 0.5,
            color: Rgba8::rgb(6, 182, 212),
            strategy: ConnectionStrategy::Auto,
        },
        size: ValueRange::new(1.0, 3.0),
        alpha: ValueRange::new(0.3, 0.8),
        point_opacity: 1.0,
        spin: SceneSpin::default(),
        glow: 0.0,
        backdrop: None,
        seed: None,
    }
}

fn drift(trail: bool) -> ParticleConfig {
    ParticleConfig {
        count: 50,
        speed: 1.0,
        colors: vec![
            Rgba8::rgb(0x06, 0xb6, 0xd4),
            Rgba8::rgb(0x8b, 0x5c, 0xf6),
            Rgba8::rgb(0x10, 0xb9, 0x81),
        ],
        mouse_interaction: true,
        connection_lines: false,
        boundary_policy: BoundaryPolicy::Bounce,
        dimensions: Dimensions::Planar,
        bounds: Bounds::planar(800.0, 600.0),
        fit_to_viewport: true,
        initial_velocity: 0.5,
        damping: 0.99,
        restitution: 0.8,
        interaction: InteractionParams {
            radius: 100.0,
            strength: 0.1,
            response: PointerResponse::Attract,
            planar_distance: true,
        },
        drift: DriftParams {
            amplitude: 0.0,
            frequency: 0.0,
            phase_step: 0.0,
        },
        connections: ConnectionParams::default(),
        size: ValueRange::new(0.5, 2.5),
        alpha: ValueRange::new(0.3, 0.8),
        point_opacity: 1.0,
        spin: SceneSpin::default(),
        glow: 2.0,
        backdrop: trail.then_some(Rgba8 {
            r: 0,
            g: 0,
            b: 0,
            a: 0x0d,
        }),
        seed: None,
    }
}

fn advanced() -> ParticleConfig {
    ParticleConfig {
        count: 80,
        speed: 1.0,
        colors: vec![
            Rgba8::rgb(0x06, 0xb6, 0xd4),
            Rgba8::rgb(0x8b, 0x5c, 0xf6),
            Rgba8::rgb(0x06, 0xb6, 0xd4),
            Rgba8::rgb(0x10, 0xb9, 0x81),
            Rgba8::rgb(0xf5, 0x9e, 0x0b),
        ],
        mouse_interaction: true,
        connection_lines: false,
        boundary_policy: BoundaryPolicy::Wrap,
        dimensions: Dimensions::Spatial,
        bounds: Bounds::centered(10.0, 10.0, 5.0),
        fit_to_viewport: false,
        initial_velocity: 0.01,
        damping: 0.99,
        restitution: 0.8,
        interaction: InteractionParams {
            radius: 3.0,
            strength: 0.01,
            response: PointerResponse::Repel,
            planar_distance: true,
        },
        drift: DriftParams {
            amplitude: 0.002,
            frequency: 0.5,
            phase_step: 1.0,
        },
        connections: ConnectionParams::default(),
        size: ValueRange::fixed(0.05),
        alpha: ValueRange::fixed(1.0),
        point_opacity: 0.8,
        spin: SceneSpin::default(),
        glow: 0.0,
        backdrop: None,
        seed: None,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/presets.rs"]
mod tests;
