use rand::Rng;

use crate::config::model::{DEFAULT_PALETTE, ParticleConfig};
use crate::engine::particle::Particle;
use crate::foundation::core::{Rgba8, Vec3};
use crate::foundation::math::{sample_between, sample_range, sample_symmetric};

/// Create exactly `config.count` particles scattered uniformly inside `config.bounds`.
///
/// Only the axes of `config.dimensions` are randomized; the others sit on `bounds.min`.
pub fn spawn_particles<R: Rng + ?Sized>(config: &ParticleConfig, rng: &mut R) -> Vec<Particle> {
    let axes = config.dimensions.axes();
    let vel_half = config.initial_velocity * config.speed;
    let bounds = config.bounds;

    (0..config.count)
        .map(|_| {
            let mut position = bounds.min;
            let mut velocity = Vec3::ZERO;
            for &axis in axes {
                *position.get_mut(axis) =
                    sample_between(rng, bounds.min.get(axis), bounds.max.get(axis));
                *velocity.get_mut(axis) = sample_symmetric(rng, vel_half);
            }
            Particle {
                position,
                velocity,
                size: sample_range(rng, config.size),
                color: pick_color(&config.colors, rng),
                alpha: sample_range(rng, config.alpha),
                life: None,
            }
        })
        .collect()
}

pub(crate) fn pick_color<R: Rng + ?Sized>(palette: &[Rgba8], rng: &mut R) -> Rgba8 {
    if palette.is_empty() {
        return DEFAULT_PALETTE[0];
    }
    palette[rng.gen_range(0..palette.len())]
}

#[cfg(test)]
#[path = "../../tests/unit/engine/init.rs"]
mod tests;
