use crate::config::model::{
    BoundaryPolicy, DriftParams, InteractionParams, ParticleConfig, PointerResponse,
};
use crate::engine::particle::Particle;
use crate::foundation::core::{Bounds, Dimensions, Vec3};

/// Per-frame stimulus fed into the physics step.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StepInput {
    /// Seconds since the particle set started running.
    pub clock: f64,
    /// Pointer position in the particle set's coordinate space, if the pointer is present.
    pub pointer: Option<Vec3>,
}

/// Physics constants of one particle set, resolved from its [`ParticleConfig`].
#[derive(Clone, Debug, PartialEq)]
pub struct Physics {
    dimensions: Dimensions,
    bounds: Bounds,
    policy: BoundaryPolicy,
    speed: f64,
    damping: f64,
    restitution: f64,
    interaction: Option<InteractionParams>,
    drift: DriftParams,
}

impl Physics {
    /// Resolve constants from a (sanitized) configuration.
    pub fn from_config(config: &ParticleConfig) -> Self {
        Self {
            dimensions: config.dimensions,
            bounds: config.bounds,
            policy: config.boundary_policy,
            speed: config.speed,
            damping: config.damping,
            restitution: config.restitution,
            interaction: config.mouse_interaction.then_some(config.interaction),
            drift: config.drift,
        }
    }

    /// Current domain.
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    /// Replace the domain (viewport resize).
    pub fn set_bounds(&mut self, bounds: Bounds) {
        self.bounds = bounds;
    }

    /// Advance every particle by one frame, in place.
    pub fn step(&self, particles: &mut [Particle], input: &StepInput) {
        for (index, particle) in particles.iter_mut().enumerate() {
            self.step_particle(particle, index, input);
        }
    }

    /// Advance one particle: pointer impulse, motion, damping, then the boundary policy.
    ///
    /// The order is observable: the impulse feeds this frame's motion, and the boundary
    /// policy sees the damped velocity.
    pub fn step_particle(&self, particle: &mut Particle, index: usize, input: &StepInput) {
        if let (Some(params), Some(pointer)) = (&self.interaction, input.pointer)
            && let Some(impulse) =
                pointer_impulse(particle.position, pointer, params, self.dimensions)
        {
            particle.velocity += impulse;
        }

        particle.position += particle.velocity;
        particle.position.y += self.drift_offset(index, input.clock);

        particle.velocity *= self.damping;

        match self.policy {
            BoundaryPolicy::Wrap => self.wrap(particle),
            BoundaryPolicy::Bounce => self.bounce(particle),
        }
    }

    fn drift_offset(&self, index: usize, clock: f64) -> f64 {
        let d = &self.drift;
        if d.amplitude == 0.0 {
            return 0.0;
        }
        let phase = clock * self.speed * d.frequency + index as f64 * d.phase_step;
        d.amplitude * phase.sin()
    }

    fn wrap(&self, particle: &mut Particle) {
        for &axis in self.dimensions.axes() {
            let (lo, hi) = (self.bounds.min.get(axis), self.bounds.max.get(axis));
            let v = particle.position.get_mut(axis);
            if *v > hi {
                *v = lo;
            } else if *v < lo {
                *v = hi;
            }
        }
    }

    fn bounce(&self, particle: &mut Particle) {
        for &axis in self.dimensions.axes() {
            let (lo, hi) = (self.bounds.min.get(axis), self.bounds.max.get(axis));
            let pos = particle.position.get(axis);
            let clamped = if pos < lo {
                lo
            } else if pos > hi {
                hi
            } else {
                continue;
            };
            *particle.position.get_mut(axis) = clamped;
            let vel = particle.velocity.get_mut(axis);
            *vel = -*vel * self.restitution;
        }
    }
}

/// Velocity change caused by a pointer at `pointer`, or `None` when out of reach.
///
/// Zero and non-finite distances yield `None` so a particle sitting exactly under the
/// pointer never receives a NaN direction.
pub fn pointer_impulse(
    position: Vec3,
    pointer: Vec3,
    params: &InteractionParams,
    dimensions: Dimensions,
) -> Option<Vec3> {
    let flat = params.planar_distance || dimensions == Dimensions::Planar;
    let mut delta = position - pointer;
    if flat {
        delta.z = 0.0;
    }
    let distance = delta.length();
    if !(distance > 0.0 && distance.is_finite() && distance < params.radius) {
        return None;
    }

    let force = (params.radius - distance) / params.radius * params.strength;
    let away = delta * (1.0 / distance);
    let dir = match params.response {
        PointerResponse::Repel => away,
        PointerResponse::Attract => -away,
    };
    Some(dir * force)
}

#[cfg(test)]
#[path = "../../tests/unit/engine/physics.rs"]
mod tests;
