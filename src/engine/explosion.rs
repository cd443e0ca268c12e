use std::f64::consts::TAU;

use rand::Rng;

use crate::config::model::ExplosionConfig;
use crate::engine::init::pick_color;
use crate::engine::particle::{Life, Particle};
use crate::foundation::core::{Point, Vec3};
use crate::foundation::math::sample_range;

/// Where an explosion is in its one-shot life.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExplosionState {
    /// Never triggered.
    Idle,
    /// Particles are in flight.
    Active,
    /// Every particle has died; the completion callback has fired.
    Finished,
}

/// One-shot burst of short-lived particles.
///
/// The store only shrinks between triggers. When it empties the explosion enters
/// [`ExplosionState::Finished`] and the completion callback fires exactly once.
pub struct Explosion {
    config: ExplosionConfig,
    particles: Vec<Particle>,
    state: ExplosionState,
    on_complete: Option<Box<dyn FnMut()>>,
    frames: u64,
}

impl std::fmt::Debug for Explosion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explosion")
            .field("state", &self.state)
            .field("particles", &self.particles.len())
            .field("frames", &self.frames)
            .finish()
    }
}

impl Explosion {
    /// Idle explosion; the configuration is sanitized.
    pub fn new(config: ExplosionConfig) -> Self {
        Self {
            config: config.sanitized(),
            particles: Vec::new(),
            state: ExplosionState::Idle,
            on_complete: None,
            frames: 0,
        }
    }

    /// Register the callback invoked when the store becomes empty.
    pub fn on_complete(mut self, callback: impl FnMut() + 'static) -> Self {
        self.on_complete = Some(Box::new(callback));
        self
    }

    /// Configuration in use.
    pub fn config(&self) -> &ExplosionConfig {
        &self.config
    }

    /// Current state.
    pub fn state(&self) -> ExplosionState {
        self.state
    }

    /// Live particles.
    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Frames stepped since the last trigger.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Replace the store with a fresh burst centered on `origin`.
    #[tracing::instrument(skip(self, rng), fields(count = self.config.particle_count))]
    pub fn trigger<R: Rng + ?Sized>(&mut self, origin: Point, rng: &mut R) {
        let cfg = &self.config;
        let k = cfg.particle_count;
        let center = Vec3::planar(origin.x, origin.y);

        self.particles = (0..k)
            .map(|i| {
                let angle = TAU * i as f64 / k as f64 + rng.gen_range(0.0..1.0) * cfg.angle_jitter;
                let speed = sample_range(rng, cfg.speed);
                Particle {
                    position: center,
                    velocity: Vec3::planar(angle.cos() * speed, angle.sin() * speed),
                    size: sample_range(rng, cfg.size) * 0.5,
                    color: pick_color(&cfg.colors, rng),
                    alpha: 1.0,
                    life: Some(Life {
                        remaining: 1.0,
                        max_frames: sample_range(rng, cfg.life_frames),
                    }),
                }
            })
            .collect();
        self.frames = 0;
        self.state = ExplosionState::Active;
        tracing::debug!(x = origin.x, y = origin.y, "explosion triggered");

        if self.particles.is_empty() {
            self.finish();
        }
    }

    /// Advance one frame. Idle and finished explosions are left untouched.
    pub fn step(&mut self) -> ExplosionState {
        if self.state != ExplosionState::Active {
            return self.state;
        }
        let (drag, gravity) = (self.config.drag, self.config.gravity);

        // Short-lived and bounded, so rebuilding the store each frame is fine.
        self.particles = std::mem::take(&mut self.particles)
            .into_iter()
            .filter_map(|mut p| {
                p.position += p.velocity;
                p.velocity.x *= drag;
                p.velocity.y = p.velocity.y * drag + gravity;
                let life = p.life.as_mut()?;
                life.remaining -= 1.0 / life.max_frames;
                (life.remaining > 0.0).then_some(p)
            })
            .collect();
        self.frames += 1;

        if self.particles.is_empty() {
            self.finish();
        }
        self.state
    }

    /// `true` while particles are in flight.
    pub fn is_active(&self) -> bool {
        self.state == ExplosionState::Active
    }

    /// `true` once the burst has burnt out.
    pub fn is_finished(&self) -> bool {
        self.state == ExplosionState::Finished
    }

    fn finish(&mut self) {
        self.state = ExplosionState::Finished;
        tracing::debug!(frames = self.frames, "explosion finished");
        if let Some(cb) = self.on_complete.as_mut() {
            cb();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/engine/explosion.rs"]
mod tests;
