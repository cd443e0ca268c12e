use crate::foundation::core::{Rgba8, Vec3};

/// Remaining lifetime of a short-lived particle.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Life {
    /// Fraction of life left, starting at `1.0`; the particle dies at `<= 0`.
    pub remaining: f64,
    /// Total lifetime in frames.
    pub max_frames: f64,
}

/// A single animated point.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct Particle {
    /// Current position.
    pub position: Vec3,
    /// Displacement applied per frame.
    pub velocity: Vec3,
    /// Radius.
    pub size: f64,
    /// Palette color.
    pub color: Rgba8,
    /// Opacity in `[0, 1]`.
    pub alpha: f64,
    /// Set only for explosion particles.
    pub life: Option<Life>,
}

impl Particle {
    /// Alpha used for painting: explosion particles fade with their remaining life.
    pub fn paint_alpha(&self) -> f64 {
        match self.life {
            Some(life) => (self.alpha * life.remaining).clamp(0.0, 1.0),
            None => self.alpha.clamp(0.0, 1.0),
        }
    }
}

/// Exclusively owned particle storage of one particle set.
///
/// The store never grows one particle at a time: it is replaced wholesale by the initializer
/// and otherwise only mutated in place.
#[derive(Clone, Debug, Default)]
pub struct ParticleStore {
    particles: Vec<Particle>,
    generation: u64,
}

impl ParticleStore {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace every particle; bumps [`ParticleStore::generation`].
    pub fn replace(&mut self, particles: Vec<Particle>) {
        self.particles = particles;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Drop every particle.
    pub fn clear(&mut self) {
        self.replace(Vec::new());
    }

    /// Read-only view for renderers.
    pub fn as_slice(&self) -> &[Particle] {
        &self.particles
    }

    /// In-place view for the physics step.
    pub fn as_mut_slice(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    /// Number of particles.
    pub fn len(&self) -> usize {
        self.particles.len()
    }

    /// `true` when no particles are stored.
    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    /// Incremented on every wholesale replacement.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
