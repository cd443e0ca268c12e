use rand::SeedableRng;
use rand::rngs::StdRng;

use crate::config::model::ParticleConfig;
use crate::engine::connections::{ConnectionBuilder, Segment};
use crate::engine::init::spawn_particles;
use crate::engine::particle::{Particle, ParticleStore};
use crate::engine::physics::{Physics, StepInput};
use crate::foundation::core::{Bounds, Dimensions, Point, Vec3, Viewport};
use crate::input::cell::{InputCell, InputSnapshot, InputWriter};
use crate::lifecycle::cancel::CancelToken;
use crate::lifecycle::scheduler::{FrameHandle, FrameScheduler};
use crate::render::camera::PerspectiveCamera;
use crate::render::immediate::{Painter, paint_planar};
use crate::render::retained::PointCloud;

/// Lifecycle of a [`ParticleBackground`]. Transitions only move forward.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifecycleState {
    /// Built but not yet mounted.
    Uninitialized,
    /// Mounted; frames are scheduled.
    Running,
    /// Torn down; nothing is scheduled and the stores are empty.
    Stopped,
}

/// What a call to [`ParticleBackground::frame`] did.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The scene was stepped and painted; another frame was requested.
    Painted,
    /// No surface was available: nothing changed, another frame was requested.
    NoSurface,
    /// Not running (never mounted, or stopped); nothing happened.
    Inactive,
}

/// Seconds elapsed since the first frame, never running backwards.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrameClock {
    start: Option<f64>,
    elapsed: f64,
}

impl FrameClock {
    /// Feed a host timestamp in seconds; returns the elapsed time.
    pub fn tick(&mut self, now_secs: f64) -> f64 {
        if !now_secs.is_finite() {
            return self.elapsed;
        }
        let start = *self.start.get_or_insert(now_secs);
        self.elapsed = (now_secs - start).max(self.elapsed);
        self.elapsed
    }

    /// Last elapsed value.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }
}

/// One particle set together with its physics, connection lines and render buffers.
#[derive(Debug)]
pub struct ParticleLayer {
    config: ParticleConfig,
    physics: Physics,
    store: ParticleStore,
    connections: ConnectionBuilder,
    segments: Vec<Segment>,
    cloud: PointCloud,
    rng: StdRng,
}

impl ParticleLayer {
    fn new(config: ParticleConfig) -> Self {
        let config = config.sanitized();
        Self {
            physics: Physics::from_config(&config),
            rng: seeded_rng(config.seed),
            config,
            store: ParticleStore::new(),
            connections: ConnectionBuilder::default(),
            segments: Vec::new(),
            cloud: PointCloud::new(),
        }
    }

    /// Active configuration (bounds already fitted to the viewport where requested).
    pub fn config(&self) -> &ParticleConfig {
        &self.config
    }

    /// Particle storage.
    pub fn store(&self) -> &ParticleStore {
        &self.store
    }

    /// Connection lines built on the last painted frame.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Retained buffers (filled for spatial sets only).
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    fn fit(&mut self, viewport: Viewport) {
        if fits_viewport(&self.config, viewport) {
            self.config.bounds = Bounds::planar(viewport.width, viewport.height);
            self.physics.set_bounds(self.config.bounds);
        }
    }

    fn respawn(&mut self) {
        self.store.replace(spawn_particles(&self.config, &mut self.rng));
        self.segments.clear();
    }

    fn step(&mut self, input: &StepInput) {
        self.physics.step(self.store.as_mut_slice(), input);
        if self.config.connection_lines {
            self.connections.build(
                self.store.as_slice(),
                &self.config.connections,
                &mut self.segments,
            );
        } else {
            self.segments.clear();
        }
        if self.config.dimensions == Dimensions::Spatial {
            self.cloud.sync(&self.store, &self.segments);
        }
    }

    fn paint(&mut self, painter: &mut dyn Painter, camera: &PerspectiveCamera, clock: f64) {
        if let Some(wash) = self.config.backdrop {
            painter.fill_surface(wash);
        }
        match self.config.dimensions {
            Dimensions::Planar => paint_planar(
                painter,
                self.store.as_slice(),
                &self.segments,
                &self.config.connections,
                self.config.glow,
            ),
            Dimensions::Spatial => {
                self.cloud.take_needs_update();
                let rotation = self.config.spin.angles(clock * self.config.speed);
                self.cloud.draw(
                    painter,
                    camera,
                    rotation,
                    self.config.point_opacity,
                    &self.config.connections,
                );
            }
        }
    }

    fn teardown(&mut self) {
        self.store.clear();
        self.segments.clear();
    }
}

fn fits_viewport(config: &ParticleConfig, viewport: Viewport) -> bool {
    config.fit_to_viewport && config.dimensions == Dimensions::Planar && viewport.is_drawable()
}

fn seeded_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Host-facing particle background: one or more particle sets driven by a frame scheduler.
///
/// ```text
/// Uninitialized --mount--> Running --unmount / cancel--> Stopped
/// ```
///
/// Every frame delivered while running requests the next one; after teardown no frame is
/// ever requested again and the particle stores stay empty.
#[derive(Debug)]
pub struct ParticleBackground<S: FrameScheduler> {
    layers: Vec<ParticleLayer>,
    scheduler: S,
    state: LifecycleState,
    input: Option<InputCell>,
    cancel: CancelToken,
    pending: Option<FrameHandle>,
    camera: PerspectiveCamera,
    viewport: Viewport,
    clock: FrameClock,
    last_resize: u64,
    frames: u64,
}

impl<S: FrameScheduler> ParticleBackground<S> {
    /// Background with a single particle set.
    pub fn new(config: ParticleConfig, scheduler: S) -> Self {
        Self::with_layers(vec![config], scheduler)
    }

    /// Background stacking `layers` back to front.
    pub fn with_layers(layers: Vec<ParticleConfig>, scheduler: S) -> Self {
        Self {
            layers: layers.into_iter().map(ParticleLayer::new).collect(),
            scheduler,
            state: LifecycleState::Uninitialized,
            input: None,
            cancel: CancelToken::new(),
            pending: None,
            camera: PerspectiveCamera::default(),
            viewport: Viewport::new(0.0, 0.0),
            clock: FrameClock::default(),
            last_resize: 0,
            frames: 0,
        }
    }

    /// Replace the camera used for spatial sets.
    pub fn with_camera(mut self, camera: PerspectiveCamera) -> Self {
        self.camera = camera;
        self
    }

    /// Start: spawn every particle set, hand out the input writer and request the first frame.
    ///
    /// Returns `None` (and does nothing) unless the background is uninitialized.
    #[tracing::instrument(skip(self), fields(layers = self.layers.len()))]
    pub fn mount(&mut self, viewport: Viewport) -> Option<InputWriter> {
        if self.state != LifecycleState::Uninitialized {
            tracing::debug!(state = ?self.state, "mount ignored");
            return None;
        }
        self.viewport = viewport;
        for layer in &mut self.layers {
            layer.fit(viewport);
            layer.respawn();
        }
        let (cell, writer) = InputCell::new();
        self.input = Some(cell);
        self.state = LifecycleState::Running;
        self.pending = Some(self.scheduler.request_frame());
        tracing::debug!(particles = self.particle_count(), "mounted");
        Some(writer)
    }

    /// Run one frame at host time `now_secs`.
    ///
    /// With a surface: apply the latest input, step physics, rebuild connection lines and
    /// paint. Without one: touch nothing. Either way the next frame is requested while
    /// running.
    pub fn frame(&mut self, now_secs: f64, surface: Option<&mut dyn Painter>) -> FrameOutcome {
        if self.cancel.is_cancelled() && self.state == LifecycleState::Running {
            self.unmount();
        }
        if self.state != LifecycleState::Running {
            return FrameOutcome::Inactive;
        }
        self.pending = None;

        let outcome = match surface {
            None => FrameOutcome::NoSurface,
            Some(painter) => {
                let clock = self.clock.tick(now_secs);
                let snapshot = self
                    .input
                    .as_ref()
                    .map(InputCell::snapshot)
                    .unwrap_or_default();
                self.apply_resize(&snapshot);

                painter.clear();
                for layer in &mut self.layers {
                    let input = StepInput {
                        clock,
                        pointer: snapshot
                            .pointer
                            .map(|p| pointer_in_layer(p, layer, &self.camera, self.viewport)),
                    };
                    layer.step(&input);
                    layer.paint(painter, &self.camera, clock);
                }
                self.frames += 1;
                FrameOutcome::Painted
            }
        };

        self.pending = Some(self.scheduler.request_frame());
        outcome
    }

    /// Stop: withdraw the pending frame, flip the cancel token, detach input and empty
    /// every store. Safe to call any number of times in any state.
    #[tracing::instrument(skip(self))]
    pub fn unmount(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel_frame(handle);
        }
        self.cancel.cancel();
        if let Some(cell) = self.input.take() {
            cell.detach();
        }
        for layer in &mut self.layers {
            layer.teardown();
        }
        if self.state != LifecycleState::Stopped {
            tracing::debug!(frames = self.frames, "stopped");
        }
        self.state = LifecycleState::Stopped;
    }

    /// Swap in new configurations.
    ///
    /// A set is respawned only when a change makes its current particles invalid (see
    /// [`ParticleConfig::needs_respawn`]); other changes apply to the next frame in place.
    /// A different number of sets rebuilds all of them.
    #[tracing::instrument(skip(self, layers), fields(layers = layers.len()))]
    pub fn reconfigure(&mut self, layers: Vec<ParticleConfig>) {
        if self.state == LifecycleState::Stopped {
            return;
        }
        let running = self.state == LifecycleState::Running;

        if layers.len() != self.layers.len() {
            self.layers = layers.into_iter().map(ParticleLayer::new).collect();
            if running {
                for layer in &mut self.layers {
                    layer.fit(self.viewport);
                    layer.respawn();
                }
            }
            return;
        }

        for (layer, next) in self.layers.iter_mut().zip(layers) {
            let mut next = next.sanitized();
            if fits_viewport(&next, self.viewport) {
                next.bounds = Bounds::planar(self.viewport.width, self.viewport.height);
            }
            let respawn = layer.config.needs_respawn(&next);
            if layer.config.seed != next.seed {
                layer.rng = seeded_rng(next.seed);
            }
            layer.physics = Physics::from_config(&next);
            layer.config = next;
            if respawn && running {
                tracing::debug!(count = layer.config.count, "respawning particle set");
                layer.respawn();
            }
        }
    }

    fn apply_resize(&mut self, snapshot: &InputSnapshot) {
        if snapshot.resize_count == self.last_resize {
            return;
        }
        self.last_resize = snapshot.resize_count;
        let Some(viewport) = snapshot.viewport.filter(|v| v.is_drawable()) else {
            return;
        };
        self.viewport = viewport;
        for layer in &mut self.layers {
            if fits_viewport(&layer.config, viewport) {
                layer.fit(viewport);
                layer.respawn();
            }
        }
        tracing::debug!(
            width = viewport.width,
            height = viewport.height,
            "viewport resized"
        );
    }

    /// Current state.
    pub fn state(&self) -> LifecycleState {
        self.state
    }

    /// Particle sets, back to front.
    pub fn layers(&self) -> &[ParticleLayer] {
        &self.layers
    }

    /// Particles of the first set (empty when there is none).
    pub fn particles(&self) -> &[Particle] {
        self.layers
            .first()
            .map(|l| l.store.as_slice())
            .unwrap_or_default()
    }

    /// Total particles across every set.
    pub fn particle_count(&self) -> usize {
        self.layers.iter().map(|l| l.store.len()).sum()
    }

    /// Viewport the sets are laid out for.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Token that stops this background at the top of its next frame.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Painted frames so far.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Elapsed animation time.
    pub fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// The frame source.
    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// The frame source, mutably (to drain a [`crate::ManualScheduler`]).
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }
}

/// Host pixels to the layer's coordinate space: identity for planar sets, the `z = 0`
/// world plane for spatial ones.
fn pointer_in_layer(
    pointer: Point,
    layer: &ParticleLayer,
    camera: &PerspectiveCamera,
    viewport: Viewport,
) -> Vec3 {
    match layer.config.dimensions {
        Dimensions::Planar => Vec3::new(pointer.x, pointer.y, layer.config.bounds.min.z),
        Dimensions::Spatial => camera.unproject_to_plane(pointer, viewport),
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/controller.rs"]
mod tests;
