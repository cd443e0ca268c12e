//! backdrop is a headless particle-field engine for animated page backgrounds.
//!
//! A background is one or more particle sets. Each frame it:
//!
//! 1. **Reads input**: the latest pointer position and viewport size from its [`InputCell`]
//! 2. **Steps physics**: pointer impulse, motion and drift, damping, then wrap or bounce
//! 3. **Links neighbours** (optional): connection lines between particles closer than a threshold
//! 4. **Paints**: planar sets draw discs and lines directly; spatial sets go through a
//!    [`PointCloud`] projected by a [`PerspectiveCamera`]
//!
//! Frames are pulled by a host [`FrameScheduler`]. [`ParticleBackground`] owns the
//! mount / frame / unmount lifecycle; [`HeadlessDriver`] runs it without a display, and
//! [`CpuPainter`] rasterizes frames to RGBA8 with `vello_cpu`.
//!
//! One-shot bursts are separate: [`Explosion`] spawns short-lived particles that fade out and
//! report completion exactly once.
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Infallible frames**: stepping and painting never return errors; degenerate input is
//!   skipped or clamped.
//! - **Reproducible**: a `seed` in the configuration makes a run deterministic.
#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![allow(missing_docs_in_private_items)]

mod config;
mod engine;
mod foundation;
mod input;
mod lifecycle;
mod render;

pub use config::model::{
    BoundaryPolicy, ConnectionParams, ConnectionStrategy, DEFAULT_PALETTE, DriftParams,
    ExplosionConfig, InteractionParams, ParticleConfig, PointerResponse, SceneSpin,
};
pub use config::presets::{Intensity, MOBILE_BREAKPOINT_PX, Preset};
pub use engine::connections::{
    ConnectionBuilder, ConnectionGrid, GRID_THRESHOLD, Segment, build_connections,
};
pub use engine::explosion::{Explosion, ExplosionState};
pub use engine::init::spawn_particles;
pub use engine::particle::{Life, Particle, ParticleStore};
pub use engine::physics::{Physics, StepInput, pointer_impulse};
pub use foundation::core::{
    Axis, Bounds, Dimensions, Point, Rgba8, ValueRange, Vec2, Vec3, Viewport,
};
pub use foundation::error::{BackdropError, BackdropResult};
pub use input::cell::{InputCell, InputSnapshot, InputWriter, InteractionEvent};
pub use lifecycle::cancel::CancelToken;
pub use lifecycle::controller::{
    FrameClock, FrameOutcome, LifecycleState, ParticleBackground, ParticleLayer,
};
pub use lifecycle::driver::{DriverReport, HeadlessDriver, StopReason};
pub use lifecycle::scheduler::{FrameHandle, FrameScheduler, ManualScheduler};
pub use render::camera::{PerspectiveCamera, Projected};
pub use render::cpu::{CpuPainter, FrameRGBA};
pub use render::immediate::{DrawCmd, Painter, RecordingPainter, paint_immediate};
pub use render::retained::PointCloud;
