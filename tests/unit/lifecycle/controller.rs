use super::*;
use crate::config::model::{BoundaryPolicy, ConnectionParams};
use crate::input::cell::InteractionEvent;
use crate::lifecycle::scheduler::ManualScheduler;
use crate::render::immediate::{DrawCmd, RecordingPainter};

fn planar_config(count: usize) -> ParticleConfig {
    ParticleConfig {
        count,
        seed: Some(11),
        ..ParticleConfig::default()
    }
}

fn background(count: usize) -> ParticleBackground<ManualScheduler> {
    ParticleBackground::new(planar_config(count), ManualScheduler::new())
}

fn surface() -> RecordingPainter {
    RecordingPainter::new(Viewport::new(800.0, 600.0))
}

#[test]
fn mount_spawns_and_requests_the_first_frame() {
    let mut bg = background(40);
    assert_eq!(bg.state(), LifecycleState::Uninitialized);
    assert!(bg.particles().is_empty());

    let writer = bg.mount(Viewport::new(800.0, 600.0));
    assert!(writer.is_some());
    assert_eq!(bg.state(), LifecycleState::Running);
    assert_eq!(bg.particles().len(), 40);
    assert_eq!(bg.scheduler().pending(), 1);

    assert!(bg.mount(Viewport::new(800.0, 600.0)).is_none());
    assert_eq!(bg.scheduler().pending(), 1);
}

#[test]
fn every_running_frame_reschedules() {
    let mut bg = background(10);
    bg.mount(Viewport::new(800.0, 600.0));
    let mut painter = surface();

    for i in 0..5 {
        assert!(bg.scheduler_mut().take_due().is_some());
        assert_eq!(
            bg.frame(i as f64 / 60.0, Some(&mut painter)),
            FrameOutcome::Painted
        );
        assert_eq!(bg.scheduler().pending(), 1);
    }
    assert_eq!(bg.frames(), 5);
}

#[test]
fn frame_without_surface_mutates_nothing_but_reschedules() {
    let mut bg = background(10);
    bg.mount(Viewport::new(800.0, 600.0));
    let before = bg.particles().to_vec();

    bg.scheduler_mut().take_due();
    assert_eq!(bg.frame(0.5, None), FrameOutcome::NoSurface);
    assert_eq!(bg.particles(), before.as_slice());
    assert_eq!(bg.scheduler().pending(), 1);
    assert_eq!(bg.frames(), 0);
}

#[test]
fn unmount_is_idempotent_and_schedules_nothing() {
    let mut bg = background(25);
    let writer = bg.mount(Viewport::new(800.0, 600.0)).unwrap();

    bg.unmount();
    assert_eq!(bg.state(), LifecycleState::Stopped);
    assert!(bg.particles().is_empty());
    assert_eq!(bg.scheduler().pending(), 0);
    assert!(!writer.is_attached());
    assert!(!writer.push(InteractionEvent::PointerLeft));

    let requested = bg.scheduler().requested();
    bg.unmount();
    let mut painter = surface();
    assert_eq!(bg.frame(1.0, Some(&mut painter)), FrameOutcome::Inactive);
    assert_eq!(bg.frame(2.0, None), FrameOutcome::Inactive);
    assert_eq!(bg.scheduler().requested(), requested);
    assert!(painter.commands.is_empty());
    assert!(bg.particles().is_empty());
}

#[test]
fn unmount_before_mount_never_schedules() {
    let mut bg = background(5);
    bg.unmount();
    assert_eq!(bg.state(), LifecycleState::Stopped);
    assert_eq!(bg.scheduler().requested(), 0);
    assert!(bg.mount(Viewport::new(10.0, 10.0)).is_none());
}

#[test]
fn cancel_token_stops_at_the_top_of_the_next_frame() {
    let mut bg = background(5);
    bg.mount(Viewport::new(800.0, 600.0));
    bg.cancel_token().cancel();

    let mut painter = surface();
    assert_eq!(bg.frame(0.0, Some(&mut painter)), FrameOutcome::Inactive);
    assert_eq!(bg.state(), LifecycleState::Stopped);
    assert!(painter.commands.is_empty());
    assert_eq!(bg.scheduler().pending(), 0);
}

#[test]
fn resize_refits_and_respawns_viewport_sets() {
    let mut bg = background(30);
    let writer = bg.mount(Viewport::new(800.0, 600.0)).unwrap();
    let generation = bg.layers()[0].store().generation();

    writer.push(InteractionEvent::Resized {
        width: 200.0,
        height: 100.0,
    });
    let mut painter = RecordingPainter::new(Viewport::new(200.0, 100.0));
    bg.frame(0.0, Some(&mut painter));

    let layer = &bg.layers()[0];
    assert_eq!(layer.config().bounds, Bounds::planar(200.0, 100.0));
    assert_eq!(layer.store().generation(), generation + 1);
    assert_eq!(layer.store().len(), 30);
    assert_eq!(bg.viewport(), Viewport::new(200.0, 100.0));
}

#[test]
fn pointer_reaches_the_physics_step() {
    let cfg = ParticleConfig {
        count: 1,
        initial_velocity: 0.0,
        damping: 1.0,
        drift: crate::config::model::DriftParams {
            amplitude: 0.0,
            ..Default::default()
        },
        boundary_policy: BoundaryPolicy::Bounce,
        seed: Some(1),
        ..ParticleConfig::default()
    };
    let mut bg = ParticleBackground::new(cfg, ManualScheduler::new());
    let writer = bg.mount(Viewport::new(800.0, 600.0)).unwrap();
    let p = bg.particles()[0].position;
    writer.push(InteractionEvent::PointerMoved {
        x: p.x + 10.0,
        y: p.y,
    });

    bg.frame(0.0, Some(&mut surface()));
    let v = bg.particles()[0].velocity;
    assert!(v.x < 0.0, "repel pushes away from the pointer, got {v:?}");
    assert_eq!(v.y, 0.0);
}

#[test]
fn painted_frame_clears_once_then_draws_each_particle() {
    let mut cfg = planar_config(12);
    cfg.connections = ConnectionParams {
        max_distance: 5000.0,
        ..ConnectionParams::default()
    };
    let mut bg = ParticleBackground::new(cfg, ManualScheduler::new());
    bg.mount(Viewport::new(800.0, 600.0));
    let mut painter = surface();
    bg.frame(0.0, Some(&mut painter));

    assert_eq!(painter.commands[0], DrawCmd::Clear);
    assert_eq!(
        painter.commands.iter().filter(|c| **c == DrawCmd::Clear).count(),
        1
    );
    assert_eq!(painter.circles(), 12);
    assert_eq!(painter.lines(), 12 * 11 / 2);
    assert_eq!(bg.layers()[0].segments().len(), 66);
}

#[test]
fn reconfigure_respawns_only_when_needed() {
    let mut bg = background(20);
    bg.mount(Viewport::new(800.0, 600.0));
    let generation = bg.layers()[0].store().generation();

    let mut tweak = planar_config(20);
    tweak.damping = 0.5;
    tweak.connection_lines = false;
    bg.reconfigure(vec![tweak]);
    assert_eq!(bg.layers()[0].store().generation(), generation);
    assert_eq!(bg.layers()[0].config().damping, 0.5);

    bg.reconfigure(vec![planar_config(35)]);
    assert_eq!(bg.layers()[0].store().generation(), generation + 1);
    assert_eq!(bg.particles().len(), 35);
}

#[test]
fn spatial_layers_go_through_the_point_cloud() {
    let cfg = ParticleConfig {
        count: 9,
        dimensions: Dimensions::Spatial,
        bounds: Bounds::cube(2.0),
        fit_to_viewport: false,
        seed: Some(5),
        ..ParticleConfig::default()
    };
    let mut bg = ParticleBackground::new(cfg, ManualScheduler::new());
    bg.mount(Viewport::new(640.0, 480.0));
    let mut painter = RecordingPainter::new(Viewport::new(640.0, 480.0));
    bg.frame(0.0, Some(&mut painter));
    bg.frame(0.016, Some(&mut painter));

    let cloud = bg.layers()[0].cloud();
    assert_eq!(cloud.len(), 9);
    assert_eq!(cloud.color_writes(), 1);
    assert!(!cloud.needs_update());
}

#[test]
fn frame_clock_is_monotonic_from_the_first_tick() {
    let mut clock = FrameClock::default();
    assert_eq!(clock.tick(100.0), 0.0);
    assert_eq!(clock.tick(100.5), 0.5);
    assert_eq!(clock.tick(99.0), 0.5);
    assert_eq!(clock.tick(f64::NAN), 0.5);
}

#[test]
fn vanishing_connection_threshold_still_paints() {
    let cfg = ParticleConfig {
        connections: ConnectionParams {
            max_distance: 1e-300,
            strategy: crate::config::model::ConnectionStrategy::Grid,
            ..ConnectionParams::default()
        },
        ..planar_config(200)
    };
    cfg.validate().unwrap();
    let mut bg = ParticleBackground::new(cfg, ManualScheduler::new());
    bg.mount(Viewport::new(800.0, 600.0));
    let mut painter = surface();
    for i in 0..3 {
        assert_eq!(
            bg.frame(i as f64 / 60.0, Some(&mut painter)),
            FrameOutcome::Painted
        );
    }
    assert!(painter.lines().is_empty());
}

#[test]
fn backdrop_washes_before_the_layer_paints() {
    let wash = crate::foundation::core::Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 13,
    };
    let cfg = ParticleConfig {
        connection_lines: false,
        backdrop: Some(wash),
        glow: 1.0,
        ..planar_config(5)
    };
    let mut bg = ParticleBackground::new(cfg, ManualScheduler::new());
    bg.mount(Viewport::new(800.0, 600.0));
    let mut painter = surface();
    bg.frame(0.0, Some(&mut painter));

    assert_eq!(painter.commands[0], DrawCmd::Clear);
    assert_eq!(painter.commands[1], DrawCmd::Fill { color: wash });
    assert_eq!(painter.circles(), 10);
}
