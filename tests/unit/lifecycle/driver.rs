use super::*;
use crate::config::model::ParticleConfig;
use crate::foundation::core::Viewport;
use crate::render::immediate::RecordingPainter;

fn mounted(count: usize) -> ParticleBackground<ManualScheduler> {
    let cfg = ParticleConfig {
        count,
        seed: Some(2),
        ..ParticleConfig::default()
    };
    let mut bg = ParticleBackground::new(cfg, ManualScheduler::new());
    bg.mount(Viewport::new(320.0, 240.0));
    bg
}

#[test]
fn rejects_non_positive_fps() {
    assert!(HeadlessDriver::new(0.0).is_err());
    assert!(HeadlessDriver::new(f64::NAN).is_err());
    assert!(HeadlessDriver::new(30.0).is_ok());
}

#[test]
fn stops_at_the_frame_limit() {
    let mut bg = mounted(8);
    let mut painter = RecordingPainter::new(Viewport::new(320.0, 240.0));
    let mut seen = Vec::new();

    let report = HeadlessDriver::new(60.0)
        .unwrap()
        .with_max_frames(4)
        .run(&mut bg, &mut painter, |i, p| {
            seen.push((i, p.circles()));
            p.commands.clear();
            Ok(())
        })
        .unwrap();

    assert_eq!(report.frames, 4);
    assert_eq!(report.reason, StopReason::FrameLimit);
    assert_eq!(seen, vec![(0, 8), (1, 8), (2, 8), (3, 8)]);
    assert_eq!(bg.state(), LifecycleState::Running);
}

#[test]
fn cancelled_token_stops_and_tears_down() {
    let mut bg = mounted(8);
    let mut painter = RecordingPainter::new(Viewport::new(320.0, 240.0));
    let driver = HeadlessDriver::new(60.0).unwrap();
    let token = driver.cancel_token();

    let report = driver
        .run(&mut bg, &mut painter, |i, _| {
            if i == 2 {
                token.cancel();
            }
            Ok(())
        })
        .unwrap();

    assert_eq!(report.frames, 3);
    assert_eq!(report.reason, StopReason::Cancelled);
    assert_eq!(bg.state(), LifecycleState::Stopped);
    assert_eq!(bg.scheduler().pending(), 0);
}

#[test]
fn sink_errors_propagate_and_stop_the_background() {
    let mut bg = mounted(3);
    let mut painter = RecordingPainter::new(Viewport::new(320.0, 240.0));
    let err = HeadlessDriver::new(30.0)
        .unwrap()
        .run(&mut bg, &mut painter, |_, _| {
            Err(crate::BackdropError::render("disk full"))
        })
        .unwrap_err();

    assert!(err.to_string().contains("disk full"));
    assert_eq!(bg.state(), LifecycleState::Stopped);
}

#[test]
fn unmounted_backgrounds_are_an_error() {
    let mut bg = ParticleBackground::new(ParticleConfig::default(), ManualScheduler::new());
    let mut painter = RecordingPainter::new(Viewport::new(10.0, 10.0));
    assert!(
        HeadlessDriver::new(30.0)
            .unwrap()
            .run(&mut bg, &mut painter, |_, _| Ok(()))
            .is_err()
    );
}
