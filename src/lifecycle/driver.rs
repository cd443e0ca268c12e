use crate::foundation::error::{BackdropError, BackdropResult};
use crate::lifecycle::cancel::CancelToken;
use crate::lifecycle::controller::{FrameOutcome, LifecycleState, ParticleBackground};
use crate::lifecycle::scheduler::ManualScheduler;
use crate::render::immediate::Painter;

/// Why [`HeadlessDriver::run`] returned.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StopReason {
    /// `max_frames` were painted.
    FrameLimit,
    /// The driver's token was cancelled.
    Cancelled,
    /// The background stopped requesting frames.
    Idle,
}

/// Summary of one driver run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DriverReport {
    /// Frames handed to the sink.
    pub frames: u64,
    /// Why the loop ended.
    pub reason: StopReason,
}

/// Fixed-rate frame loop for backgrounds without a host display.
#[derive(Clone, Debug)]
pub struct HeadlessDriver {
    fps: f64,
    max_frames: Option<u64>,
    cancel: CancelToken,
}

impl HeadlessDriver {
    /// Loop at `fps` frames per second of animation time.
    pub fn new(fps: f64) -> BackdropResult<Self> {
        if !(fps > 0.0 && fps.is_finite()) {
            return Err(BackdropError::validation(format!(
                "fps must be positive and finite, got {fps}"
            )));
        }
        Ok(Self {
            fps,
            max_frames: None,
            cancel: CancelToken::new(),
        })
    }

    /// Stop after `n` painted frames.
    pub fn with_max_frames(mut self, n: u64) -> Self {
        self.max_frames = Some(n);
        self
    }

    /// Token that ends the loop before its next iteration.
    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    /// Drain `background`'s scheduler, painting onto `surface` and handing each painted frame
    /// to `sink` as `(frame_index, surface)`.
    ///
    /// The background must already be mounted. A sink error stops the loop and tears the
    /// background down.
    #[tracing::instrument(skip_all, fields(fps = self.fps, max_frames = ?self.max_frames))]
    pub fn run<P, F>(
        &self,
        background: &mut ParticleBackground<ManualScheduler>,
        surface: &mut P,
        mut sink: F,
    ) -> BackdropResult<DriverReport>
    where
        P: Painter,
        F: FnMut(u64, &mut P) -> BackdropResult<()>,
    {
        let mut frames = 0u64;
        let reason = loop {
            if self.cancel.is_cancelled() {
                background.unmount();
                break StopReason::Cancelled;
            }
            if self.max_frames.is_some_and(|max| frames >= max) {
                break StopReason::FrameLimit;
            }
            if background.scheduler_mut().take_due().is_none() {
                break StopReason::Idle;
            }

            let now = frames as f64 / self.fps;
            match background.frame(now, Some(&mut *surface)) {
                FrameOutcome::Painted => {
                    if let Err(err) = sink(frames, surface) {
                        background.unmount();
                        return Err(err);
                    }
                    frames += 1;
                }
                FrameOutcome::NoSurface => {}
                FrameOutcome::Inactive => break StopReason::Idle,
            }
        };

        tracing::debug!(frames, ?reason, "driver stopped");
        if reason == StopReason::Idle && background.state() == LifecycleState::Uninitialized {
            return Err(BackdropError::validation(
                "background must be mounted before it is driven",
            ));
        }
        Ok(DriverReport { frames, reason })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/lifecycle/driver.rs"]
mod tests;
