use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::foundation::core::{Point, Viewport};

/// Stimulus reported by the host: pointer movement and viewport resizes.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "event")]
pub enum InteractionEvent {
    /// Pointer moved to `(x, y)` in surface pixels.
    PointerMoved {
        /// Horizontal pixel coordinate.
        x: f64,
        /// Vertical pixel coordinate.
        y: f64,
    },
    /// Pointer left the surface.
    PointerLeft,
    /// Surface was resized.
    Resized {
        /// New width in pixels.
        width: f64,
        /// New height in pixels.
        height: f64,
    },
}

/// Latest observed input; copied out once per frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct InputSnapshot {
    /// Pointer in surface pixels, `None` when absent.
    pub pointer: Option<Point>,
    /// Most recent viewport size, if any resize was reported.
    pub viewport: Option<Viewport>,
    /// Incremented on every resize.
    pub resize_count: u64,
}

#[derive(Debug, Default)]
struct Shared {
    snapshot: Mutex<InputSnapshot>,
    attached: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, InputSnapshot> {
        // A panicking writer cannot leave a snapshot half-written: every field is Copy.
        self.snapshot.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Reader side of one particle set's input state.
///
/// Exactly one [`InputWriter`] exists per cell, so input has a single owner even when the
/// writer lives on another thread.
#[derive(Debug)]
pub struct InputCell {
    shared: Arc<Shared>,
}

/// The only handle allowed to publish input into an [`InputCell`].
#[derive(Debug)]
pub struct InputWriter {
    shared: Arc<Shared>,
}

impl InputCell {
    /// New attached cell and its writer.
    pub fn new() -> (Self, InputWriter) {
        let shared = Arc::new(Shared {
            snapshot: Mutex::new(InputSnapshot::default()),
            attached: AtomicBool::new(true),
        });
        (
            Self {
                shared: Arc::clone(&shared),
            },
            InputWriter { shared },
        )
    }

    /// Copy of the latest input.
    pub fn snapshot(&self) -> InputSnapshot {
        *self.shared.lock()
    }

    /// Stop accepting events; later writes are dropped.
    pub fn detach(&self) {
        self.shared.attached.store(false, Ordering::Release);
    }

    /// `true` until [`InputCell::detach`] is called.
    pub fn is_attached(&self) -> bool {
        self.shared.attached.load(Ordering::Acquire)
    }
}

impl InputWriter {
    /// Publish one event. Returns `false` when the owning particle set has been torn down.
    pub fn push(&self, event: InteractionEvent) -> bool {
        if !self.shared.attached.load(Ordering::Acquire) {
            return false;
        }
        let mut snap = self.shared.lock();
        match event {
            InteractionEvent::PointerMoved { x, y } => {
                snap.pointer = (x.is_finite() && y.is_finite()).then(|| Point::new(x, y));
            }
            InteractionEvent::PointerLeft => snap.pointer = None,
            InteractionEvent::Resized { width, height } => {
                snap.viewport = Some(Viewport::new(width, height));
                snap.resize_count = snap.resize_count.wrapping_add(1);
            }
        }
        true
    }

    /// `true` while the owning particle set is running.
    pub fn is_attached(&self) -> bool {
        self.shared.attached.load(Ordering::Acquire)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/input/cell.rs"]
mod tests;
