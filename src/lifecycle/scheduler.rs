use std::collections::VecDeque;

/// Ticket for one requested frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Host frame source (a display-refresh callback, a timer, a test queue).
pub trait FrameScheduler {
    /// Ask for one future call to the frame function.
    fn request_frame(&mut self) -> FrameHandle;

    /// Withdraw a request. Unknown or already delivered handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);
}

/// FIFO of requested frames, drained explicitly by the caller.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    next_id: u64,
    queue: VecDeque<FrameHandle>,
    requested: u64,
    cancelled: u64,
}

impl ManualScheduler {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pop the oldest outstanding request.
    pub fn take_due(&mut self) -> Option<FrameHandle> {
        self.queue.pop_front()
    }

    /// Outstanding requests.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Requests made so far.
    pub fn requested(&self) -> u64 {
        self.requested
    }

    /// Requests withdrawn before delivery.
    pub fn cancelled(&self) -> u64 {
        self.cancelled
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_frame(&mut self) -> FrameHandle {
        let handle = FrameHandle(self.next_id);
        self.next_id += 1;
        self.requested += 1;
        self.queue.push_back(handle);
        handle
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        let before = self.queue.len();
        self.queue.retain(|&h| h != handle);
        if self.queue.len() != before {
            self.cancelled += 1;
        }
    }
}
