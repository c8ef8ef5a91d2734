//! Per-frame coalescing of submissions.

/// Holds at most one pending submission until the next frame.
///
/// Any number of submissions between two frames collapse into the last one;
/// earlier ones are dropped without being reconciled.
#[derive(Debug)]
pub struct FrameScheduler<T> {
    pending: Option<T>,
    superseded: u64,
}

impl<T> Default for FrameScheduler<T> {
    fn default() -> Self {
        Self {
            pending: None,
            superseded: 0,
        }
    }
}

impl<T> FrameScheduler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `value` for the next frame. Returns `true` if it replaced an
    /// earlier submission that never reached a frame.
    pub fn submit(&mut self, value: T) -> bool {
        let replaced = self.pending.replace(value).is_some();
        if replaced {
            self.superseded += 1;
        }
        replaced
    }

    /// Take the pending submission, if any.
    pub fn take(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Total submissions dropped because a newer one arrived first.
    pub fn superseded(&self) -> u64 {
        self.superseded
    }
}
