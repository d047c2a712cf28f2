//! Signal-loss monitor.
//!
//! Remembers when the capture queue last produced a batch.  If the line
//! then stays silent for longer than the window, whatever evidence was
//! collected belongs to a signal that is gone (handset power-cycled,
//! rebinding) and must not bias the next one.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdleMonitor {
    window_ms: u32,
    last_activity_ms: u32,
}

impl IdleMonitor {
    pub fn new(window_ms: u32) -> Self {
        Self {
            window_ms,
            last_activity_ms: 0,
        }
    }

    /// Record a successful batch retrieval at `now_ms`.
    pub fn mark_activity(&mut self, now_ms: u32) {
        self.last_activity_ms = now_ms;
    }

    /// True when strictly more than the window has elapsed since the last
    /// activity.  Wraps with the millisecond counter.
    pub fn is_stale(&self, now_ms: u32) -> bool {
        now_ms.wrapping_sub(self.last_activity_ms) > self.window_ms
    }
}
