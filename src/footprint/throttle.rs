//! Rate limiting of downstream rebuild requests during a drag

use std::time::{Duration, Instant};

/// Coalesces rebuild requests to at most one per interval.
///
/// Requests arriving inside the interval are remembered as pending and
/// released by the next request after the interval, or by [`flush`](Self::flush).
#[derive(Debug, Clone)]
pub struct RebuildThrottle {
    interval: Duration,
    last_emit: Option<Instant>,
    pending: bool,
}

impl RebuildThrottle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: false,
        }
    }

    /// Register a change. Returns `true` when a rebuild should run now.
    pub fn request(&mut self, now: Instant) -> bool {
        let due = match self.last_emit {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if due {
            self.last_emit = Some(now);
            self.pending = false;
        } else {
            self.pending = true;
        }
        due
    }

    /// Release any waiting request and reset. Returns `true` when one was pending.
    pub fn flush(&mut self) -> bool {
        let pending = self.pending;
        self.pending = false;
        self.last_emit = None;
        pending
    }
}
