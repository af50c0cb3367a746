//! Rate limiting for pointer-move streams
//!
//! Moves arriving inside an open window are not queued: each one replaces the
//! previous pending value, so only the latest position of a window is ever
//! applied.

/// Per-gesture rate limiter keyed on the host clock (milliseconds)
#[derive(Debug, Clone)]
pub struct RateLimiter<T> {
    interval_ms: f64,
    last_applied: Option<f64>,
    pending: Option<T>,
}

impl<T> RateLimiter<T> {
    pub fn new(interval_ms: f64) -> Self {
        Self {
            interval_ms: interval_ms.max(0.0),
            last_applied: None,
            pending: None,
        }
    }

    fn window_open(&self, now_ms: f64) -> bool {
        match self.last_applied {
            None => true,
            Some(last) => now_ms - last >= self.interval_ms,
        }
    }

    /// Offer a value
    ///
    /// Returns it for immediate application when the window is open,
    /// otherwise keeps it as the pending value.
    pub fn offer(&mut self, now_ms: f64, value: T) -> Option<T> {
        if self.window_open(now_ms) {
            self.last_applied = Some(now_ms);
            self.pending = None;
            Some(value)
        } else {
            self.pending = Some(value);
            None
        }
    }

    /// Pending value whose window has reopened (trailing edge)
    pub fn take_due(&mut self, now_ms: f64) -> Option<T> {
        if self.pending.is_some() && self.window_open(now_ms) {
            self.last_applied = Some(now_ms);
            self.pending.take()
        } else {
            None
        }
    }

    /// Pending value regardless of the window
    pub fn flush(&mut self) -> Option<T> {
        self.pending.take()
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget pending value and window (new gesture)
    pub fn reset(&mut self) {
        self.last_applied = None;
        self.pending = None;
    }
}
