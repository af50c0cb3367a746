//! Progress scrub gesture
//!
//! Converts pointer positions over the progress container into seek
//! decisions. The displayed bar follows the pointer exactly; the transport is
//! only asked to seek when the target moved by more than the epsilon.

use crate::geometry::{Point, Rect};
use crate::throttle::RateLimiter;
use crate::types::ScrubConfig;

/// Result of one drag update
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrubUpdate {
    /// Position along the bar, `[0, 1]`
    pub fraction: f64,

    /// Seek target in seconds, `None` when within epsilon of the current time
    pub seek_to: Option<f64>,
}

/// Seek decision for a pointer at `x`
///
/// `None` when the duration is unknown: nothing should change.
pub fn scrub_target(
    bounds: &Rect,
    x: f64,
    duration: Option<f64>,
    current_time: f64,
    epsilon: f64,
) -> Option<ScrubUpdate> {
    let duration = duration?;
    let fraction = bounds.fraction_at(x);
    let target = fraction * duration;
    let seek_to = ((current_time - target).abs() > epsilon).then_some(target);
    Some(ScrubUpdate { fraction, seek_to })
}

/// Scrub controller; owns its bounds and rate limiter for one gesture
#[derive(Debug, Clone)]
pub struct ProgressScrub {
    config: ScrubConfig,
    limiter: RateLimiter<Point>,
    bounds: Rect,
    active: bool,
}

impl ProgressScrub {
    pub fn new(config: ScrubConfig) -> Self {
        let limiter = RateLimiter::new(config.throttle_ms);
        Self {
            config,
            limiter,
            bounds: Rect::default(),
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn resume_delay_ms(&self) -> f64 {
        self.config.resume_delay_ms
    }

    /// Begin a scrub over a container measured once at gesture start
    pub fn start(&mut self, bounds: Rect) {
        self.bounds = bounds;
        self.limiter.reset();
        self.active = true;
    }

    /// Rate-limit a move; returns the pointer to apply now, if any
    pub fn offer(&mut self, now_ms: f64, pointer: Point) -> Option<Point> {
        if !self.active {
            return None;
        }
        self.limiter.offer(now_ms, pointer)
    }

    /// Pointer held back by the limiter whose window has reopened
    pub fn take_due(&mut self, now_ms: f64) -> Option<Point> {
        if !self.active {
            return None;
        }
        self.limiter.take_due(now_ms)
    }

    /// Seek decision for a pointer within the captured bounds
    pub fn update(&self, pointer: Point, duration: Option<f64>, current_time: f64) -> Option<ScrubUpdate> {
        scrub_target(
            &self.bounds,
            pointer.x,
            duration,
            current_time,
            self.config.seek_epsilon_secs,
        )
    }

    /// End the scrub; pending moves are dropped in favour of the release position
    pub fn finish(&mut self) {
        self.limiter.reset();
        self.active = false;
    }
}
