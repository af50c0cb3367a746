//! Tonearm drag gesture
//!
//! The arm rotates around a fixed pivot. At gesture start the offset between
//! the pointer angle and the arm's rotation is captured; moves then rotate the
//! arm by the same relative amount, clamped to the drag limits. On release
//! the arm snaps to whichever anchor is nearer: START means play, RESTING
//! means pause.

use crate::geometry::{pointer_angle, Point};
use crate::throttle::RateLimiter;
use crate::types::TonearmConfig;

/// Anchor the arm settles on after a drag
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TonearmAnchor {
    /// Over the record: play
    Start,
    /// Parked: pause
    Resting,
}

/// Nearest anchor for a rotation; exact ties go to RESTING
pub fn nearest_anchor(rotation: f64, config: &TonearmConfig) -> TonearmAnchor {
    if (rotation - config.start_angle).abs() < (rotation - config.resting_angle).abs() {
        TonearmAnchor::Start
    } else {
        TonearmAnchor::Resting
    }
}

/// Drag controller; one gesture at a time
#[derive(Debug, Clone)]
pub struct TonearmGesture {
    config: TonearmConfig,
    limiter: RateLimiter<Point>,
    pivot: Point,
    drag_start_angle: f64,
    rotation: f64,
    active: bool,
}

impl TonearmGesture {
    pub fn new(config: TonearmConfig) -> Self {
        let limiter = RateLimiter::new(config.throttle_ms);
        let rotation = config.resting_angle;
        Self {
            config,
            limiter,
            pivot: Point::default(),
            drag_start_angle: 0.0,
            rotation,
            active: false,
        }
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Rotation applied by the last move
    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn anchor_angle(&self, anchor: TonearmAnchor) -> f64 {
        match anchor {
            TonearmAnchor::Start => self.config.start_angle,
            TonearmAnchor::Resting => self.config.resting_angle,
        }
    }

    /// Begin a drag
    ///
    /// `current_rotation` is the arm's rotation when grabbed (RESTING when
    /// unknown); `pivot` is measured once and kept for the whole gesture.
    pub fn start(&mut self, pivot: Point, pointer: Point, current_rotation: Option<f64>) {
        let rotation = current_rotation
            .filter(|r| r.is_finite())
            .unwrap_or(self.config.resting_angle);
        self.pivot = pivot;
        self.rotation = rotation;
        self.drag_start_angle = pointer_angle(pivot, pointer) - rotation;
        self.limiter.reset();
        self.active = true;
    }

    fn rotation_for(&self, pointer: Point) -> f64 {
        (pointer_angle(self.pivot, pointer) - self.drag_start_angle)
            .clamp(self.config.min_angle, self.config.max_angle)
    }

    /// Pointer moved; returns the new rotation when it is applied now
    pub fn drag(&mut self, now_ms: f64, pointer: Point) -> Option<f64> {
        if !self.active {
            return None;
        }
        let pointer = self.limiter.offer(now_ms, pointer)?;
        self.rotation = self.rotation_for(pointer);
        Some(self.rotation)
    }

    /// Apply a move held back by the rate limiter once its window reopens
    pub fn drag_due(&mut self, now_ms: f64) -> Option<f64> {
        if !self.active {
            return None;
        }
        let pointer = self.limiter.take_due(now_ms)?;
        self.rotation = self.rotation_for(pointer);
        Some(self.rotation)
    }

    /// End the drag and pick the anchor to snap to
    ///
    /// A move still held back by the rate limiter is applied first.
    pub fn release(&mut self) -> Option<TonearmAnchor> {
        if !self.active {
            return None;
        }
        if let Some(pointer) = self.limiter.flush() {
            self.rotation = self.rotation_for(pointer);
        }
        self.active = false;
        let anchor = nearest_anchor(self.rotation, &self.config);
        self.rotation = self.anchor_angle(anchor);
        Some(anchor)
    }
}
