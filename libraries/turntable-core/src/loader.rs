//! Load request bookkeeping
//!
//! Every `load_track` call starts a new epoch. Ready/error callbacks carry the
//! epoch they were issued for and are honoured only while it is still the
//! current one, and at most once each.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Sequence number of a load request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct LoadEpoch(u64);

impl LoadEpoch {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub const fn value(self) -> u64 {
        self.0
    }

    fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

impl fmt::Display for LoadEpoch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A load whose one-shot handlers are still armed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingLoad {
    pub epoch: LoadEpoch,
    pub index: usize,
    pub autoplay: bool,
    ready_armed: bool,
    error_armed: bool,
}

/// Tracks the current load epoch and its one-shot handlers
#[derive(Debug, Default)]
pub struct LoadTracker {
    epoch: LoadEpoch,
    pending: Option<PendingLoad>,
}

impl LoadTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new load, detaching the handlers of any previous one
    pub fn begin(&mut self, index: usize, autoplay: bool) -> LoadEpoch {
        self.epoch = self.epoch.next();
        self.pending = Some(PendingLoad {
            epoch: self.epoch,
            index,
            autoplay,
            ready_armed: true,
            error_armed: true,
        });
        self.epoch
    }

    pub fn current(&self) -> LoadEpoch {
        self.epoch
    }

    pub fn is_current(&self, epoch: LoadEpoch) -> bool {
        self.epoch == epoch
    }

    pub fn pending(&self) -> Option<&PendingLoad> {
        self.pending.as_ref()
    }

    /// Fire the ready handler for `epoch`
    ///
    /// Returns the load only for the current epoch and only the first time.
    pub fn take_ready(&mut self, epoch: LoadEpoch) -> Option<PendingLoad> {
        let pending = self.pending.as_mut().filter(|p| p.epoch == epoch)?;
        if !pending.ready_armed {
            return None;
        }
        pending.ready_armed = false;
        Some(*pending)
    }

    /// Fire the error handler for `epoch`, same rules as [`Self::take_ready`]
    pub fn take_error(&mut self, epoch: LoadEpoch) -> Option<PendingLoad> {
        let pending = self.pending.as_mut().filter(|p| p.epoch == epoch)?;
        if !pending.error_armed {
            return None;
        }
        pending.error_armed = false;
        Some(*pending)
    }

    /// Drop the current load's handlers without starting a new one
    pub fn detach(&mut self) {
        self.pending = None;
    }
}
