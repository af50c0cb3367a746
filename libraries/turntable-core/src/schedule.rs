//! Deferred tasks driven by the host clock
//!
//! The core never owns timers. Tasks are queued with a due time and run from
//! `Turntable::tick`, which re-validates state before acting.

use crate::loader::LoadEpoch;

/// Work deferred to a later tick
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Start playback after the load for `epoch` became ready
    AutoPlay { epoch: LoadEpoch },

    /// Resume playback interrupted by a scrub during load `epoch`
    ResumeAfterScrub { epoch: LoadEpoch },

    /// Show a transient notice
    ShowNotice(String),

    /// Hide the transient notice if it is still the given text
    ClearNotice(String),
}

#[derive(Debug, Clone)]
struct Scheduled {
    due_ms: f64,
    seq: u64,
    task: Task,
}

/// Queue of deferred tasks
#[derive(Debug, Default)]
pub struct Scheduler {
    now_ms: f64,
    seq: u64,
    tasks: Vec<Scheduled>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last clock value seen
    pub fn now(&self) -> f64 {
        self.now_ms
    }

    /// Advance the clock; time never goes backwards
    pub fn advance(&mut self, now_ms: f64) {
        if now_ms.is_finite() && now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    /// Queue `task` to run `delay_ms` after the current clock
    pub fn schedule(&mut self, delay_ms: f64, task: Task) {
        self.seq += 1;
        self.tasks.push(Scheduled {
            due_ms: self.now_ms + delay_ms.max(0.0),
            seq: self.seq,
            task,
        });
    }

    /// Remove and return every task due at the current clock, in due order
    pub fn take_due(&mut self) -> Vec<Task> {
        let now = self.now_ms;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.tasks.drain(..).partition(|t| t.due_ms <= now);
        self.tasks = pending;
        due.sort_by(|a, b| a.due_ms.total_cmp(&b.due_ms).then(a.seq.cmp(&b.seq)));
        due.into_iter().map(|t| t.task).collect()
    }

    /// Drop queued tasks matching the predicate
    pub fn cancel(&mut self, predicate: impl Fn(&Task) -> bool) {
        self.tasks.retain(|t| !predicate(&t.task));
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}
