//! Scheduling context for dispatching rule evaluation.

use chrono::NaiveDateTime;

/// Runtime state passed to dispatching rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SchedulingContext {
    /// The instant the scheduling pass runs at.
    pub now: NaiveDateTime,
}

impl SchedulingContext {
    /// Creates a context at the given instant.
    pub fn at_time(now: NaiveDateTime) -> Self {
        Self { now }
    }
}
