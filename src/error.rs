//! Error types.
//!
//! Scheduling outcomes (unplaceable tasks, cycles, dangling references)
//! are values, not errors. Only malformed configuration is reported here.

use thiserror::Error;

/// Invalid scheduling configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A time of day was not `HH:MM`.
    #[error("invalid time of day '{0}', expected HH:MM")]
    InvalidTimeOfDay(String),

    /// Working hours end at or before they start.
    #[error("working hours must start before they end ({start} >= {end})")]
    EmptyWorkingWindow { start: String, end: String },

    /// Working hours are shorter than the minimum slot.
    #[error("working window of {minutes} min is below the {minimum} min minimum slot")]
    WorkingWindowTooShort { minutes: i64, minimum: i64 },

    /// `max_tasks_per_day` is zero.
    #[error("maxTasksPerDay must be at least 1")]
    ZeroTasksPerDay,
}
