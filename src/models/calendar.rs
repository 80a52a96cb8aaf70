//! Time slot model.
//!
//! A [`TimeSlot`] is a half-open interval `[start, end)` tagged as free or
//! busy. Free slots are produced by the window index; busy slots describe
//! events and placed tasks. Slots are transient and never persisted.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A time interval [start, end).
///
/// Half-open interval: includes start, excludes end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSlot {
    /// Interval start (inclusive).
    pub start: NaiveDateTime,
    /// Interval end (exclusive).
    pub end: NaiveDateTime,
    /// Whether the interval is free for placement.
    pub available: bool,
}

impl TimeSlot {
    /// Creates a free slot.
    pub fn free(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            available: true,
        }
    }

    /// Creates a busy interval.
    pub fn busy(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            available: false,
        }
    }

    /// Length of this slot.
    #[inline]
    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Whether an instant falls within this slot.
    #[inline]
    pub fn contains(&self, instant: NaiveDateTime) -> bool {
        instant >= self.start && instant < self.end
    }

    /// Whether two slots overlap. Touching intervals do not overlap.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.start < other.end && other.start < self.end
    }
}
