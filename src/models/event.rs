//! Calendar event model.
//!
//! Events are fixed busy intervals. The scheduler never moves them.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// A fixed calendar event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    /// Unique event identifier.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Start instant (inclusive).
    pub start_date: NaiveDateTime,
    /// End instant (exclusive).
    pub end_date: NaiveDateTime,
    /// All-day events do not block task placement.
    #[serde(default)]
    pub all_day: bool,
}

impl Event {
    /// Creates a timed event.
    pub fn new(id: impl Into<String>, start_date: NaiveDateTime, end_date: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            start_date,
            end_date,
            all_day: false,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Marks the event as all-day.
    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// Whether this event blocks task placement.
    #[inline]
    pub fn blocks_time(&self) -> bool {
        !self.all_day
    }

    /// The event's interval.
    pub fn slot(&self) -> TimeSlot {
        TimeSlot::busy(self.start_date, self.end_date)
    }
}
