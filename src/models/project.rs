//! Project model.
//!
//! A project bounds its tasks: deadlines are clamped into the project
//! window and no task may start before the project does.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A project window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    /// Unique project identifier.
    pub id: String,
    /// Human-readable name.
    #[serde(default)]
    pub name: String,
    /// No task of the project starts before this instant.
    pub start_date: NaiveDateTime,
    /// Task deadlines are clamped to this instant.
    pub deadline: NaiveDateTime,
}

impl Project {
    /// Creates a project spanning `[start_date, deadline]`.
    pub fn new(id: impl Into<String>, start_date: NaiveDateTime, deadline: NaiveDateTime) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            start_date,
            deadline,
        }
    }

    /// Sets the name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Whether the window is well-formed (start not after deadline).
    pub fn is_valid_window(&self) -> bool {
        self.start_date <= self.deadline
    }

    /// Clamps an instant into `[start_date, deadline]`.
    ///
    /// An inverted window resolves to `start_date`.
    pub fn clamp(&self, instant: NaiveDateTime) -> NaiveDateTime {
        instant.min(self.deadline).max(self.start_date)
    }
}
