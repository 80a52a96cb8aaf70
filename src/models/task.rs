//! Task model.
//!
//! A task is a unit of work with a deadline, a priority and an estimated
//! duration. The scheduler fills in `scheduled_start`/`scheduled_end` and
//! maintains `can_start_from`; everything else is owned by the host.
//!
//! # Time Representation
//! All instants are wall-clock [`NaiveDateTime`]s in the calendar's own
//! timezone. Working hours are interpreted in that same clock.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};

use super::TimeSlot;

/// Task priority.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
}

impl Priority {
    /// Ranking weight (higher = scheduled first).
    pub fn weight(self) -> u8 {
        match self {
            Priority::Urgent => 4,
            Priority::High => 3,
            Priority::Medium => 2,
            Priority::Low => 1,
        }
    }
}

/// A task to be placed on the calendar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Human-readable title.
    #[serde(default)]
    pub title: String,
    /// Latest completion instant.
    pub deadline: NaiveDateTime,
    /// Ranking priority.
    #[serde(default)]
    pub priority: Priority,
    /// Estimated duration in minutes.
    pub estimated_duration: u32,
    /// Completed tasks occupy no time and are never moved.
    #[serde(default)]
    pub completed: bool,
    /// Placed start (inclusive).
    #[serde(default)]
    pub scheduled_start: Option<NaiveDateTime>,
    /// Placed end (exclusive).
    #[serde(default)]
    pub scheduled_end: Option<NaiveDateTime>,
    /// Earliest instant the task may be placed.
    #[serde(default)]
    pub can_start_from: Option<NaiveDateTime>,
    /// IDs of tasks that must finish first.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Owning project, if any.
    #[serde(default)]
    pub project_id: Option<String>,

    // Carried through untouched; placement does not read these yet.
    /// Minutes to keep free before the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_before: Option<u32>,
    /// Minutes to keep free after the task.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_after: Option<u32>,
    /// Whether the task may be split across slots.
    #[serde(default)]
    pub allow_splitting: bool,
    /// Chunk length in minutes when splitting.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub split_duration: Option<u32>,
}

impl Task {
    /// Creates a task with the given ID, deadline and duration (minutes).
    pub fn new(id: impl Into<String>, deadline: NaiveDateTime, estimated_duration: u32) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            deadline,
            priority: Priority::default(),
            estimated_duration,
            completed: false,
            scheduled_start: None,
            scheduled_end: None,
            can_start_from: None,
            dependencies: Vec::new(),
            project_id: None,
            buffer_before: None,
            buffer_after: None,
            allow_splitting: false,
            split_duration: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the earliest permitted start.
    pub fn with_can_start_from(mut self, instant: NaiveDateTime) -> Self {
        self.can_start_from = Some(instant);
        self
    }

    /// Adds a dependency.
    pub fn with_dependency(mut self, task_id: impl Into<String>) -> Self {
        self.dependencies.push(task_id.into());
        self
    }

    /// Attaches the task to a project.
    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Marks the task completed.
    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Places the task at `start`, deriving the end from the duration.
    pub fn scheduled_at(mut self, start: NaiveDateTime) -> Self {
        self.scheduled_start = Some(start);
        self.scheduled_end = Some(start + self.duration());
        self
    }

    /// Removes any placement.
    pub fn unscheduled(mut self) -> Self {
        self.scheduled_start = None;
        self.scheduled_end = None;
        self
    }

    /// Estimated duration.
    #[inline]
    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.estimated_duration))
    }

    /// Whether both schedule fields are set.
    pub fn is_scheduled(&self) -> bool {
        self.scheduled_start.is_some() && self.scheduled_end.is_some()
    }

    /// Scheduled end, defaulting to start + duration when only the start is set.
    pub fn effective_end(&self) -> Option<NaiveDateTime> {
        let start = self.scheduled_start?;
        Some(self.scheduled_end.unwrap_or(start + self.duration()))
    }

    /// Occupied interval, if both schedule fields are set.
    pub fn scheduled_slot(&self) -> Option<TimeSlot> {
        match (self.scheduled_start, self.scheduled_end) {
            (Some(start), Some(end)) => Some(TimeSlot::busy(start, end)),
            _ => None,
        }
    }
}
