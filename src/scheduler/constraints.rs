//! Per-task constraint resolution.
//!
//! Classifies tasks, applies project bounds and computes the earliest
//! instant a task may start. The resulting floor combines, in order:
//!
//! 1. the task's `can_start_from` (or `now` when unset),
//! 2. `now` itself, since nothing is placed in the past,
//! 3. `end + buffer` of every dependency already placed.
//!
//! # Bidirectional propagation
//! A project's start feeds `can_start_from`. On a reschedule pass, a
//! project that moved earlier than the recorded floor lets the task move
//! earlier too; otherwise the floor only rises. `now` is always a hard
//! lower bound.

use std::collections::HashMap;

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, error, warn};

use crate::config::SchedulingOptions;
use crate::models::{Project, Task};

/// Placement class of a task at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskState {
    /// Marked completed; occupies no time.
    Completed,
    /// Scheduled interval contains `now`; never moved.
    InProgress,
    /// Eligible for (re-)placement.
    Schedulable,
}

/// Classifies a task at `now`.
pub fn classify(task: &Task, now: NaiveDateTime) -> TaskState {
    if task.completed {
        return TaskState::Completed;
    }
    match (task.scheduled_start, task.effective_end()) {
        (Some(start), Some(end)) if start <= now && now < end => TaskState::InProgress,
        _ => TaskState::Schedulable,
    }
}

/// Whether a task is past its deadline and not completed.
///
/// `can_start_from` never affects overdue status.
pub fn is_task_overdue(task: &Task, now: NaiveDateTime) -> bool {
    !task.completed && task.deadline < now
}

/// Resolves project bounds and start floors for one scheduling pass.
#[derive(Debug, Clone)]
pub struct ConstraintResolver<'a> {
    projects: HashMap<&'a str, &'a Project>,
    buffer: Duration,
    now: NaiveDateTime,
}

impl<'a> ConstraintResolver<'a> {
    /// Creates a resolver for a pass running at `now`.
    pub fn new(projects: &'a [Project], options: &SchedulingOptions, now: NaiveDateTime) -> Self {
        let mut by_id = HashMap::with_capacity(projects.len());
        for project in projects {
            by_id.entry(project.id.as_str()).or_insert(project);
        }
        Self {
            projects: by_id,
            buffer: options.buffer(),
            now,
        }
    }

    /// The instant this pass runs at.
    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Classifies a task at this pass's `now`.
    pub fn classify(&self, task: &Task) -> TaskState {
        classify(task, self.now)
    }

    /// Looks up a project by ID.
    pub fn project(&self, id: &str) -> Option<&'a Project> {
        self.projects.get(id).copied()
    }

    /// Returns the task with its project's bounds applied.
    ///
    /// The deadline is clamped into the project window. `can_start_from`
    /// follows the bidirectional rule:
    ///
    /// | pass | existing floor | result |
    /// |------|----------------|--------|
    /// | first pass | any | `max(project.start, now)` |
    /// | reschedule | unset | `max(project.start, now)` |
    /// | reschedule | `project.start < existing` | `max(project.start, now)` |
    /// | reschedule | otherwise | `max(existing, project.start, now)` |
    pub fn apply_project_constraints(&self, task: &Task, is_rescheduling: bool) -> Task {
        let Some(project_id) = task.project_id.as_deref() else {
            return task.clone();
        };
        let Some(project) = self.project(project_id) else {
            warn!(
                task = %task.id,
                project = %project_id,
                "unknown project; skipping project bounds"
            );
            return task.clone();
        };
        if !project.is_valid_window() {
            warn!(project = %project.id, "project starts after its deadline");
        }

        let mut constrained = task.clone();
        constrained.deadline = project.clamp(task.deadline);

        let project_floor = project.start_date.max(self.now);
        let can_start_from = match (is_rescheduling, task.can_start_from) {
            (true, Some(existing)) if project.start_date < existing => project_floor,
            (true, Some(existing)) => existing.max(project_floor),
            _ => project_floor,
        };
        if task.can_start_from != Some(can_start_from) {
            debug!(
                task = %task.id,
                from = ?task.can_start_from,
                to = %can_start_from,
                "project bound moved start floor"
            );
        }
        constrained.can_start_from = Some(can_start_from);
        constrained
    }

    /// Earliest permissible start for `task`.
    ///
    /// Dependencies found in `completed` are satisfied. Dependencies found
    /// in `scheduled` raise the floor to their end plus the buffer.
    /// Anything else is ignored with a warning.
    pub fn calculate_earliest_start(
        &self,
        task: &Task,
        completed: &[Task],
        scheduled: &[Task],
    ) -> NaiveDateTime {
        let mut floor = task
            .can_start_from
            .map_or(self.now, |from| from.max(self.now));

        for dep in &task.dependencies {
            if completed.iter().any(|t| t.id == *dep) {
                continue;
            }
            match scheduled
                .iter()
                .find(|t| t.id == *dep)
                .and_then(Task::effective_end)
            {
                Some(end) => floor = floor.max(end + self.buffer),
                None => {
                    warn!(task = %task.id, dependency = %dep, "dependency not placed; ignoring")
                }
            }
        }

        if let Some(from) = task.can_start_from {
            if floor < from {
                error!(
                    task = %task.id,
                    %floor,
                    %from,
                    "earliest start below can_start_from; correcting"
                );
                floor = from;
            }
        }

        floor
    }
}
