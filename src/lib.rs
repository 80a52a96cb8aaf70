//! Constraint-based task auto-scheduling.
//!
//! Places tasks with deadlines, priorities, durations and dependencies
//! onto a working-hours calendar around fixed events, bounded by their
//! projects. Re-scheduling moves start floors in both directions when a
//! project moves, and never places work before "now".
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Task`, `Event`, `Project`, `TimeSlot`, `Violation`
//! - **`config`**: Working hours and scheduling options
//! - **`dependency`**: Dependency graph, ordering and cycle handling
//! - **`dispatching`**: Rule engine that ranks tasks for placement
//! - **`scheduler`**: The scheduling pass, invariant audit and KPIs
//! - **`validation`**: Input integrity checks (duplicate IDs, cycles, dangling refs)
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use u_autoschedule::models::{Priority, Task};
//! use u_autoschedule::scheduler::{AutoScheduler, ScheduleRequest};
//!
//! let monday = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap();
//! let now = monday.and_hms_opt(8, 0, 0).unwrap();
//! let deadline = monday.and_hms_opt(18, 0, 0).unwrap();
//!
//! let tasks = vec![
//!     Task::new("draft", deadline, 60).with_priority(Priority::High),
//!     Task::new("review", deadline, 30).with_dependency("draft"),
//! ];
//! let request = ScheduleRequest::new(tasks, vec![]).at(now);
//! let out = AutoScheduler::default().schedule_request(&request);
//!
//! assert_eq!(out[0].scheduled_start, monday.and_hms_opt(9, 0, 0));
//! // 15 minute buffer after the dependency
//! assert_eq!(out[1].scheduled_start, monday.and_hms_opt(10, 15, 0));
//! ```
//!
//! # Logging
//!
//! Diagnostics go through `tracing`; no subscriber is installed here.
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems"
//! - Brucker (2007), "Scheduling Algorithms"

pub mod config;
pub mod dependency;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod scheduler;
pub mod validation;

use chrono::Local;

pub use config::{SchedulingOptions, SchedulingOverrides, WorkingHours};
pub use error::ConfigError;
pub use models::{Event, Priority, Project, Task};
pub use scheduler::AutoScheduler;

/// Schedules every eligible task at the current local time.
///
/// `options` override the defaults field by field. Returns every input
/// task exactly once, or the configuration error.
pub fn schedule_tasks_automatically(
    tasks: &[Task],
    events: &[Event],
    options: &SchedulingOverrides,
    projects: &[Project],
) -> Result<Vec<Task>, ConfigError> {
    let options = SchedulingOptions::default().merged(options)?;
    let now = Local::now().naive_local();
    Ok(AutoScheduler::new(options).schedule(tasks, events, projects, now, false))
}

/// Reschedules after events or projects changed, at the current local time.
///
/// Existing `can_start_from` values are treated as results of a previous
/// pass, so a project that moved earlier lets its tasks move earlier.
pub fn reschedule_after_event_change(
    tasks: &[Task],
    events: &[Event],
    options: &SchedulingOverrides,
    projects: &[Project],
) -> Result<Vec<Task>, ConfigError> {
    let options = SchedulingOptions::default().merged(options)?;
    let now = Local::now().naive_local();
    Ok(AutoScheduler::new(options).reschedule_all(tasks, events, projects, now))
}
