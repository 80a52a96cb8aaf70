//! Schedule quality metrics (KPIs).
//!
//! Computes scheduling performance indicators from the output of a pass.
//!
//! # Metrics
//!
//! | Metric | Definition |
//! |--------|-----------|
//! | Scheduled / Unscheduled | Open tasks with / without an interval |
//! | Overdue | Open tasks whose deadline is before `now` |
//! | Late | Scheduled tasks ending after their deadline |
//! | Total Tardiness | Sum of max(0, end - deadline) |
//! | Maximum Tardiness | Largest single delay |
//! | On-Time Rate | Fraction of scheduled tasks meeting deadlines |
//! | Scheduled Minutes | Total booked work |
//!
//! Completed tasks are counted but excluded from every other metric.
//!
//! # Reference
//! Pinedo (2016), "Scheduling", Ch. 1.2: Performance Measures

use chrono::NaiveDateTime;

use super::constraints::is_task_overdue;
use crate::models::Task;

/// Schedule performance indicators.
///
/// All durations are in minutes.
#[derive(Debug, Clone, PartialEq)]
pub struct ScheduleKpi {
    /// Number of tasks evaluated.
    pub total_tasks: usize,
    /// Tasks marked completed.
    pub completed_count: usize,
    /// Open tasks with a scheduled interval.
    pub scheduled_count: usize,
    /// IDs of open tasks left without an interval.
    pub unscheduled_ids: Vec<String>,
    /// Open tasks past their deadline at `now`.
    pub overdue_count: usize,
    /// Scheduled tasks ending after their deadline.
    pub late_count: usize,
    /// Sum of tardiness across scheduled tasks.
    pub total_tardiness_minutes: i64,
    /// Maximum tardiness of any single task.
    pub max_tardiness_minutes: i64,
    /// Fraction of scheduled tasks ending on time (0.0..1.0).
    pub on_time_rate: f64,
    /// Total minutes booked by scheduled tasks.
    pub scheduled_minutes: i64,
}

impl ScheduleKpi {
    /// Computes KPIs from a task list as returned by a scheduling pass.
    pub fn calculate(tasks: &[Task], now: NaiveDateTime) -> Self {
        let mut completed_count = 0;
        let mut scheduled_count = 0;
        let mut unscheduled_ids = Vec::new();
        let mut overdue_count = 0;
        let mut late_count = 0;
        let mut total_tardiness = 0;
        let mut max_tardiness = 0;
        let mut scheduled_minutes = 0;

        for task in tasks {
            if task.completed {
                completed_count += 1;
                continue;
            }
            if is_task_overdue(task, now) {
                overdue_count += 1;
            }

            let (Some(start), Some(end)) = (task.scheduled_start, task.effective_end()) else {
                unscheduled_ids.push(task.id.clone());
                continue;
            };
            scheduled_count += 1;
            scheduled_minutes += (end - start).num_minutes();

            if end > task.deadline {
                let tardiness = (end - task.deadline).num_minutes();
                late_count += 1;
                total_tardiness += tardiness;
                max_tardiness = max_tardiness.max(tardiness);
            }
        }

        let on_time_rate = if scheduled_count == 0 {
            1.0
        } else {
            (scheduled_count - late_count) as f64 / scheduled_count as f64
        };

        Self {
            total_tasks: tasks.len(),
            completed_count,
            scheduled_count,
            unscheduled_ids,
            overdue_count,
            late_count,
            total_tardiness_minutes: total_tardiness,
            max_tardiness_minutes: max_tardiness,
            on_time_rate,
            scheduled_minutes,
        }
    }

    /// Number of open tasks left without an interval.
    pub fn unscheduled_count(&self) -> usize {
        self.unscheduled_ids.len()
    }

    /// Whether the schedule meets the given quality thresholds.
    pub fn meets_thresholds(&self, max_tardiness_minutes: i64, max_unscheduled: usize) -> bool {
        self.max_tardiness_minutes <= max_tardiness_minutes
            && self.unscheduled_count() <= max_unscheduled
    }
}
