//! Built-in dispatching rules.
//!
//! - **Priority**: PRIORITY (urgent → low)
//! - **Due-date**: EDD, MST
//! - **Time-based**: SPT
//!
//! # Score Convention
//! All rules return lower scores for higher priority tasks. Instants are
//! scored as minutes since the Unix epoch.

use chrono::NaiveDateTime;

use super::{DispatchingRule, RuleScore, SchedulingContext};
use crate::models::Task;

fn epoch_minutes(instant: NaiveDateTime) -> f64 {
    instant.and_utc().timestamp() as f64 / 60.0
}

/// Priority weight.
///
/// Urgent (4) before high (3) before medium (2) before low (1).
#[derive(Debug, Clone, Copy)]
pub struct PriorityWeight;

impl DispatchingRule for PriorityWeight {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, task: &Task, _context: &SchedulingContext) -> RuleScore {
        -f64::from(task.priority.weight())
    }

    fn description(&self) -> &'static str {
        "Priority Weight"
    }
}

/// Earliest Due Date.
///
/// # Reference
/// Jackson (1955), optimal for minimizing maximum lateness on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Edd;

impl DispatchingRule for Edd {
    fn name(&self) -> &'static str {
        "EDD"
    }

    fn evaluate(&self, task: &Task, _context: &SchedulingContext) -> RuleScore {
        epoch_minutes(task.deadline)
    }

    fn description(&self) -> &'static str {
        "Earliest Due Date"
    }
}

/// Minimum Slack Time.
///
/// Slack = (deadline - now) - estimated duration, in minutes.
#[derive(Debug, Clone, Copy)]
pub struct Mst;

impl DispatchingRule for Mst {
    fn name(&self) -> &'static str {
        "MST"
    }

    fn evaluate(&self, task: &Task, context: &SchedulingContext) -> RuleScore {
        let until_deadline = (task.deadline - context.now).num_minutes();
        (until_deadline - i64::from(task.estimated_duration)) as f64
    }

    fn description(&self) -> &'static str {
        "Minimum Slack Time"
    }
}

/// Shortest Processing Time.
///
/// # Reference
/// Smith (1956), optimal for minimizing mean flow time on single machine.
#[derive(Debug, Clone, Copy)]
pub struct Spt;

impl DispatchingRule for Spt {
    fn name(&self) -> &'static str {
        "SPT"
    }

    fn evaluate(&self, task: &Task, _context: &SchedulingContext) -> RuleScore {
        f64::from(task.estimated_duration)
    }

    fn description(&self) -> &'static str {
        "Shortest Processing Time"
    }
}
