//! Schedule violation model.
//!
//! Violations are reported by [`audit_schedule`](crate::scheduler::audit_schedule)
//! when a task list breaks one of the placement invariants. A schedule
//! produced by the engine is expected to carry none except deadline misses
//! for overdue tasks.

use serde::{Deserialize, Serialize};

/// A placement invariant that a task list breaks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Type of violation.
    pub violation_type: ViolationType,
    /// Offending task ID.
    pub entity_id: String,
    /// Human-readable description.
    pub message: String,
    /// Severity (0-100, higher = worse).
    pub severity: i32,
}

/// Classification of violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ViolationType {
    /// Task starts before its `can_start_from`.
    EarlyStart,
    /// Task overlaps a timed event.
    EventOverlap,
    /// Two pending tasks overlap.
    TaskOverlap,
    /// Task starts before a scheduled dependency ends.
    PrecedenceViolation,
    /// Task ends after its deadline.
    DeadlineMiss,
}

impl Violation {
    fn new(
        violation_type: ViolationType,
        task_id: impl Into<String>,
        message: impl Into<String>,
        severity: i32,
    ) -> Self {
        Self {
            violation_type,
            entity_id: task_id.into(),
            message: message.into(),
            severity,
        }
    }

    /// Creates an early start violation.
    pub fn early_start(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::EarlyStart, task_id, message, 100)
    }

    /// Creates an event overlap violation.
    pub fn event_overlap(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::EventOverlap, task_id, message, 90)
    }

    /// Creates a task overlap violation.
    pub fn task_overlap(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::TaskOverlap, task_id, message, 90)
    }

    /// Creates a precedence violation.
    pub fn precedence_violation(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::PrecedenceViolation, task_id, message, 95)
    }

    /// Creates a deadline miss violation.
    pub fn deadline_miss(task_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationType::DeadlineMiss, task_id, message, 80)
    }

    /// Whether this violation breaks a hard placement invariant.
    ///
    /// Deadline misses are expected for overdue tasks and are not hard.
    pub fn is_hard(&self) -> bool {
        self.violation_type != ViolationType::DeadlineMiss
    }
}
