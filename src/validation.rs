//! Input validation for scheduling passes.
//!
//! Checks structural integrity of tasks and projects before scheduling.
//! The scheduler itself tolerates every problem reported here (it skips
//! dangling references and breaks cycles), so this is a report for the
//! host, never a repair. Detects:
//! - Duplicate IDs
//! - Self, unknown and circular dependencies
//! - Unknown or inverted projects
//! - Zero durations and half-set schedule fields
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::HashSet;

use crate::dependency::DependencyGraph;
use crate::models::{Project, Task};

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A task lists itself as a dependency.
    SelfDependency,
    /// A dependency references a task that doesn't exist.
    UnknownDependency,
    /// A task references a project that doesn't exist.
    UnknownProject,
    /// A task has an estimated duration of zero.
    ZeroDuration,
    /// Only one of `scheduled_start` / `scheduled_end` is set.
    PartialSchedule,
    /// Dependency graph contains a cycle.
    CyclicDependency,
    /// A project starts after its deadline.
    InvertedProjectWindow,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the input of a scheduling pass.
///
/// Checks:
/// 1. No duplicate task or project IDs
/// 2. No project whose start is after its deadline
/// 3. Every task has a non-zero duration
/// 4. Schedule fields are both set or both unset
/// 5. Dependencies are not self-references and point to existing tasks
/// 6. Project references point to existing projects
/// 7. No circular dependencies
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(tasks: &[Task], projects: &[Project]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut project_ids = HashSet::new();
    for p in projects {
        if !project_ids.insert(p.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate project ID: {}", p.id),
            ));
        }
        if !p.is_valid_window() {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedProjectWindow,
                format!("Project '{}' starts after its deadline", p.id),
            ));
        }
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }

        if task.estimated_duration == 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::ZeroDuration,
                format!("Task '{}' has zero estimated duration", task.id),
            ));
        }

        if task.scheduled_start.is_some() != task.scheduled_end.is_some() {
            errors.push(ValidationError::new(
                ValidationErrorKind::PartialSchedule,
                format!("Task '{}' has only one of scheduled start/end", task.id),
            ));
        }
    }

    for task in tasks {
        for dep in &task.dependencies {
            if *dep == task.id {
                errors.push(ValidationError::new(
                    ValidationErrorKind::SelfDependency,
                    format!("Task '{}' depends on itself", task.id),
                ));
            } else if !task_ids.contains(dep.as_str()) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownDependency,
                    format!("Task '{}' references unknown dependency '{}'", task.id, dep),
                ));
            }
        }

        if let Some(project_id) = task.project_id.as_deref() {
            if !project_ids.contains(project_id) {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownProject,
                    format!("Task '{}' references unknown project '{}'", task.id, project_id),
                ));
            }
        }
    }

    let resolved = DependencyGraph::build(tasks).resolve();
    for &(node, dep) in resolved.cycle_edges() {
        errors.push(ValidationError::new(
            ValidationErrorKind::CyclicDependency,
            format!(
                "Circular dependency detected: '{}' depends on '{}'",
                tasks[node].id, tasks[dep].id
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
