//! Schedule invariant checks.
//!
//! Inspects a task list (typically the output of a pass) and reports every
//! placement invariant it breaks. Completed and unscheduled tasks are
//! skipped. Nothing is repaired.

use std::collections::HashMap;

use crate::models::{Event, Task, TimeSlot, Violation};

/// Returns the violations found in `tasks` against fixed `events`.
///
/// # Checks
/// - start before `can_start_from`
/// - overlap with a timed event
/// - overlap between two open tasks (reported once per pair)
/// - start before a scheduled, open dependency ends
/// - end after the deadline (soft)
pub fn audit_schedule(tasks: &[Task], events: &[Event]) -> Vec<Violation> {
    let placed: Vec<(&Task, TimeSlot)> = tasks
        .iter()
        .filter(|t| !t.completed)
        .filter_map(|t| t.scheduled_slot().map(|slot| (t, slot)))
        .collect();
    let by_id: HashMap<&str, TimeSlot> = placed
        .iter()
        .map(|(t, slot)| (t.id.as_str(), *slot))
        .collect();

    let mut violations = Vec::new();

    for (i, (task, slot)) in placed.iter().enumerate() {
        if let Some(from) = task.can_start_from {
            if slot.start < from {
                violations.push(Violation::early_start(
                    &task.id,
                    format!("starts {} before can_start_from {}", slot.start, from),
                ));
            }
        }

        for event in events.iter().filter(|e| e.blocks_time()) {
            if slot.overlaps(&event.slot()) {
                violations.push(Violation::event_overlap(
                    &task.id,
                    format!("overlaps event '{}'", event.id),
                ));
            }
        }

        for (other, other_slot) in &placed[i + 1..] {
            if slot.overlaps(other_slot) {
                violations.push(Violation::task_overlap(
                    &task.id,
                    format!("overlaps task '{}'", other.id),
                ));
            }
        }

        for dep in &task.dependencies {
            if let Some(dep_slot) = by_id.get(dep.as_str()) {
                if slot.start < dep_slot.end {
                    violations.push(Violation::precedence_violation(
                        &task.id,
                        format!("starts before dependency '{dep}' ends"),
                    ));
                }
            }
        }

        if slot.end > task.deadline {
            violations.push(Violation::deadline_miss(
                &task.id,
                format!("ends {} after deadline {}", slot.end, task.deadline),
            ));
        }
    }

    violations
}
