//! First-fit slot placement.
//!
//! # Algorithm
//! 1. Floor = `max(earliest_start, can_start_from)`.
//! 2. Window end = deadline, or the search horizon for overdue tasks.
//! 3. For each working day from the floor's date through the window end,
//!    take the day's free slots in order, clip each to the floor, and
//!    accept the first that fits the task's duration, ends inside the
//!    window and overlaps no timed event.
//!
//! Days and slots are visited in ascending time order, so the first
//! accepted candidate is the earliest feasible start.

use chrono::{Duration, NaiveDateTime};
use tracing::{debug, warn};

use super::constraints::is_task_overdue;
use super::windows::TimeWindowIndex;
use crate::config::{SchedulingOptions, OVERDUE_HORIZON_DAYS};
use crate::models::{Event, Task, TimeSlot};

/// Outcome of a placement attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum Placement {
    /// Task with `scheduled_start`/`scheduled_end` set.
    Placed(Task),
    /// No feasible interval inside the search window; task returned as given.
    Unplaceable(Task),
}

impl Placement {
    /// Whether a slot was found.
    pub fn is_placed(&self) -> bool {
        matches!(self, Placement::Placed(_))
    }

    /// The task carried by either outcome.
    pub fn into_task(self) -> Task {
        match self {
            Placement::Placed(task) | Placement::Unplaceable(task) => task,
        }
    }
}

/// Far-future ceiling for overdue tasks.
pub fn search_horizon_end(now: NaiveDateTime) -> NaiveDateTime {
    now + Duration::days(OVERDUE_HORIZON_DAYS)
}

/// Searches the calendar for the first interval that fits a task.
#[derive(Debug, Clone, Copy)]
pub struct SlotPlacer<'a> {
    index: TimeWindowIndex<'a>,
    events: &'a [Event],
    now: NaiveDateTime,
}

impl<'a> SlotPlacer<'a> {
    /// Creates a placer against fixed `events` for a pass at `now`.
    pub fn new(options: &'a SchedulingOptions, events: &'a [Event], now: NaiveDateTime) -> Self {
        Self {
            index: TimeWindowIndex::new(options),
            events,
            now,
        }
    }

    /// Places `task` no earlier than `earliest_start`.
    ///
    /// `occupied` holds tasks already on the calendar for this pass.
    /// `can_start_from` on the returned task is left untouched.
    pub fn place(
        &self,
        task: &Task,
        earliest_start: NaiveDateTime,
        search_horizon_end: NaiveDateTime,
        occupied: &[Task],
    ) -> Placement {
        let floor = task
            .can_start_from
            .map_or(earliest_start, |from| earliest_start.max(from));
        let window_end = if is_task_overdue(task, self.now) {
            debug!(task = %task.id, deadline = %task.deadline, "overdue; searching to horizon");
            search_horizon_end
        } else {
            task.deadline
        };
        let duration = task.duration();

        for day in self.index.working_days(floor.date(), window_end.date()) {
            for slot in self.index.available_slots(day, occupied, self.events) {
                let start = slot.start.max(floor);
                if start >= slot.end {
                    continue;
                }
                if task.can_start_from.is_some_and(|from| start < from) {
                    warn!(task = %task.id, %start, "candidate before can_start_from; rejecting");
                    continue;
                }
                if slot.end - start < duration {
                    continue;
                }

                let candidate = TimeSlot::busy(start, start + duration);
                if candidate.end > window_end {
                    // Later candidates only end later.
                    debug!(task = %task.id, %window_end, "no fit before window end");
                    return Placement::Unplaceable(task.clone());
                }
                if let Some(event) = self.conflicting_event(&candidate) {
                    debug!(task = %task.id, event = %event.id, "candidate overlaps event");
                    continue;
                }

                debug!(task = %task.id, start = %candidate.start, end = %candidate.end, "placed");
                let mut placed = task.clone();
                placed.scheduled_start = Some(candidate.start);
                placed.scheduled_end = Some(candidate.end);
                return Placement::Placed(placed);
            }
        }

        debug!(task = %task.id, %floor, %window_end, "search window exhausted");
        Placement::Unplaceable(task.clone())
    }

    fn conflicting_event(&self, candidate: &TimeSlot) -> Option<&'a Event> {
        self.events
            .iter()
            .filter(|e| e.blocks_time())
            .find(|e| candidate.overlaps(&e.slot()))
    }
}
