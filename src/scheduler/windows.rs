//! Free-interval index over a working day.
//!
//! # Algorithm
//! 1. Collect busy intervals intersecting the day: timed events plus
//!    scheduled, not-completed tasks. All-day events and completed tasks
//!    never occupy time.
//! 2. Sort by start.
//! 3. Sweep from working-day start to end, emitting the gap before each
//!    busy interval and advancing the cursor to `busy.end + buffer`.
//! 4. Emit the trailing gap and drop slots shorter than
//!    [`MIN_SLOT_MINUTES`].

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

use crate::config::{SchedulingOptions, MIN_SLOT_MINUTES};
use crate::models::{Event, Task, TimeSlot};

/// Computes free slots per calendar day under the configured working hours.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindowIndex<'a> {
    options: &'a SchedulingOptions,
}

impl<'a> TimeWindowIndex<'a> {
    /// Creates an index for the given options.
    pub fn new(options: &'a SchedulingOptions) -> Self {
        Self { options }
    }

    /// Monday–Friday, or every day when weekends are allowed.
    pub fn is_working_day(&self, date: NaiveDate) -> bool {
        self.options.allow_weekends || !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
    }

    /// Working days in `[from, through]`, lazily.
    ///
    /// The sequence is finite and can be restarted by calling again.
    pub fn working_days(
        &self,
        from: NaiveDate,
        through: NaiveDate,
    ) -> impl Iterator<Item = NaiveDate> + 'a {
        let index = *self;
        from.iter_days()
            .take_while(move |day| *day <= through)
            .filter(move |day| index.is_working_day(*day))
    }

    /// The working-hours window of a day.
    pub fn working_window(&self, day: NaiveDate) -> TimeSlot {
        let hours = &self.options.working_hours;
        TimeSlot::free(day.and_time(hours.start), day.and_time(hours.end))
    }

    /// Busy intervals intersecting `day`, sorted by start.
    pub fn occupied(
        &self,
        day: NaiveDate,
        existing_tasks: &[Task],
        events: &[Event],
    ) -> Vec<TimeSlot> {
        let day_start = day.and_time(NaiveTime::default());
        let whole_day = TimeSlot::busy(day_start, day_start + Duration::days(1));

        let mut busy: Vec<TimeSlot> = events
            .iter()
            .filter(|e| e.blocks_time())
            .map(Event::slot)
            .chain(
                existing_tasks
                    .iter()
                    .filter(|t| !t.completed)
                    .filter_map(Task::scheduled_slot),
            )
            .filter(|slot| slot.overlaps(&whole_day))
            .collect();

        busy.sort_by_key(|slot| slot.start);
        busy
    }

    /// Free slots of at least [`MIN_SLOT_MINUTES`] within working hours.
    pub fn available_slots(
        &self,
        day: NaiveDate,
        existing_tasks: &[Task],
        events: &[Event],
    ) -> Vec<TimeSlot> {
        let window = self.working_window(day);
        let buffer = self.options.buffer();
        let mut slots = Vec::new();
        let mut cursor: NaiveDateTime = window.start;

        for busy in self.occupied(day, existing_tasks, events) {
            if busy.start > cursor {
                let gap_end = busy.start.min(window.end);
                if gap_end > cursor {
                    slots.push(TimeSlot::free(cursor, gap_end));
                }
            }
            cursor = cursor.max(busy.end + buffer);
            if cursor >= window.end {
                break;
            }
        }

        if cursor < window.end {
            slots.push(TimeSlot::free(cursor, window.end));
        }

        let minimum = Duration::minutes(MIN_SLOT_MINUTES);
        slots.retain(|slot| slot.duration() >= minimum);
        slots
    }
}
