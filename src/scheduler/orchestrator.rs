//! Automatic scheduling pass.
//!
//! # Algorithm
//!
//! 1. Classify tasks. Completed and in-progress tasks pass through
//!    untouched; in-progress ones still occupy the calendar.
//! 2. Apply project bounds to the remaining tasks. Tasks without a known
//!    project keep their `can_start_from` as given; the rest follow the
//!    bidirectional rule of
//!    [`ConstraintResolver::apply_project_constraints`].
//! 3. Order by dependencies, rank by the rule engine (priority, then
//!    deadline), and release each task only after the dependencies that
//!    gate it.
//! 4. Place tasks one by one against events, in-progress tasks and the
//!    tasks already placed in this pass. A dependency left unplaced is
//!    ignored with a warning; it does not block its dependents.
//! 5. Snap any start that ended up before `can_start_from` (should never
//!    fire).
//! 6. Return completed ++ in-progress ++ processed tasks.
//!
//! # Complexity
//! O(n² + n·d·s) where n = tasks, d = days searched, s = busy intervals per day.

use std::collections::HashSet;

use chrono::{Local, NaiveDateTime};
use tracing::{error, info, warn};

use super::constraints::{ConstraintResolver, TaskState};
use super::placer::{search_horizon_end, Placement, SlotPlacer};
use crate::config::SchedulingOptions;
use crate::dependency::DependencyGraph;
use crate::dispatching::{RuleEngine, SchedulingContext};
use crate::models::{Event, Project, Task};

/// Input container for a scheduling pass.
#[derive(Debug, Clone)]
pub struct ScheduleRequest {
    /// Tasks to schedule (all of them; completed ones pass through).
    pub tasks: Vec<Task>,
    /// Fixed calendar events.
    pub events: Vec<Event>,
    /// Projects referenced by tasks.
    pub projects: Vec<Project>,
    /// Scheduling options.
    pub options: SchedulingOptions,
    /// The instant the pass runs at.
    pub now: NaiveDateTime,
    /// Whether existing `can_start_from` values come from a previous pass.
    pub is_rescheduling: bool,
}

impl ScheduleRequest {
    /// Creates a first-pass request at the current local time.
    pub fn new(tasks: Vec<Task>, events: Vec<Event>) -> Self {
        Self {
            tasks,
            events,
            projects: Vec::new(),
            options: SchedulingOptions::default(),
            now: Local::now().naive_local(),
            is_rescheduling: false,
        }
    }

    /// Sets the projects.
    pub fn with_projects(mut self, projects: Vec<Project>) -> Self {
        self.projects = projects;
        self
    }

    /// Sets the options.
    pub fn with_options(mut self, options: SchedulingOptions) -> Self {
        self.options = options;
        self
    }

    /// Pins the pass to a fixed instant.
    pub fn at(mut self, now: NaiveDateTime) -> Self {
        self.now = now;
        self
    }

    /// Marks the pass as a reschedule.
    pub fn rescheduling(mut self, is_rescheduling: bool) -> Self {
        self.is_rescheduling = is_rescheduling;
        self
    }
}

/// Greedy, dependency-aware calendar scheduler.
///
/// Stateless between calls: each pass is a pure function of its inputs
/// and `now`.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_autoschedule::models::{Event, Task};
/// use u_autoschedule::scheduler::AutoScheduler;
///
/// // Monday 08:00
/// let now = NaiveDate::from_ymd_opt(2024, 6, 3).unwrap().and_hms_opt(8, 0, 0).unwrap();
/// let meeting = Event::new(
///     "standup",
///     now.date().and_hms_opt(10, 0, 0).unwrap(),
///     now.date().and_hms_opt(11, 0, 0).unwrap(),
/// );
/// let task = Task::new("report", now + chrono::Duration::days(3), 60);
///
/// let scheduler = AutoScheduler::default();
/// let out = scheduler.schedule(&[task], &[meeting], &[], now, false);
/// assert_eq!(out[0].scheduled_start, now.date().and_hms_opt(9, 0, 0));
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutoScheduler {
    options: SchedulingOptions,
    rule_engine: RuleEngine,
}

impl AutoScheduler {
    /// Creates a scheduler with the given options and default ranking.
    pub fn new(options: SchedulingOptions) -> Self {
        Self {
            options,
            rule_engine: RuleEngine::default(),
        }
    }

    /// Replaces the ranking rules.
    pub fn with_rule_engine(mut self, engine: RuleEngine) -> Self {
        self.rule_engine = engine;
        self
    }

    /// The options in use.
    pub fn options(&self) -> &SchedulingOptions {
        &self.options
    }

    /// Runs one scheduling pass.
    ///
    /// Returns every input task exactly once: completed tasks first, then
    /// in-progress tasks, then the rest in placement order.
    pub fn schedule(
        &self,
        tasks: &[Task],
        events: &[Event],
        projects: &[Project],
        now: NaiveDateTime,
        is_rescheduling: bool,
    ) -> Vec<Task> {
        let resolver = ConstraintResolver::new(projects, &self.options, now);

        let mut completed = Vec::new();
        let mut in_progress = Vec::new();
        let mut originals = Vec::new();
        for task in tasks {
            match resolver.classify(task) {
                TaskState::Completed => completed.push(task.clone()),
                TaskState::InProgress => in_progress.push(task.clone()),
                TaskState::Schedulable => originals.push(task),
            }
        }

        let pending: Vec<Task> = originals
            .iter()
            .map(|original| resolver.apply_project_constraints(original, is_rescheduling))
            .collect();

        let external: HashSet<&str> = completed
            .iter()
            .chain(in_progress.iter())
            .map(|t| t.id.as_str())
            .collect();
        let resolved = DependencyGraph::with_external(&pending, &external).resolve();
        let context = SchedulingContext::at_time(now);
        let ranked = self
            .rule_engine
            .rank_indices(&pending, resolved.order(), &context);
        let sequence = resolved.release_sequence(&ranked);

        let placer = SlotPlacer::new(&self.options, events, now);
        let horizon = search_horizon_end(now);
        let mut occupied: Vec<Task> = in_progress.clone();
        let mut unplaced = 0usize;
        let mut processed = Vec::with_capacity(pending.len());

        for &i in &sequence {
            let task = &pending[i];
            let floor = task.can_start_from;

            let earliest = resolver.calculate_earliest_start(task, &completed, &occupied);
            match placer.place(task, earliest, horizon, &occupied) {
                Placement::Placed(mut placed) => {
                    placed.can_start_from = floor;
                    occupied.push(placed.clone());
                    processed.push(placed);
                }
                Placement::Unplaceable(task) => {
                    warn!(task = %task.id, deadline = %task.deadline, "no slot before deadline");
                    unplaced += 1;
                    let mut kept = task.unscheduled();
                    kept.can_start_from = floor;
                    processed.push(kept);
                }
            }
        }

        for task in &mut processed {
            if let (Some(start), Some(from)) = (task.scheduled_start, task.can_start_from) {
                if start < from {
                    error!(
                        task = %task.id,
                        %start,
                        %from,
                        "placement earlier than can_start_from; snapping"
                    );
                    task.scheduled_start = Some(from);
                    task.scheduled_end = Some(from + task.duration());
                }
            }
        }

        info!(
            placed = processed.len() - unplaced,
            unplaced,
            in_progress = in_progress.len(),
            completed = completed.len(),
            rescheduling = is_rescheduling,
            "scheduling pass finished"
        );

        let mut result = completed;
        result.extend(in_progress);
        result.extend(processed);
        result
    }

    /// Runs a reschedule pass (`is_rescheduling = true`).
    pub fn reschedule_all(
        &self,
        tasks: &[Task],
        events: &[Event],
        projects: &[Project],
        now: NaiveDateTime,
    ) -> Vec<Task> {
        self.schedule(tasks, events, projects, now, true)
    }

    /// Runs a pass described by a request, using the request's options.
    pub fn schedule_request(&self, request: &ScheduleRequest) -> Vec<Task> {
        let scheduler = Self {
            options: request.options.clone(),
            rule_engine: self.rule_engine.clone(),
        };
        scheduler.schedule(
            &request.tasks,
            &request.events,
            &request.projects,
            request.now,
            request.is_rescheduling,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatching::rules;
    use crate::models::Priority;
    use crate::scheduler::audit_schedule;
    use chrono::{Duration, NaiveDate};

    // 2024-06-03 is a Monday.
    fn at(day: u32, hour: u32, minute: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, day)
            .unwrap()
            .and_hms_opt(hour, minute, 0)
            .unwrap()
    }

    fn now() -> NaiveDateTime {
        at(3, 8, 0)
    }

    fn task(id: &str, minutes: u32) -> Task {
        Task::new(id, at(6, 18, 0), minutes)
    }

    fn find<'t>(tasks: &'t [Task], id: &str) -> &'t Task {
        tasks.iter().find(|t| t.id == id).unwrap()
    }

    fn schedule(tasks: &[Task], events: &[Event], projects: &[Project]) -> Vec<Task> {
        AutoScheduler::default().schedule(tasks, events, projects, now(), false)
    }

    fn assert_clean(tasks: &[Task], events: &[Event]) {
        let hard: Vec<_> = audit_schedule(tasks, events)
            .into_iter()
            .filter(|v| v.is_hard())
            .collect();
        assert!(hard.is_empty(), "violations: {hard:?}");
    }

    #[test]
    fn test_places_before_event() {
        let events = vec![Event::new("E1", at(3, 10, 0), at(3, 11, 0))];
        let out = schedule(&[task("T", 60)], &events, &[]);
        assert_eq!(out[0].scheduled_start, Some(at(3, 9, 0)));
        assert_eq!(out[0].scheduled_end, Some(at(3, 10, 0)));
    }

    #[test]
    fn test_can_start_from_tomorrow() {
        let t = task("T", 30).with_can_start_from(at(4, 14, 0));
        let out = schedule(&[t], &[], &[]);
        assert_eq!(out[0].scheduled_start, Some(at(4, 14, 0)));
        assert_eq!(out[0].can_start_from, Some(at(4, 14, 0)));
    }

    #[test]
    fn test_dependency_follows_with_buffer() {
        let a = task("A", 60);
        let b = task("B", 60).with_dependency("A");
        let out = schedule(&[b, a], &[], &[]);

        let a = find(&out, "A");
        let b = find(&out, "B");
        assert_eq!(a.scheduled_start, Some(at(3, 9, 0)));
        assert!(b.scheduled_start.unwrap() >= a.scheduled_end.unwrap() + Duration::minutes(15));
        assert_eq!(b.scheduled_start, Some(at(3, 10, 15)));
    }

    #[test]
    fn test_priority_order() {
        let low = task("low", 60).with_priority(Priority::Low);
        let urgent = task("urgent", 60).with_priority(Priority::Urgent);
        let out = schedule(&[low, urgent], &[], &[]);

        assert_eq!(find(&out, "urgent").scheduled_start, Some(at(3, 9, 0)));
        assert_eq!(find(&out, "low").scheduled_start, Some(at(3, 10, 15)));
    }

    #[test]
    fn test_priority_does_not_jump_dependencies() {
        // Urgent task depends on a low-priority one
        let base = task("base", 60).with_priority(Priority::Low);
        let top = task("top", 60)
            .with_priority(Priority::Urgent)
            .with_dependency("base");
        let other = task("other", 60).with_priority(Priority::High);
        let out = schedule(&[top, other, base], &[], &[]);

        let base = find(&out, "base");
        let top = find(&out, "top");
        assert!(top.scheduled_start.unwrap() >= base.scheduled_end.unwrap());
        assert_clean(&out, &[]);
    }

    #[test]
    fn test_output_groups_and_identity() {
        let done = task("done", 60).scheduled_at(at(3, 9, 0)).completed();
        let running = task("running", 120).scheduled_at(at(3, 7, 0));
        let fresh = task("fresh", 30);
        let out = schedule(&[fresh.clone(), running.clone(), done.clone()], &[], &[]);

        let ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["done", "running", "fresh"]);
        assert_eq!(out[0], done);
        assert_eq!(out[1], running);
    }

    #[test]
    fn test_in_progress_occupies_calendar() {
        let now = at(3, 9, 0);
        let running = task("running", 60).scheduled_at(at(3, 8, 30));
        let out =
            AutoScheduler::default().schedule(&[running, task("next", 60)], &[], &[], now, false);

        // running ends 09:30, buffer 15
        assert_eq!(find(&out, "next").scheduled_start, Some(at(3, 9, 45)));
        assert_eq!(find(&out, "running").scheduled_start, Some(at(3, 8, 30)));
    }

    #[test]
    fn test_completed_task_frees_slot() {
        let occupying = task("X", 60).scheduled_at(at(3, 9, 0));
        let other = task("Y", 60).with_priority(Priority::Low);

        let first = schedule(&[occupying, other], &[], &[]);
        assert_eq!(find(&first, "X").scheduled_start, Some(at(3, 9, 0)));
        assert_eq!(find(&first, "Y").scheduled_start, Some(at(3, 10, 15)));

        let mut next: Vec<Task> = first.clone();
        for t in &mut next {
            if t.id == "X" {
                t.completed = true;
            }
        }
        let second = AutoScheduler::default().reschedule_all(&next, &[], &[], now());
        assert_eq!(find(&second, "Y").scheduled_start, Some(at(3, 9, 0)));
    }

    #[test]
    fn test_reschedule_is_idempotent() {
        let events = vec![
            Event::new("E1", at(3, 10, 0), at(3, 11, 0)),
            Event::new("E2", at(4, 13, 0), at(4, 15, 0)),
        ];
        let projects = vec![Project::new("P1", at(4, 0, 0), at(14, 18, 0))];
        let tasks = vec![
            task("A", 120).with_priority(Priority::High),
            task("B", 90).with_dependency("A"),
            task("C", 45).with_project("P1"),
            task("D", 240).with_priority(Priority::Urgent),
            task("E", 60).with_can_start_from(at(5, 11, 0)),
        ];

        let scheduler = AutoScheduler::default();
        let first = scheduler.schedule(&tasks, &events, &projects, now(), false);
        let second = scheduler.reschedule_all(&first, &events, &projects, now());
        let third = scheduler.reschedule_all(&second, &events, &projects, now());

        for id in ["A", "B", "C", "D", "E"] {
            assert_eq!(find(&first, id).scheduled_start, find(&second, id).scheduled_start, "{id}");
            assert_eq!(find(&second, id), find(&third, id), "{id}");
        }
        assert_clean(&second, &events);
    }

    #[test]
    fn test_project_moved_earlier_on_reschedule() {
        let t = Task::new("T", at(28, 18, 0), 60).with_project("P1");
        let original = vec![Project::new("P1", at(12, 0, 0), at(28, 18, 0))];
        let first = schedule(&[t.clone().with_can_start_from(at(1, 0, 0))], &[], &original);
        let placed = find(&first, "T");
        assert_eq!(placed.can_start_from, Some(at(12, 0, 0)));
        assert_eq!(placed.scheduled_start, Some(at(12, 9, 0)));

        let moved = vec![Project::new("P1", at(5, 0, 0), at(28, 18, 0))];
        let second = AutoScheduler::default().reschedule_all(&first, &[], &moved, now());
        let replaced = find(&second, "T");
        assert_eq!(replaced.can_start_from, Some(at(5, 0, 0)));
        assert_eq!(replaced.scheduled_start, Some(at(5, 9, 0)));
    }

    #[test]
    fn test_project_moved_later_on_reschedule() {
        let first_projects = vec![Project::new("P1", at(5, 0, 0), at(28, 18, 0))];
        let t = Task::new("T", at(28, 18, 0), 60).with_project("P1");
        let first = schedule(&[t], &[], &first_projects);
        assert_eq!(find(&first, "T").scheduled_start, Some(at(5, 9, 0)));

        let later = vec![Project::new("P1", at(12, 0, 0), at(28, 18, 0))];
        let second = AutoScheduler::default().reschedule_all(&first, &[], &later, now());
        assert_eq!(find(&second, "T").scheduled_start, Some(at(12, 9, 0)));
    }

    #[test]
    fn test_cycle_does_not_crash() {
        let tasks = vec![
            task("A", 60).with_dependency("C"),
            task("B", 60).with_dependency("A"),
            task("C", 60).with_dependency("B"),
        ];
        let out = schedule(&tasks, &[], &[]);
        assert_eq!(out.len(), 3);
        let mut ids: Vec<&str> = out.iter().map(|t| t.id.as_str()).collect();
        ids.sort();
        assert_eq!(ids, vec!["A", "B", "C"]);
        assert!(out.iter().all(Task::is_scheduled));
    }

    #[test]
    fn test_unplaceable_keeps_constraints() {
        let tight = Task::new("tight", at(3, 9, 30), 60).with_can_start_from(at(3, 9, 0));
        let out = schedule(&[tight], &[], &[]);

        assert!(!out[0].is_scheduled());
        assert_eq!(out[0].can_start_from, Some(at(3, 9, 0)));
    }

    #[test]
    fn test_dependent_of_unplaceable_still_placed() {
        // "blocked" cannot fit before 09:30; its dependent is placed anyway
        let blocked = Task::new("blocked", at(3, 9, 30), 60);
        let after = task("after", 60).with_dependency("blocked");
        let free = task("free", 60);
        let out = schedule(&[blocked, after, free], &[], &[]);

        assert!(!find(&out, "blocked").is_scheduled());
        let after = find(&out, "after");
        assert_eq!(after.scheduled_start, Some(at(3, 9, 0)));
        assert_eq!(after.scheduled_end, Some(at(3, 10, 0)));
        assert_eq!(find(&out, "free").scheduled_start, Some(at(3, 10, 15)));
        assert_clean(&out, &[]);
    }

    #[test]
    fn test_reschedule_without_project_keeps_floor() {
        let t = task("T", 60).with_can_start_from(at(4, 10, 0));
        let out = AutoScheduler::default().reschedule_all(&[t], &[], &[], now());
        assert_eq!(out[0].can_start_from, Some(at(4, 10, 0)));
        assert_eq!(out[0].scheduled_start, Some(at(4, 10, 0)));
    }

    #[test]
    fn test_stale_schedule_cleared_when_unplaceable() {
        // Previously scheduled, but the deadline can no longer be met
        let stale = Task::new("stale", at(3, 9, 30), 60).scheduled_at(at(3, 8, 15));
        let out = AutoScheduler::default().reschedule_all(&[stale], &[], &[], at(3, 9, 20));
        assert!(!out[0].is_scheduled());
    }

    #[test]
    fn test_dependency_on_completed_task() {
        let done = task("done", 60).completed();
        let next = task("next", 60).with_dependency("done");
        let out = schedule(&[done, next], &[], &[]);
        assert_eq!(find(&out, "next").scheduled_start, Some(at(3, 9, 0)));
    }

    #[test]
    fn test_dependency_on_in_progress_task() {
        let now = at(3, 9, 0);
        let running = task("running", 60).scheduled_at(at(3, 8, 30));
        let next = task("next", 30).with_dependency("running");
        let out = AutoScheduler::default().schedule(&[running, next], &[], &[], now, false);
        assert_eq!(find(&out, "next").scheduled_start, Some(at(3, 9, 45)));
    }

    #[test]
    fn test_overdue_task_still_placed() {
        let late = Task::new("late", at(1, 18, 0), 60);
        let out = schedule(&[late], &[], &[]);
        assert_eq!(out[0].scheduled_start, Some(at(3, 9, 0)));
    }

    #[test]
    fn test_custom_rule_engine() {
        let long = task("long", 240).with_priority(Priority::Urgent);
        let short = task("short", 30).with_priority(Priority::Low);
        let scheduler =
            AutoScheduler::default().with_rule_engine(RuleEngine::new().with_rule(rules::Spt));
        let out = scheduler.schedule(&[long, short], &[], &[], now(), false);
        assert_eq!(find(&out, "short").scheduled_start, Some(at(3, 9, 0)));
    }

    #[test]
    fn test_schedule_request() {
        let request = ScheduleRequest::new(vec![task("T", 60)], vec![])
            .with_options(SchedulingOptions::default().with_buffer(0))
            .at(now())
            .rescheduling(true);
        let out = AutoScheduler::default().schedule_request(&request);
        assert_eq!(out[0].scheduled_start, Some(at(3, 9, 0)));
    }

    #[test]
    fn test_inputs_not_mutated() {
        let tasks = vec![task("T", 60)];
        let snapshot = tasks.clone();
        let _ = schedule(&tasks, &[], &[]);
        assert_eq!(tasks, snapshot);
    }

    #[test]
    fn test_empty_input() {
        assert!(schedule(&[], &[], &[]).is_empty());
    }

    #[test]
    fn test_many_tasks_satisfy_invariants() {
        let events = vec![
            Event::new("E1", at(3, 11, 0), at(3, 12, 30)),
            Event::new("E2", at(4, 9, 0), at(4, 10, 0)),
            Event::new("E3", at(5, 14, 0), at(5, 16, 0)),
            Event::new("lunch", at(6, 12, 0), at(6, 13, 0)),
            Event::new("holiday", at(7, 0, 0), at(8, 0, 0)).all_day(),
        ];
        let priorities = [Priority::Low, Priority::Medium, Priority::High, Priority::Urgent];
        let tasks: Vec<Task> = (0..12u32)
            .map(|i| {
                let mut t = Task::new(format!("T{i}"), at(14, 18, 0), 30 + (i % 4) * 30)
                    .with_priority(priorities[(i % 4) as usize]);
                if i > 0 && i % 3 == 0 {
                    t = t.with_dependency(format!("T{}", i - 1));
                }
                if i == 7 {
                    t = t.with_can_start_from(at(5, 10, 0));
                }
                t
            })
            .collect();

        let out = schedule(&tasks, &events, &[]);
        assert_eq!(out.len(), tasks.len());
        assert!(out.iter().all(Task::is_scheduled));
        assert_clean(&out, &events);
    }
}
