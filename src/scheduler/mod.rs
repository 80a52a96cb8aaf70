//! Calendar scheduler, invariant audit and KPI evaluation.
//!
//! # Algorithm
//!
//! `AutoScheduler` is a greedy, dependency-aware, first-fit heuristic:
//! tasks are ranked by the rule engine, released in dependency order and
//! each placed at the earliest free interval that fits its duration,
//! respects its start floor and ends by its deadline. It is not optimal,
//! but it is deterministic for a given `now`.
//!
//! # Layers
//!
//! | Module | Role |
//! |--------|------|
//! | `windows` | Working days and free slots per day |
//! | `constraints` | Classification, project bounds, earliest start |
//! | `placer` | First-fit search for one task |
//! | `orchestrator` | The full pass |
//! | `audit` | Invariant checks over a task list |
//! | `kpi` | Quality metrics |
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 3-4
//! - Baker & Trietsch (2019), "Principles of Sequencing and Scheduling"

mod audit;
mod constraints;
mod kpi;
mod orchestrator;
mod placer;
mod windows;

pub use audit::audit_schedule;
pub use constraints::{classify, is_task_overdue, ConstraintResolver, TaskState};
pub use kpi::ScheduleKpi;
pub use orchestrator::{AutoScheduler, ScheduleRequest};
pub use placer::{search_horizon_end, Placement, SlotPlacer};
pub use windows::TimeWindowIndex;
