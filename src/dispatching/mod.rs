//! Dispatching rules and rule engine for task ranking.
//!
//! Ranking runs after dependency ordering and decides which ready task is
//! placed first. The default engine orders by priority weight, breaking
//! ties by earliest deadline.
//!
//! # Usage
//!
//! ```
//! use u_autoschedule::dispatching::{RuleEngine, SchedulingContext};
//! use u_autoschedule::dispatching::rules;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::PriorityWeight)
//!     .with_tie_breaker(rules::Edd);
//! ```
//!
//! # References
//!
//! - Pinedo (2016), "Scheduling: Theory, Algorithms, and Systems", Ch. 4
//! - Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

mod context;
mod engine;
pub mod rules;

pub use context::SchedulingContext;
pub use engine::{prioritize_tasks, RuleEngine};

use crate::models::Task;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = higher priority (scheduled first).
pub type RuleScore = f64;

/// A dispatching rule that evaluates task priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for tasks that should be placed first.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "PRIORITY", "EDD").
    fn name(&self) -> &'static str;

    /// Evaluates a task given the current scheduling context.
    fn evaluate(&self, task: &Task, context: &SchedulingContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
