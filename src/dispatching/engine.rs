//! Rule engine for multi-criteria ranking.
//!
//! Rules are applied in sequence: the first rule decides, later rules only
//! break its ties. Sorting is stable, so tasks that tie on every rule keep
//! their incoming (dependency-resolved) order.
//!
//! # Reference
//! Haupt (1989), "A Survey of Priority Rule-Based Scheduling"

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, DispatchingRule, SchedulingContext};
use crate::models::Task;

const SCORE_EPSILON: f64 = 1e-9;

/// A composable rule engine for task ranking.
///
/// # Example
/// ```
/// use u_autoschedule::dispatching::{RuleEngine, rules};
///
/// let engine = RuleEngine::new()
///     .with_rule(rules::PriorityWeight)
///     .with_tie_breaker(rules::Edd)
///     .with_tie_breaker(rules::Spt);
/// assert_eq!(engine.rule_names(), vec!["PRIORITY", "EDD", "SPT"]);
/// ```
#[derive(Clone, Default)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
}

impl RuleEngine {
    /// Creates an empty rule engine. With no rules, ranking keeps the
    /// incoming order.
    pub fn new() -> Self {
        Self { rules: Vec::new() }
    }

    /// The default ranking: priority weight, then earliest deadline.
    pub fn priority_then_deadline() -> Self {
        Self::new()
            .with_rule(rules::PriorityWeight)
            .with_tie_breaker(rules::Edd)
    }

    /// Adds a rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds a rule consulted only when every earlier rule ties.
    ///
    /// Equivalent to [`with_rule`](Self::with_rule); the name reads better
    /// in builder chains.
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_rule(rule)
    }

    /// Names of the configured rules, in evaluation order.
    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.name()).collect()
    }

    /// Sorts a subset of tasks (by index) highest priority first.
    ///
    /// `indices` is the incoming order; ties preserve it.
    pub fn rank_indices(
        &self,
        tasks: &[Task],
        indices: &[usize],
        context: &SchedulingContext,
    ) -> Vec<usize> {
        let mut ranked = indices.to_vec();
        ranked.sort_by(|&a, &b| self.compare(&tasks[a], &tasks[b], context));
        ranked
    }

    /// Sorts all tasks, returning indices highest priority first.
    pub fn sort_indices(&self, tasks: &[Task], context: &SchedulingContext) -> Vec<usize> {
        let all: Vec<usize> = (0..tasks.len()).collect();
        self.rank_indices(tasks, &all, context)
    }

    fn compare(&self, a: &Task, b: &Task, context: &SchedulingContext) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a, context);
            let score_b = rule.evaluate(b, context);

            if (score_a - score_b).abs() > SCORE_EPSILON {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }
        Ordering::Equal
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field("rules", &self.rule_names())
            .finish()
    }
}

/// Stable reorder by priority weight (descending), then deadline (ascending).
///
/// Not dependency-aware: callers that need dependency ordering must
/// enforce it separately.
pub fn prioritize_tasks(tasks: &[Task], context: &SchedulingContext) -> Vec<Task> {
    RuleEngine::priority_then_deadline()
        .sort_indices(tasks, context)
        .into_iter()
        .map(|i| tasks[i].clone())
        .collect()
}
