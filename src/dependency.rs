//! Task dependency graph.
//!
//! Tasks are stored in an arena (indices into the input slice) with
//! adjacency lists of in-set dependencies. Ordering is a depth-first
//! post-order with explicit three-state marking, so every task is emitted
//! after the tasks it depends on.
//!
//! Cycles never fail the call: the edge that closes a cycle is reported,
//! dropped from the ordering, and traversal continues. Every task is
//! emitted exactly once.
//!
//! # Reference
//! Cormen et al. (2009), "Introduction to Algorithms", Ch. 22.4 (Topological Sort)

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::models::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    Visiting,
    Resolved,
}

/// Dependency adjacency over a task slice.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    ids: Vec<String>,
    /// node → in-set dependencies.
    edges: Vec<Vec<usize>>,
}

/// Result of ordering a [`DependencyGraph`].
#[derive(Debug, Clone)]
pub struct ResolvedOrder {
    order: Vec<usize>,
    position: Vec<usize>,
    /// node → dependencies that still constrain it (cycle edges removed).
    gates: Vec<Vec<usize>>,
    cycle_edges: Vec<(usize, usize)>,
}

impl DependencyGraph {
    /// Builds the graph. Dependencies on IDs outside `tasks` are ignored
    /// with a warning.
    pub fn build(tasks: &[Task]) -> Self {
        Self::with_external(tasks, &HashSet::new())
    }

    /// Builds the graph, silently skipping dependencies that resolve to
    /// `external` IDs (e.g. completed tasks handled elsewhere).
    pub fn with_external(tasks: &[Task], external: &HashSet<&str>) -> Self {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(tasks.len());
        for (i, task) in tasks.iter().enumerate() {
            index.entry(task.id.as_str()).or_insert(i);
        }

        let edges = tasks
            .iter()
            .map(|task| {
                let mut deps = Vec::with_capacity(task.dependencies.len());
                for dep in &task.dependencies {
                    if *dep == task.id {
                        warn!(task = %task.id, "task depends on itself; ignoring");
                        continue;
                    }
                    match index.get(dep.as_str()) {
                        Some(&j) => {
                            if !deps.contains(&j) {
                                deps.push(j);
                            }
                        }
                        None if external.contains(dep.as_str()) => {
                            debug!(
                                task = %task.id,
                                dependency = %dep,
                                "dependency outside ordering set"
                            );
                        }
                        None => {
                            warn!(
                                task = %task.id,
                                dependency = %dep,
                                "unknown dependency; ignoring"
                            );
                        }
                    }
                }
                deps
            })
            .collect();

        Self {
            ids: tasks.iter().map(|t| t.id.clone()).collect(),
            edges,
        }
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether the graph has no nodes.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// In-set dependencies of a node.
    pub fn dependencies(&self, node: usize) -> &[usize] {
        &self.edges[node]
    }

    /// Orders nodes so dependencies come first.
    ///
    /// # Algorithm
    /// Iterative DFS from each node in input order. A dependency found in
    /// the `Visiting` state closes a cycle; that edge is recorded and not
    /// followed. Nodes are emitted when all their dependencies resolve.
    pub fn resolve(&self) -> ResolvedOrder {
        let n = self.ids.len();
        let mut marks = vec![Mark::Unvisited; n];
        let mut order = Vec::with_capacity(n);
        let mut cycle_edges = Vec::new();
        let mut stack: Vec<(usize, usize)> = Vec::new();

        for root in 0..n {
            if marks[root] != Mark::Unvisited {
                continue;
            }
            marks[root] = Mark::Visiting;
            stack.push((root, 0));

            while let Some(&(node, next)) = stack.last() {
                let Some(&dep) = self.edges[node].get(next) else {
                    marks[node] = Mark::Resolved;
                    order.push(node);
                    stack.pop();
                    continue;
                };
                if let Some(top) = stack.last_mut() {
                    top.1 += 1;
                }
                match marks[dep] {
                    Mark::Unvisited => {
                        marks[dep] = Mark::Visiting;
                        stack.push((dep, 0));
                    }
                    Mark::Visiting => {
                        warn!(
                            task = %self.ids[node],
                            dependency = %self.ids[dep],
                            "dependency cycle detected; ignoring edge for ordering"
                        );
                        cycle_edges.push((node, dep));
                    }
                    Mark::Resolved => {}
                }
            }
        }

        let mut position = vec![0; n];
        for (pos, &node) in order.iter().enumerate() {
            position[node] = pos;
        }

        let gates = self
            .edges
            .iter()
            .enumerate()
            .map(|(node, deps)| {
                deps.iter()
                    .copied()
                    .filter(|&dep| position[dep] < position[node])
                    .collect()
            })
            .collect();

        ResolvedOrder {
            order,
            position,
            gates,
            cycle_edges,
        }
    }
}

impl ResolvedOrder {
    /// Node indices, dependencies first.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// Position of a node in [`order`](Self::order).
    pub fn position(&self, node: usize) -> usize {
        self.position[node]
    }

    /// Dependencies that constrain a node after cycle edges are dropped.
    pub fn gating_dependencies(&self, node: usize) -> &[usize] {
        &self.gates[node]
    }

    /// Edges `(task, dependency)` ignored because they close a cycle.
    pub fn cycle_edges(&self) -> &[(usize, usize)] {
        &self.cycle_edges
    }

    /// Whether any cycle was found.
    pub fn has_cycles(&self) -> bool {
        !self.cycle_edges.is_empty()
    }

    /// Merges a preferred order with the dependency constraints.
    ///
    /// Repeatedly takes the first node of `preferred` whose gating
    /// dependencies have all been taken. With cycle edges removed the
    /// gates form a DAG, so a ready node always exists.
    pub fn release_sequence(&self, preferred: &[usize]) -> Vec<usize> {
        let mut released = vec![false; self.order.len()];
        let mut waiting: Vec<usize> = preferred.to_vec();
        let mut sequence = Vec::with_capacity(waiting.len());

        while !waiting.is_empty() {
            let pick = waiting
                .iter()
                .position(|&node| self.gates[node].iter().all(|&dep| released[dep]))
                .unwrap_or(0);
            let node = waiting.remove(pick);
            released[node] = true;
            sequence.push(node);
        }

        sequence
    }
}

/// Returns `tasks` ordered so every task follows its in-set dependencies.
pub fn resolve_order(tasks: &[Task]) -> Vec<Task> {
    DependencyGraph::build(tasks)
        .resolve()
        .order()
        .iter()
        .map(|&i| tasks[i].clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn deadline() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 6, 7)
            .unwrap()
            .and_hms_opt(18, 0, 0)
            .unwrap()
    }

    fn task(id: &str, deps: &[&str]) -> Task {
        deps.iter()
            .fold(Task::new(id, deadline(), 60), |t, d| t.with_dependency(*d))
    }

    fn ids(tasks: &[Task]) -> Vec<&str> {
        tasks.iter().map(|t| t.id.as_str()).collect()
    }

    #[test]
    fn test_chain_order() {
        // C → B → A, given in reverse
        let tasks = vec![task("C", &["B"]), task("B", &["A"]), task("A", &[])];
        assert_eq!(ids(&resolve_order(&tasks)), vec!["A", "B", "C"]);
    }

    #[test]
    fn test_stable_when_independent() {
        let tasks = vec![task("X", &[]), task("Y", &[]), task("Z", &[])];
        assert_eq!(ids(&resolve_order(&tasks)), vec!["X", "Y", "Z"]);
    }

    #[test]
    fn test_diamond() {
        let tasks = vec![
            task("D", &["B", "C"]),
            task("B", &["A"]),
            task("C", &["A"]),
            task("A", &[]),
        ];
        let ordered = resolve_order(&tasks);
        let pos = |id: &str| ordered.iter().position(|t| t.id == id).unwrap();
        assert!(pos("A") < pos("B"));
        assert!(pos("A") < pos("C"));
        assert!(pos("B") < pos("D"));
        assert!(pos("C") < pos("D"));
        assert_eq!(ordered.len(), 4);
    }

    #[test]
    fn test_cycle_emits_each_task_once() {
        // A → B → C → A
        let tasks = vec![task("A", &["C"]), task("B", &["A"]), task("C", &["B"])];
        let graph = DependencyGraph::build(&tasks);
        let resolved = graph.resolve();

        assert!(resolved.has_cycles());
        assert_eq!(resolved.cycle_edges().len(), 1);
        let mut seen = resolved.order().to_vec();
        seen.sort();
        assert_eq!(seen, vec![0, 1, 2]);
    }

    #[test]
    fn test_cycle_edge_not_gating() {
        let tasks = vec![task("A", &["B"]), task("B", &["A"])];
        let resolved = DependencyGraph::build(&tasks).resolve();
        let (node, dep) = resolved.cycle_edges()[0];
        assert!(!resolved.gating_dependencies(node).contains(&dep));
        // The release sequence never deadlocks
        assert_eq!(resolved.release_sequence(&[0, 1]).len(), 2);
    }

    #[test]
    fn test_unknown_and_self_dependencies_ignored() {
        let tasks = vec![task("A", &["A", "ghost"]), task("B", &["A"])];
        let graph = DependencyGraph::build(&tasks);
        assert!(graph.dependencies(0).is_empty());
        assert_eq!(graph.dependencies(1), &[0]);
        assert!(!graph.resolve().has_cycles());
    }

    #[test]
    fn test_external_dependencies_skipped() {
        let tasks = vec![task("B", &["done"])];
        let external: HashSet<&str> = ["done"].into_iter().collect();
        let graph = DependencyGraph::with_external(&tasks, &external);
        assert!(graph.dependencies(0).is_empty());
    }

    #[test]
    fn test_release_sequence_respects_gates() {
        // Preferred order puts B (depends on A) first
        let tasks = vec![task("A", &[]), task("B", &["A"]), task("C", &[])];
        let resolved = DependencyGraph::build(&tasks).resolve();
        let sequence = resolved.release_sequence(&[1, 2, 0]);
        // B waits for A; C is ready immediately
        assert_eq!(sequence, vec![2, 0, 1]);
    }

    #[test]
    fn test_empty() {
        let graph = DependencyGraph::build(&[]);
        assert!(graph.is_empty());
        assert!(graph.resolve().order().is_empty());
    }
}
