//! Exhaustive depth-first search with feasibility pruning.
//!
//! Each search runs over an explicit LIFO stack of owned nodes: a node
//! carries its own partial solution, so no state has to be restored when
//! the search backs up. Children are pushed in reverse so they pop in the
//! natural order (include before exclude, lower city index first), and a
//! new incumbent must be strictly better, which makes ties resolve to the
//! first solution found in that order.
//!
//! - Knapsack: include/exclude each item in index order; the include branch
//!   is cut when it would exceed capacity. Ungated by default.
//! - TSP: permutations starting at city 0; a partial path is cut once its
//!   length reaches the best complete tour.
//! - Matching: include/exclude each edge in input order; the include branch
//!   is cut when it would reuse a vertex.
//!
//! # Complexity
//!
//! O(2ⁿ) nodes for knapsack and matching, O(n!) for TSP in the worst case.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{SizeGate, Solver};
use crate::models::{GraphMatching, Knapsack, Problem, Solution, Tsp};

/// Configuration for [`Backtracking`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktrackingConfig {
    /// Gate on the number of knapsack items.
    pub knapsack: SizeGate,

    /// Gate on the number of cities.
    pub tsp: SizeGate,

    /// Gate on the number of edges.
    pub matching: SizeGate,
}

impl Default for BacktrackingConfig {
    fn default() -> Self {
        Self {
            knapsack: SizeGate::unbounded(),
            tsp: SizeGate::new(10),
            matching: SizeGate::new(15),
        }
    }
}

impl BacktrackingConfig {
    pub fn with_knapsack_gate(mut self, gate: SizeGate) -> Self {
        self.knapsack = gate;
        self
    }

    pub fn with_tsp_gate(mut self, gate: SizeGate) -> Self {
        self.tsp = gate;
        self
    }

    pub fn with_matching_gate(mut self, gate: SizeGate) -> Self {
        self.matching = gate;
        self
    }
}

/// Backtracking strategy.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{Edge, GraphMatching, Problem, ProblemModel};
/// use np_solvers::solvers::{Backtracking, Solver};
///
/// let problem: Problem = GraphMatching::new(vec![
///     Edge::new(0, 1, 5.0),
///     Edge::new(1, 2, 3.0),
///     Edge::new(0, 2, 8.0),
///     Edge::new(2, 3, 4.0),
/// ])
/// .unwrap()
/// .into();
/// let sol = Backtracking::default().solve(&problem);
/// assert_eq!(problem.evaluate(&sol), 9.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Backtracking {
    config: BacktrackingConfig,
}

impl Backtracking {
    /// Creates the strategy with the given configuration.
    pub fn new(config: BacktrackingConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &BacktrackingConfig {
        &self.config
    }
}

impl Solver for Backtracking {
    fn name(&self) -> &'static str {
        "backtracking"
    }

    fn solve(&self, problem: &Problem) -> Solution {
        match problem {
            Problem::Knapsack(p) => self
                .config
                .knapsack
                .run(self.name(), p.len(), problem, || search_knapsack(p)),
            Problem::Tsp(p) => self
                .config
                .tsp
                .run(self.name(), p.len(), problem, || search_tour(p)),
            Problem::Matching(p) => {
                self.config
                    .matching
                    .run(self.name(), p.num_edges(), problem, || search_matching(p))
            }
        }
    }
}

struct KnapsackNode {
    index: usize,
    chosen: Vec<usize>,
    weight: u64,
    value: f64,
}

fn search_knapsack(problem: &Knapsack) -> Solution {
    let n = problem.len();
    let mut best = (0.0, Vec::new());
    let mut nodes = 0usize;
    let mut stack = vec![KnapsackNode {
        index: 0,
        chosen: Vec::new(),
        weight: 0,
        value: 0.0,
    }];

    while let Some(node) = stack.pop() {
        nodes += 1;
        if node.index == n {
            if node.value > best.0 {
                best = (node.value, node.chosen);
            }
            continue;
        }

        let i = node.index;
        let weight = node.weight.saturating_add(problem.weights()[i]);
        let include = (weight <= problem.capacity()).then(|| {
            let mut chosen = node.chosen.clone();
            chosen.push(i);
            KnapsackNode {
                index: i + 1,
                chosen,
                weight,
                value: node.value + problem.values()[i],
            }
        });
        stack.push(KnapsackNode {
            index: i + 1,
            ..node
        });
        stack.extend(include);
    }

    trace!(items = n, nodes, value = best.0, "knapsack backtracking done");
    Solution::from_indices(best.1)
}

struct TourNode {
    path: Vec<usize>,
    visited: Vec<bool>,
    length: f64,
}

fn search_tour(problem: &Tsp) -> Solution {
    let n = problem.len();
    if n <= 1 {
        return Solution::from_indices((0..n).collect());
    }

    let mut start_visited = vec![false; n];
    start_visited[0] = true;
    let mut stack = vec![TourNode {
        path: vec![0],
        visited: start_visited,
        length: 0.0,
    }];
    let mut best = (f64::INFINITY, Vec::new());
    let mut nodes = 0usize;

    while let Some(node) = stack.pop() {
        nodes += 1;
        // The incumbent may have improved since this node was pushed.
        if node.length >= best.0 {
            continue;
        }
        let last = node.path[node.path.len() - 1];
        if node.path.len() == n {
            let total = node.length + problem.distance(last, 0);
            if total < best.0 {
                best = (total, node.path);
            }
            continue;
        }

        for next in (0..n).rev() {
            if node.visited[next] {
                continue;
            }
            let length = node.length + problem.distance(last, next);
            if length >= best.0 {
                continue;
            }
            let mut path = node.path.clone();
            path.push(next);
            let mut visited = node.visited.clone();
            visited[next] = true;
            stack.push(TourNode {
                path,
                visited,
                length,
            });
        }
    }

    trace!(cities = n, nodes, length = best.0, "tour backtracking done");
    Solution::from_indices(best.1)
}

struct MatchingNode {
    index: usize,
    chosen: Vec<usize>,
    used: Vec<bool>,
    weight: f64,
}

fn search_matching(problem: &GraphMatching) -> Solution {
    let m = problem.num_edges();
    let mut best = (0.0, Vec::new());
    let mut nodes = 0usize;
    let mut stack = vec![MatchingNode {
        index: 0,
        chosen: Vec::new(),
        used: vec![false; problem.num_vertices()],
        weight: 0.0,
    }];

    while let Some(node) = stack.pop() {
        nodes += 1;
        if node.index == m {
            if node.weight > best.0 {
                best = (node.weight, node.chosen);
            }
            continue;
        }

        let i = node.index;
        let (u, v) = problem.endpoints(i);
        let include = (!node.used[u] && !node.used[v]).then(|| {
            let mut chosen = node.chosen.clone();
            chosen.push(i);
            let mut used = node.used.clone();
            used[u] = true;
            used[v] = true;
            MatchingNode {
                index: i + 1,
                chosen,
                used,
                weight: node.weight + problem.edges()[i].weight,
            }
        });
        stack.push(MatchingNode {
            index: i + 1,
            ..node
        });
        stack.extend(include);
    }

    trace!(edges = m, nodes, weight = best.0, "matching backtracking done");
    Solution::from_indices(best.1)
}
