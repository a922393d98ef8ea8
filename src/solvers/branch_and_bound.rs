//! Best-first branch-and-bound.
//!
//! All three searches pop the most promising open node from a
//! [`BinaryHeap`] and discard nodes whose bound cannot beat the incumbent.
//! Equal priorities pop in insertion order.
//!
//! - Knapsack: items are branched in descending value/weight order and
//!   bounded by the fractional (LP) relaxation, which never underestimates
//!   the best completion. Exact.
//! - TSP: priority is the path length plus `tsp_bound_factor` times the sum
//!   of the cheapest edge leaving each unvisited city. Every unvisited city
//!   must be left once, so any factor in `[0, 1]` keeps the bound a lower
//!   bound and the search exact; larger factors turn it into a heuristic.
//! - Matching: priority is the accumulated weight; nodes are cut when the
//!   weight plus all remaining edge weights cannot beat the incumbent.
//!
//! # Reference
//!
//! Land, A.H. & Doig, A.G. (1960). "An automatic method of solving discrete
//! programming problems", *Econometrica* 28(3), 497-520.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{SizeGate, Solver};
use crate::models::{GraphMatching, Knapsack, Problem, Solution, Tsp};

/// Configuration for [`BranchAndBound`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BranchAndBoundConfig {
    /// Gate on the number of knapsack items.
    pub knapsack: SizeGate,

    /// Gate on the number of cities.
    pub tsp: SizeGate,

    /// Gate on the number of edges.
    pub matching: SizeGate,

    /// Weight of the cheapest-outgoing-edge estimate in the TSP bound.
    pub tsp_bound_factor: f64,
}

impl Default for BranchAndBoundConfig {
    fn default() -> Self {
        Self {
            knapsack: SizeGate::unbounded(),
            tsp: SizeGate::new(12),
            matching: SizeGate::new(15),
            tsp_bound_factor: 0.5,
        }
    }
}

impl BranchAndBoundConfig {
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

    pub fn with_tsp_bound_factor(mut self, factor: f64) -> Self {
        self.tsp_bound_factor = factor;
        self
    }
}

/// Branch-and-bound strategy.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{Knapsack, Problem, ProblemModel};
/// use np_solvers::solvers::{BranchAndBound, Solver};
///
/// let problem: Problem = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50)
///     .unwrap()
///     .into();
/// let sol = BranchAndBound::default().solve(&problem);
/// assert_eq!(problem.evaluate(&sol), 220.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct BranchAndBound {
    config: BranchAndBoundConfig,
}

impl BranchAndBound {
    /// Creates the strategy with the given configuration.
    pub fn new(config: BranchAndBoundConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &BranchAndBoundConfig {
        &self.config
    }
}

impl Solver for BranchAndBound {
    fn name(&self) -> &'static str {
        "branch_and_bound"
    }

    fn solve(&self, problem: &Problem) -> Solution {
        match problem {
            Problem::Knapsack(p) => self
                .config
                .knapsack
                .run(self.name(), p.len(), problem, || search_knapsack(p)),
            Problem::Tsp(p) => self.config.tsp.run(self.name(), p.len(), problem, || {
                search_tour(p, self.config.tsp_bound_factor)
            }),
            Problem::Matching(p) => {
                self.config
                    .matching
                    .run(self.name(), p.num_edges(), problem, || search_matching(p))
            }
        }
    }
}

/// Heap entry: larger `priority` pops first, then lower `seq`.
struct Open<T> {
    priority: f64,
    seq: usize,
    node: T,
}

impl<T> PartialEq for Open<T> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<T> Eq for Open<T> {}

impl<T> PartialOrd for Open<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Open<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.priority
            .total_cmp(&other.priority)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Max-heap with insertion-order tie-breaking.
struct Frontier<T> {
    heap: BinaryHeap<Open<T>>,
    seq: usize,
}

impl<T> Frontier<T> {
    fn new() -> Self {
        Self {
            heap: BinaryHeap::new(),
            seq: 0,
        }
    }

    fn push(&mut self, priority: f64, node: T) {
        self.heap.push(Open {
            priority,
            seq: self.seq,
            node,
        });
        self.seq += 1;
    }

    fn pop(&mut self) -> Option<(f64, T)> {
        self.heap.pop().map(|open| (open.priority, open.node))
    }

    fn pushed(&self) -> usize {
        self.seq
    }
}

struct KnapsackNode {
    level: usize,
    chosen: Vec<usize>,
    weight: u64,
    value: f64,
}

/// Fractional-relaxation upper bound for items `order[level..]`.
fn fractional_bound(problem: &Knapsack, order: &[usize], level: usize, weight: u64, value: f64) -> f64 {
    let mut room = problem.capacity() - weight;
    let mut bound = value;
    for &i in &order[level..] {
        let w = problem.weights()[i];
        if w <= room {
            room -= w;
            bound += problem.values()[i];
        } else {
            bound += problem.values()[i] * room as f64 / w as f64;
            break;
        }
    }
    bound
}

fn search_knapsack(problem: &Knapsack) -> Solution {
    let n = problem.len();
    let weights = problem.weights();
    let values = problem.values();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| {
        let ra = values[a] / weights[a] as f64;
        let rb = values[b] / weights[b] as f64;
        rb.total_cmp(&ra)
    });

    let mut best = (0.0, Vec::new());
    let mut frontier = Frontier::new();
    frontier.push(
        fractional_bound(problem, &order, 0, 0, 0.0),
        KnapsackNode {
            level: 0,
            chosen: Vec::new(),
            weight: 0,
            value: 0.0,
        },
    );

    while let Some((bound, node)) = frontier.pop() {
        if bound <= best.0 || node.level == n {
            continue;
        }
        let item = order[node.level];
        let level = node.level + 1;

        let weight = node.weight.saturating_add(weights[item]);
        if weight <= problem.capacity() {
            let value = node.value + values[item];
            let mut chosen = node.chosen.clone();
            chosen.push(item);
            if value > best.0 {
                best = (value, chosen.clone());
            }
            let child_bound = fractional_bound(problem, &order, level, weight, value);
            if level < n && child_bound > best.0 {
                frontier.push(
                    child_bound,
                    KnapsackNode {
                        level,
                        chosen,
                        weight,
                        value,
                    },
                );
            }
        }

        let child_bound = fractional_bound(problem, &order, level, node.weight, node.value);
        if level < n && child_bound > best.0 {
            frontier.push(child_bound, KnapsackNode { level, ..node });
        }
    }

    trace!(
        items = n,
        nodes = frontier.pushed(),
        value = best.0,
        "knapsack branch-and-bound done"
    );
    let mut chosen = best.1;
    chosen.sort_unstable();
    Solution::from_indices(chosen)
}

struct TourNode {
    path: Vec<usize>,
    visited: Vec<bool>,
    length: f64,
}

fn search_tour(problem: &Tsp, factor: f64) -> Solution {
    let n = problem.len();
    if n <= 1 {
        return Solution::from_indices((0..n).collect());
    }

    let cheapest: Vec<f64> = (0..n).map(|c| problem.distances().min_outgoing(c)).collect();
    let mut visited = vec![false; n];
    visited[0] = true;

    let mut best = (f64::INFINITY, Vec::new());
    // Min-heap through negated bounds.
    let mut frontier = Frontier::new();
    frontier.push(
        0.0,
        TourNode {
            path: vec![0],
            visited,
            length: 0.0,
        },
    );

    while let Some((neg_bound, node)) = frontier.pop() {
        if -neg_bound >= best.0 {
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

        for next in 0..n {
            if node.visited[next] {
                continue;
            }
            let length = node.length + problem.distance(last, next);
            let mut visited = node.visited.clone();
            visited[next] = true;
            let estimate: f64 = (0..n)
                .filter(|&c| !visited[c])
                .map(|c| cheapest[c])
                .sum();
            let bound = length + factor * estimate;
            if bound < best.0 {
                let mut path = node.path.clone();
                path.push(next);
                frontier.push(
                    -bound,
                    TourNode {
                        path,
                        visited,
                        length,
                    },
                );
            }
        }
    }

    trace!(
        cities = n,
        nodes = frontier.pushed(),
        length = best.0,
        "tour branch-and-bound done"
    );
    if best.1.is_empty() {
        return Solution::from_indices((0..n).collect());
    }
    Solution::from_indices(best.1)
}

struct MatchingNode {
    index: usize,
    chosen: Vec<usize>,
    used: Vec<bool>,
}

fn search_matching(problem: &GraphMatching) -> Solution {
    let m = problem.num_edges();
    let edges = problem.edges();
    // remaining[i] = total weight of edges i..m.
    let mut remaining = vec![0.0; m + 1];
    for i in (0..m).rev() {
        remaining[i] = remaining[i + 1] + edges[i].weight;
    }

    let mut best = (0.0, Vec::new());
    let mut frontier = Frontier::new();
    frontier.push(
        0.0,
        MatchingNode {
            index: 0,
            chosen: Vec::new(),
            used: vec![false; problem.num_vertices()],
        },
    );

    while let Some((weight, node)) = frontier.pop() {
        if node.index == m || weight + remaining[node.index] <= best.0 {
            continue;
        }
        let i = node.index;
        let (u, v) = problem.endpoints(i);

        if !node.used[u] && !node.used[v] {
            let mut chosen = node.chosen.clone();
            chosen.push(i);
            let mut used = node.used.clone();
            used[u] = true;
            used[v] = true;
            let included = weight + edges[i].weight;
            if included > best.0 {
                best = (included, chosen.clone());
            }
            frontier.push(
                included,
                MatchingNode {
                    index: i + 1,
                    chosen,
                    used,
                },
            );
        }
        frontier.push(weight, MatchingNode { index: i + 1, ..node });
    }

    trace!(
        edges = m,
        nodes = frontier.pushed(),
        weight = best.0,
        "matching branch-and-bound done"
    );
    Solution::from_indices(best.1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, ProblemModel};
    use crate::solvers::{Backtracking, DynamicProgramming, Greedy};

    #[test]
    fn test_frontier_order() {
        let mut f = Frontier::new();
        f.push(1.0, "a");
        f.push(3.0, "b");
        f.push(3.0, "c");
        f.push(2.0, "d");
        let order: Vec<&str> = std::iter::from_fn(|| f.pop().map(|(_, n)| n)).collect();
        assert_eq!(order, vec!["b", "c", "d", "a"]);
    }

    #[test]
    fn test_fractional_bound() {
        let ks = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50).expect("valid");
        let order = vec![0, 1, 2];
        // 60 + 100 + 20/30 * 120 = 240.
        assert!((fractional_bound(&ks, &order, 0, 0, 0.0) - 240.0).abs() < 1e-9);
        assert!((fractional_bound(&ks, &order, 3, 50, 220.0) - 220.0).abs() < 1e-9);
    }

    #[test]
    fn test_knapsack_classic() {
        let problem: Problem = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50)
            .expect("valid")
            .into();
        let sol = BranchAndBound::default().solve(&problem);
        assert_eq!(sol.indices(), &[1, 2]);
        assert!(problem.is_valid(&sol));
    }

    #[test]
    fn test_knapsack_empty_and_tight() {
        let bnb = BranchAndBound::default();
        let empty: Problem = Knapsack::new(vec![], vec![], 3).expect("valid").into();
        assert!(bnb.solve(&empty).is_empty());
        let tight: Problem = Knapsack::new(vec![4, 5], vec![1.0, 1.0], 3)
            .expect("valid")
            .into();
        assert!(bnb.solve(&tight).is_empty());
    }

    #[test]
    fn test_tour_matches_held_karp() {
        let problem: Problem = Tsp::new(vec![
            (0.0, 0.0),
            (10.0, 10.0),
            (20.0, 5.0),
            (15.0, 20.0),
            (3.0, 17.0),
            (8.0, 2.0),
        ])
        .expect("valid")
        .into();
        let bnb = problem.evaluate(&BranchAndBound::default().solve(&problem));
        let dp = problem.evaluate(&DynamicProgramming::default().solve(&problem));
        assert!((bnb - dp).abs() < 1e-9);
    }

    #[test]
    fn test_tour_full_factor_still_exact() {
        let problem: Problem = Tsp::new(vec![(0.0, 0.0), (4.0, 0.0), (4.0, 3.0), (0.0, 3.0), (2.0, 5.0)])
            .expect("valid")
            .into();
        let bnb = BranchAndBound::new(BranchAndBoundConfig::default().with_tsp_bound_factor(1.0));
        let tour = bnb.solve(&problem);
        assert!(problem.is_valid(&tour));
        let dp = problem.evaluate(&DynamicProgramming::default().solve(&problem));
        assert!((problem.evaluate(&tour) - dp).abs() < 1e-9);
    }

    #[test]
    fn test_tour_gate() {
        let cities: Vec<(f64, f64)> = (0..13).map(|i| (i as f64, (i * 5 % 11) as f64)).collect();
        let problem: Problem = Tsp::new(cities).expect("valid").into();
        assert_eq!(BranchAndBound::default().solve(&problem), Greedy.solve(&problem));
    }

    #[test]
    fn test_matching_scenario() {
        let problem: Problem = GraphMatching::new(vec![
            Edge::new(0, 1, 5.0),
            Edge::new(1, 2, 3.0),
            Edge::new(0, 2, 8.0),
            Edge::new(2, 3, 4.0),
        ])
        .expect("valid")
        .into();
        let sol = BranchAndBound::default().solve(&problem);
        assert_eq!(problem.evaluate(&sol), 9.0);
        assert_eq!(
            problem.evaluate(&sol),
            problem.evaluate(&Backtracking::default().solve(&problem))
        );
    }

    #[test]
    fn test_matching_empty() {
        let problem: Problem = GraphMatching::new(vec![]).expect("valid").into();
        assert!(BranchAndBound::default().solve(&problem).is_empty());
    }
}
