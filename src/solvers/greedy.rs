//! Greedy heuristics.
//!
//! - Knapsack: take items by descending value/weight ratio while they fit.
//! - TSP: nearest-neighbor tour from city 0.
//! - Matching: take edges by descending weight while both endpoints are free.
//!
//! # Complexity
//!
//! O(n log n) for knapsack and matching (sorting), O(n²) for TSP.
//!
//! None of the three is exact; they serve as the fast baseline and as the
//! fallback of every size-gated exact strategy. Ties resolve to the lower
//! original index.

use super::Solver;
use crate::models::{GraphMatching, Knapsack, Problem, Solution, Tsp};

/// Greedy strategy.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{Knapsack, Problem};
/// use np_solvers::solvers::{Greedy, Solver};
///
/// let problem: Problem = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50)
///     .unwrap()
///     .into();
/// assert_eq!(Greedy.solve(&problem).indices(), &[0, 1]);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Greedy;

impl Solver for Greedy {
    fn name(&self) -> &'static str {
        "greedy"
    }

    fn solve(&self, problem: &Problem) -> Solution {
        match problem {
            Problem::Knapsack(p) => ratio_knapsack(p),
            Problem::Tsp(p) => nearest_neighbor_tour(p),
            Problem::Matching(p) => heaviest_edge_matching(p),
        }
    }
}

fn ratio_knapsack(problem: &Knapsack) -> Solution {
    let weights = problem.weights();
    let values = problem.values();
    let mut order: Vec<usize> = (0..problem.len()).collect();
    // Stable sort keeps ascending index order among equal ratios.
    order.sort_by(|&a, &b| {
        let ra = values[a] / weights[a] as f64;
        let rb = values[b] / weights[b] as f64;
        rb.total_cmp(&ra)
    });

    let mut chosen = Vec::new();
    let mut load = 0u64;
    for i in order {
        let next = load.saturating_add(weights[i]);
        if next <= problem.capacity() {
            chosen.push(i);
            load = next;
        }
    }
    Solution::from_indices(chosen)
}

fn nearest_neighbor_tour(problem: &Tsp) -> Solution {
    let n = problem.len();
    if n <= 1 {
        return Solution::from_indices((0..n).collect());
    }

    let mut unvisited: Vec<usize> = (1..n).collect();
    let mut tour = Vec::with_capacity(n);
    let mut current = 0;
    tour.push(current);

    while let Some(next) = problem.distances().nearest_neighbor(current, &unvisited) {
        unvisited.retain(|&c| c != next);
        tour.push(next);
        current = next;
    }
    Solution::from_indices(tour)
}

fn heaviest_edge_matching(problem: &GraphMatching) -> Solution {
    let edges = problem.edges();
    let mut order: Vec<usize> = (0..edges.len()).collect();
    order.sort_by(|&a, &b| edges[b].weight.total_cmp(&edges[a].weight));

    let mut used = vec![false; problem.num_vertices()];
    let mut chosen = Vec::new();
    for i in order {
        let (u, v) = problem.endpoints(i);
        if !used[u] && !used[v] {
            used[u] = true;
            used[v] = true;
            chosen.push(i);
        }
    }
    Solution::from_indices(chosen)
}
