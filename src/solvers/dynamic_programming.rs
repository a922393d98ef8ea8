//! Exact dynamic programming.
//!
//! # Algorithm
//!
//! Knapsack: the classic 0/1 table, `dp[i][w]` = best value using the first
//! `i` items within capacity `w`:
//!
//! ```text
//! dp[i][w] = dp[i-1][w]                                        if weight[i-1] > w
//!          = max(dp[i-1][w], dp[i-1][w - weight[i-1]] + value[i-1])  otherwise
//! ```
//!
//! The chosen items are recovered by walking `i` from `n` down to `1` and
//! taking item `i-1` whenever `dp[i][w] != dp[i-1][w]`.
//!
//! TSP (Held–Karp): `dp[mask][u]` = shortest path that starts at city 0,
//! visits exactly the cities in `mask` and ends at `u`. Parent pointers
//! recover the tour.
//!
//! Matching has no DP formulation here and always runs [`Greedy`].
//!
//! Instances whose table would be too large go to the gate's fallback. For
//! knapsack that defaults to [`DivideConquer`](super::DivideConquer), which is still exact up to
//! its own item gate.
//!
//! # Complexity
//!
//! Knapsack: O(n·W) time and space. Held–Karp: O(n²·2ⁿ) time, O(n·2ⁿ)
//! space in a dense bitmask-indexed table.
//!
//! # Reference
//!
//! Held, M. & Karp, R.M. (1962). "A dynamic programming approach to
//! sequencing problems", *Journal of SIAM* 10(1), 196-210.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Algorithm, Greedy, SizeGate, Solver};
use crate::models::{Knapsack, Problem, Solution, Tsp};

/// Configuration for [`DynamicProgramming`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DynamicProgrammingConfig {
    /// Gate on the knapsack table size, `(n + 1) × (capacity + 1)` cells.
    pub knapsack: SizeGate,

    /// Gate on the number of cities for Held–Karp, capped at
    /// [`MAX_HELD_KARP_CITIES`].
    pub tsp: SizeGate,
}

/// Hard limit on Held–Karp instance size; larger gates are lowered to it.
pub const MAX_HELD_KARP_CITIES: usize = 24;

impl Default for DynamicProgrammingConfig {
    fn default() -> Self {
        Self {
            knapsack: SizeGate::new(10_000_000).with_fallback(Algorithm::DivideConquer),
            tsp: SizeGate::new(15),
        }
    }
}

impl DynamicProgrammingConfig {
    pub fn with_knapsack_gate(mut self, gate: SizeGate) -> Self {
        self.knapsack = gate;
        self
    }

    pub fn with_tsp_gate(mut self, gate: SizeGate) -> Self {
        self.tsp = gate;
        self
    }
}

/// Dynamic programming strategy.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{Problem, ProblemModel, Tsp};
/// use np_solvers::solvers::{DynamicProgramming, Solver};
///
/// let problem: Problem = Tsp::new(vec![(0.0, 0.0), (0.0, 1.0), (1.0, 0.0), (1.0, 1.0)])
///     .unwrap()
///     .into();
/// let tour = DynamicProgramming::default().solve(&problem);
/// assert!((problem.evaluate(&tour) - 4.0).abs() < 1e-9);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DynamicProgramming {
    config: DynamicProgrammingConfig,
}

impl DynamicProgramming {
    /// Creates the strategy with the given configuration.
    pub fn new(config: DynamicProgrammingConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &DynamicProgrammingConfig {
        &self.config
    }
}

impl Solver for DynamicProgramming {
    fn name(&self) -> &'static str {
        "dynamic_programming"
    }

    fn solve(&self, problem: &Problem) -> Solution {
        match problem {
            Problem::Knapsack(p) => {
                let cells = usize::try_from(p.capacity())
                    .ok()
                    .and_then(|w| w.checked_add(1))
                    .and_then(|w| w.checked_mul(p.len() + 1))
                    .unwrap_or(usize::MAX);
                self.config
                    .knapsack
                    .run(self.name(), cells, problem, || knapsack_table(p))
            }
            Problem::Tsp(p) => self
                .config
                .tsp
                .capped(MAX_HELD_KARP_CITIES)
                .run(self.name(), p.len(), problem, || held_karp(p)),
            Problem::Matching(_) => Greedy.solve(problem),
        }
    }
}

fn knapsack_table(problem: &Knapsack) -> Solution {
    let n = problem.len();
    // Admitted by the cell gate, so the capacity fits in usize.
    let cap = problem.capacity() as usize;
    let width = cap + 1;
    let weights = problem.weights();
    let values = problem.values();

    let mut dp = vec![0.0f64; (n + 1) * width];
    for i in 1..=n {
        let (prev, row) = dp.split_at_mut(i * width);
        let prev = &prev[(i - 1) * width..];
        let row = &mut row[..width];
        let wi = weights[i - 1];
        for w in 0..width {
            row[w] = if wi > w as u64 {
                prev[w]
            } else {
                prev[w].max(prev[w - wi as usize] + values[i - 1])
            };
        }
    }

    let mut chosen = Vec::new();
    let mut w = cap;
    for i in (1..=n).rev() {
        if dp[i * width + w] != dp[(i - 1) * width + w] {
            chosen.push(i - 1);
            w -= weights[i - 1] as usize;
        }
    }
    trace!(items = n, value = dp[n * width + cap], "knapsack table optimum");
    Solution::from_indices(chosen)
}

const NO_PARENT: usize = usize::MAX;

fn held_karp(problem: &Tsp) -> Solution {
    let n = problem.len();
    if n <= 2 {
        return Solution::from_indices((0..n).collect());
    }

    let states = 1usize << n;
    let idx = |mask: usize, city: usize| mask * n + city;
    let mut cost = vec![f64::INFINITY; states * n];
    let mut parent = vec![NO_PARENT; states * n];

    for i in 1..n {
        let mask = 1 | (1 << i);
        cost[idx(mask, i)] = problem.distance(0, i);
        parent[idx(mask, i)] = 0;
    }

    // Forward relaxation in ascending mask order: every subset is final
    // before any of its supersets is extended.
    for mask in (1..states).filter(|m| m & 1 == 1) {
        for u in 1..n {
            if mask & (1 << u) == 0 {
                continue;
            }
            let here = cost[idx(mask, u)];
            if here.is_infinite() {
                continue;
            }
            for v in 1..n {
                if mask & (1 << v) != 0 {
                    continue;
                }
                let next = mask | (1 << v);
                let candidate = here + problem.distance(u, v);
                if candidate < cost[idx(next, v)] {
                    cost[idx(next, v)] = candidate;
                    parent[idx(next, v)] = u;
                }
            }
        }
    }

    let full = states - 1;
    let mut best = (f64::INFINITY, NO_PARENT);
    for i in 1..n {
        let total = cost[idx(full, i)] + problem.distance(i, 0);
        if total < best.0 {
            best = (total, i);
        }
    }
    trace!(cities = n, length = best.0, "held-karp optimum");

    let mut tour = Vec::with_capacity(n);
    let (mut mask, mut city) = (full, best.1);
    while city != 0 && city != NO_PARENT {
        tour.push(city);
        let prev = parent[idx(mask, city)];
        mask ^= 1 << city;
        city = prev;
    }
    tour.push(0);
    tour.reverse();
    Solution::from_indices(tour)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, GraphMatching, ProblemModel};
    use rand::SeedableRng;

    #[test]
    fn test_knapsack_classic_optimum() {
        let problem: Problem = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50)
            .expect("valid")
            .into();
        let sol = DynamicProgramming::default().solve(&problem);
        let mut picked = sol.indices().to_vec();
        picked.sort_unstable();
        assert_eq!(picked, vec![1, 2]);
        assert_eq!(problem.evaluate(&sol), 220.0);
        assert!(problem.is_valid(&sol));
    }

    #[test]
    fn test_knapsack_zero_capacity_and_empty() {
        let dp = DynamicProgramming::default();
        let zero: Problem = Knapsack::new(vec![1, 2], vec![5.0, 6.0], 0)
            .expect("valid")
            .into();
        assert!(dp.solve(&zero).is_empty());
        let empty: Problem = Knapsack::new(vec![], vec![], 7).expect("valid").into();
        assert!(dp.solve(&empty).is_empty());
    }

    #[test]
    fn test_knapsack_table_gate() {
        let problem: Problem = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50)
            .expect("valid")
            .into();
        let gated = DynamicProgramming::new(
            DynamicProgrammingConfig::default().with_knapsack_gate(SizeGate::new(100)),
        );
        // 4 × 51 cells exceeds the gate: greedy answer.
        assert_eq!(problem.evaluate(&gated.solve(&problem)), 160.0);
    }

    #[test]
    fn test_knapsack_large_capacity_stays_exact() {
        let problem: Problem = Knapsack::new(
            vec![1_000_000, 2_000_000, 3_000_000],
            vec![60.0, 100.0, 120.0],
            5_000_000,
        )
        .expect("valid")
        .into();
        let sol = DynamicProgramming::default().solve(&problem);
        assert_eq!(problem.evaluate(&sol), 220.0);
        assert!(problem.is_valid(&sol));
        assert_eq!(
            DynamicProgrammingConfig::default().knapsack.fallback,
            Algorithm::DivideConquer
        );
    }

    #[test]
    fn test_knapsack_empty_with_max_capacity() {
        let problem: Problem = Knapsack::new(vec![], vec![], i64::MAX).expect("valid").into();
        assert!(DynamicProgramming::default().solve(&problem).is_empty());
    }

    #[test]
    fn test_knapsack_near_max_weights() {
        let problem: Problem = Knapsack::new(vec![2, u64::MAX], vec![10.0, 1.0], 5)
            .expect("valid")
            .into();
        assert_eq!(DynamicProgramming::default().solve(&problem).indices(), &[0]);
    }

    #[test]
    fn test_held_karp_square() {
        let problem: Problem = Tsp::new(vec![(0.0, 0.0), (1.0, 1.0), (1.0, 0.0), (0.0, 1.0)])
            .expect("valid")
            .into();
        let tour = DynamicProgramming::default().solve(&problem);
        assert!(problem.is_valid(&tour));
        assert_eq!(tour.indices()[0], 0);
        assert!((problem.evaluate(&tour) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_held_karp_small_sizes() {
        let dp = DynamicProgramming::default();
        let one: Problem = Tsp::new(vec![(1.0, 1.0)]).expect("valid").into();
        assert_eq!(dp.solve(&one).indices(), &[0]);
        assert_eq!(one.evaluate(&dp.solve(&one)), 0.0);
        let two: Problem = Tsp::new(vec![(0.0, 0.0), (0.0, 2.0)]).expect("valid").into();
        assert!((two.evaluate(&dp.solve(&two)) - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_held_karp_not_worse_than_greedy() {
        let problem: Problem = Tsp::new(vec![(0.0, 0.0), (10.0, 10.0), (20.0, 5.0), (15.0, 20.0)])
            .expect("valid")
            .into();
        let exact = problem.evaluate(&DynamicProgramming::default().solve(&problem));
        let greedy = problem.evaluate(&Greedy.solve(&problem));
        assert!(exact <= greedy + 1e-9);
    }

    #[test]
    fn test_tsp_gate() {
        let problem: Problem = Tsp::new(vec![(0.0, 0.0), (10.0, 0.0), (1.0, 0.0), (2.0, 0.0)])
            .expect("valid")
            .into();
        let gated = DynamicProgramming::new(
            DynamicProgrammingConfig::default().with_tsp_gate(SizeGate::new(3)),
        );
        assert_eq!(gated.solve(&problem), Greedy.solve(&problem));
    }

    #[test]
    fn test_tsp_gate_is_capped() {
        let mut rng = rand::rngs::StdRng::seed_from_u64(11);
        let problem: Problem = Tsp::random(MAX_HELD_KARP_CITIES + 1, 100.0, &mut rng)
            .expect("valid")
            .into();
        let unbounded = DynamicProgramming::new(
            DynamicProgrammingConfig::default().with_tsp_gate(SizeGate::unbounded()),
        );
        assert_eq!(unbounded.solve(&problem), Greedy.solve(&problem));
    }

    #[test]
    fn test_matching_always_greedy() {
        let problem: Problem = GraphMatching::new(vec![
            Edge::new(0, 1, 5.0),
            Edge::new(1, 2, 3.0),
            Edge::new(0, 2, 8.0),
            Edge::new(2, 3, 4.0),
        ])
        .expect("valid")
        .into();
        assert_eq!(
            DynamicProgramming::default().solve(&problem),
            Greedy.solve(&problem)
        );
    }
}
