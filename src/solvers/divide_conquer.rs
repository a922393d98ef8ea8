//! Meet-in-the-middle strategy.
//!
//! # Algorithm
//!
//! Knapsack: split the items into two halves and enumerate all subsets of
//! each half. Sort the right-half subsets by weight and keep a running
//! best value, so that for every feasible left subset the best fitting
//! right subset is one binary search away. Exact.
//!
//! TSP and matching have no split formulation here; they run a fallback
//! chain instead: exact [`Backtracking`] on small instances, the gate's
//! fallback above that.
//!
//! # Complexity
//!
//! Knapsack: O(2^(n/2) · n) time and O(2^(n/2)) space. This is still
//! exponential, not a balanced recursive divide-and-conquer, so the
//! knapsack path is gated too.
//!
//! # Reference
//!
//! Horowitz, E. & Sahni, S. (1974). "Computing partitions with applications
//! to the knapsack problem", *Journal of the ACM* 21(2), 277-292.

use serde::{Deserialize, Serialize};
use tracing::trace;

use super::{Backtracking, SizeGate, Solver};
use crate::models::{Knapsack, Problem, Solution};

/// Configuration for [`DivideConquer`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DivideConquerConfig {
    /// Gate on the number of knapsack items, capped at
    /// [`MAX_MEET_IN_THE_MIDDLE_ITEMS`].
    pub knapsack: SizeGate,

    /// Gate on the number of cities for the backtracking path.
    pub tsp: SizeGate,

    /// Gate on the number of edges for the backtracking path.
    pub matching: SizeGate,
}

/// Hard limit on meet-in-the-middle instance size; larger gates are
/// lowered to it.
pub const MAX_MEET_IN_THE_MIDDLE_ITEMS: usize = 60;

impl Default for DivideConquerConfig {
    fn default() -> Self {
        Self {
            knapsack: SizeGate::new(40),
            tsp: SizeGate::new(6),
            matching: SizeGate::new(10),
        }
    }
}

impl DivideConquerConfig {
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

/// Meet-in-the-middle strategy with fallback chains.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{Knapsack, Problem, ProblemModel};
/// use np_solvers::solvers::{DivideConquer, Solver};
///
/// let problem: Problem = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50)
///     .unwrap()
///     .into();
/// let sol = DivideConquer::default().solve(&problem);
/// assert_eq!(problem.evaluate(&sol), 220.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct DivideConquer {
    config: DivideConquerConfig,
}

impl DivideConquer {
    /// Creates the strategy with the given configuration.
    pub fn new(config: DivideConquerConfig) -> Self {
        Self { config }
    }

    /// Current configuration.
    pub fn config(&self) -> &DivideConquerConfig {
        &self.config
    }
}

impl Solver for DivideConquer {
    fn name(&self) -> &'static str {
        "divide_conquer"
    }

    fn solve(&self, problem: &Problem) -> Solution {
        match problem {
            Problem::Knapsack(p) => self
                .config
                .knapsack
                .capped(MAX_MEET_IN_THE_MIDDLE_ITEMS)
                .run(self.name(), p.len(), problem, || meet_in_the_middle(p)),
            Problem::Tsp(p) => self.config.tsp.run(self.name(), p.len(), problem, || {
                Backtracking::default().solve(problem)
            }),
            Problem::Matching(p) => {
                self.config
                    .matching
                    .run(self.name(), p.num_edges(), problem, || {
                        Backtracking::default().solve(problem)
                    })
            }
        }
    }
}

/// One subset of a half: total weight, total value, member bitmask.
#[derive(Debug, Clone, Copy)]
struct Subset {
    weight: u64,
    value: f64,
    mask: u64,
}

/// Enumerates all subsets of `offset..offset + len`, indexed by bitmask.
fn enumerate_half(problem: &Knapsack, offset: usize, len: usize) -> Vec<Subset> {
    let mut subsets = Vec::with_capacity(1 << len);
    subsets.push(Subset {
        weight: 0,
        value: 0.0,
        mask: 0,
    });
    for mask in 1u64..(1u64 << len) {
        // Extend the subset without the lowest bit, already computed.
        let low = mask.trailing_zeros() as usize;
        let prev = subsets[(mask & (mask - 1)) as usize];
        subsets.push(Subset {
            weight: prev.weight.saturating_add(problem.weights()[offset + low]),
            value: prev.value + problem.values()[offset + low],
            mask,
        });
    }
    subsets
}

fn meet_in_the_middle(problem: &Knapsack) -> Solution {
    let n = problem.len();
    if n == 0 {
        return Solution::new();
    }
    let capacity = problem.capacity();
    let mid = n / 2;

    let left = enumerate_half(problem, 0, mid);
    let mut right = enumerate_half(problem, mid, n - mid);
    right.sort_by(|a, b| a.weight.cmp(&b.weight).then(a.mask.cmp(&b.mask)));

    // best_prefix[k] = best subset among right[..=k]; earlier entries win ties.
    let mut best_prefix = Vec::with_capacity(right.len());
    let mut running = right[0];
    for s in &right {
        if s.value > running.value {
            running = *s;
        }
        best_prefix.push(running);
    }

    let mut best: Option<(f64, u64, u64)> = None;
    for l in left.iter().filter(|l| l.weight <= capacity) {
        let remaining = capacity - l.weight;
        let fits = right.partition_point(|r| r.weight <= remaining);
        if fits == 0 {
            continue;
        }
        let r = best_prefix[fits - 1];
        let total = l.value + r.value;
        if best.map_or(true, |(v, _, _)| total > v) {
            best = Some((total, l.mask, r.mask));
        }
    }

    let Some((value, left_mask, right_mask)) = best else {
        return Solution::new();
    };
    trace!(items = n, value, "meet-in-the-middle optimum");

    let chosen = (0..mid)
        .filter(|&i| left_mask & (1 << i) != 0)
        .chain((mid..n).filter(|&i| right_mask & (1 << (i - mid)) != 0))
        .collect();
    Solution::from_indices(chosen)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Edge, GraphMatching, ProblemModel, Tsp};
    use crate::solvers::Greedy;

    fn knapsack(weights: Vec<u64>, values: Vec<f64>, capacity: i64) -> Problem {
        Knapsack::new(weights, values, capacity).expect("valid").into()
    }

    #[test]
    fn test_knapsack_classic() {
        let problem = knapsack(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50);
        let sol = DivideConquer::default().solve(&problem);
        assert_eq!(sol.indices(), &[1, 2]);
        assert!(problem.is_valid(&sol));
    }

    #[test]
    fn test_knapsack_edge_cases() {
        let dc = DivideConquer::default();
        assert!(dc.solve(&knapsack(vec![], vec![], 10)).is_empty());
        assert_eq!(dc.solve(&knapsack(vec![5], vec![3.0], 5)).indices(), &[0]);
        assert!(dc.solve(&knapsack(vec![6], vec![3.0], 5)).is_empty());
        assert!(dc.solve(&knapsack(vec![1, 2], vec![1.0, 2.0], 0)).is_empty());
    }

    #[test]
    fn test_knapsack_odd_split() {
        // Best is items 0, 2 and 4 (weight 9, value 23).
        let problem = knapsack(
            vec![3, 4, 2, 5, 4],
            vec![7.0, 8.0, 6.0, 9.0, 10.0],
            9,
        );
        let sol = DivideConquer::default().solve(&problem);
        assert_eq!(problem.evaluate(&sol), 23.0);
        assert!(problem.is_valid(&sol));
    }

    #[test]
    fn test_knapsack_gate_falls_back_to_greedy() {
        let problem = knapsack(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50);
        let dc = DivideConquer::new(
            DivideConquerConfig::default().with_knapsack_gate(SizeGate::new(2)),
        );
        assert_eq!(dc.solve(&problem).indices(), &[0, 1]);
    }

    #[test]
    fn test_knapsack_overflowing_weights() {
        let problem = knapsack(vec![2, u64::MAX, u64::MAX - 1], vec![10.0, 1.0, 1.0], 5);
        let sol = DivideConquer::default().solve(&problem);
        assert_eq!(sol.indices(), &[0]);
        assert!(problem.is_valid(&sol));
    }

    #[test]
    fn test_knapsack_gate_is_capped() {
        let n = MAX_MEET_IN_THE_MIDDLE_ITEMS + 1;
        let problem = knapsack(vec![1; n], vec![1.0; n], 10);
        let dc = DivideConquer::new(
            DivideConquerConfig::default().with_knapsack_gate(SizeGate::unbounded()),
        );
        assert_eq!(dc.solve(&problem), Greedy.solve(&problem));
    }

    #[test]
    fn test_tsp_chain() {
        let problem: Problem = Tsp::new(vec![(0.0, 0.0), (2.0, 0.0), (1.0, 0.0), (3.0, 0.0)])
            .expect("valid")
            .into();
        let exact = DivideConquer::default().solve(&problem);
        assert!((problem.evaluate(&exact) - 6.0).abs() < 1e-9);

        let gated = DivideConquer::new(DivideConquerConfig::default().with_tsp_gate(SizeGate::new(3)));
        // Nearest neighbor: 0 -> 2 -> 1 -> 3, also length 6 on a line.
        assert_eq!(gated.solve(&problem).indices(), &[0, 2, 1, 3]);
    }

    #[test]
    fn test_matching_chain() {
        let problem: Problem = GraphMatching::new(vec![
            Edge::new(0, 1, 5.0),
            Edge::new(1, 2, 3.0),
            Edge::new(0, 2, 8.0),
            Edge::new(2, 3, 4.0),
        ])
        .expect("valid")
        .into();
        assert_eq!(problem.evaluate(&DivideConquer::default().solve(&problem)), 9.0);

        let gated = DivideConquer::new(
            DivideConquerConfig::default().with_matching_gate(SizeGate::new(3)),
        );
        assert_eq!(problem.evaluate(&gated.solve(&problem)), 8.0);
    }
}
