//! Solving strategies.
//!
//! - [`Greedy`] — ratio / nearest-neighbor / heaviest-edge heuristics, O(n log n)
//! - [`DivideConquer`] — meet-in-the-middle knapsack, fallback chains elsewhere
//! - [`DynamicProgramming`] — 0/1 knapsack table and Held–Karp TSP
//! - [`Backtracking`] — exhaustive depth-first search with feasibility pruning
//! - [`BranchAndBound`] — best-first search with bound pruning
//!
//! Every exact strategy carries [`SizeGate`]s: instances above a gate are
//! handed to the gate's fallback strategy instead of the exponential search.

mod backtracking;
mod branch_and_bound;
mod divide_conquer;
mod dynamic_programming;
mod greedy;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ParseAlgorithmError;
use crate::models::{Problem, Solution};

pub use backtracking::{Backtracking, BacktrackingConfig};
pub use branch_and_bound::{BranchAndBound, BranchAndBoundConfig};
pub use divide_conquer::{DivideConquer, DivideConquerConfig, MAX_MEET_IN_THE_MIDDLE_ITEMS};
pub use dynamic_programming::{DynamicProgramming, DynamicProgrammingConfig, MAX_HELD_KARP_CITIES};
pub use greedy::Greedy;

/// A strategy that turns a problem instance into a solution.
///
/// Solvers never mutate the problem; all search state lives inside one
/// `solve` call.
pub trait Solver {
    /// Short identifier of the strategy.
    fn name(&self) -> &'static str;

    /// Solves `problem`, running to completion.
    fn solve(&self, problem: &Problem) -> Solution;
}

/// The five strategies, selectable by name.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{Knapsack, Problem, ProblemModel};
/// use np_solvers::solvers::Algorithm;
///
/// let problem: Problem = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50)
///     .unwrap()
///     .into();
/// let dp: Algorithm = "dp".parse().unwrap();
/// assert_eq!(problem.evaluate(&dp.solve(&problem)), 220.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    Greedy,
    DivideConquer,
    DynamicProgramming,
    Backtracking,
    BranchAndBound,
}

impl Algorithm {
    /// All strategies, cheapest first.
    pub const ALL: [Algorithm; 5] = [
        Algorithm::Greedy,
        Algorithm::DivideConquer,
        Algorithm::DynamicProgramming,
        Algorithm::Backtracking,
        Algorithm::BranchAndBound,
    ];

    /// Snake-case name.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Greedy => "greedy",
            Algorithm::DivideConquer => "divide_conquer",
            Algorithm::DynamicProgramming => "dynamic_programming",
            Algorithm::Backtracking => "backtracking",
            Algorithm::BranchAndBound => "branch_and_bound",
        }
    }

    /// Solves `problem` with this strategy's default configuration.
    pub fn solve(self, problem: &Problem) -> Solution {
        match self {
            Algorithm::Greedy => Greedy.solve(problem),
            Algorithm::DivideConquer => DivideConquer::default().solve(problem),
            Algorithm::DynamicProgramming => DynamicProgramming::default().solve(problem),
            Algorithm::Backtracking => Backtracking::default().solve(problem),
            Algorithm::BranchAndBound => BranchAndBound::default().solve(problem),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' ' | '&'))
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "greedy" => Ok(Algorithm::Greedy),
            "divideconquer" | "divideandconquer" | "dc" | "meetinthemiddle" => {
                Ok(Algorithm::DivideConquer)
            }
            "dynamicprogramming" | "dp" => Ok(Algorithm::DynamicProgramming),
            "backtracking" => Ok(Algorithm::Backtracking),
            "branchandbound" | "branchbound" | "bnb" | "bb" => Ok(Algorithm::BranchAndBound),
            _ => Err(ParseAlgorithmError(s.to_string())),
        }
    }
}

/// Size limit above which an exact search is replaced by a fallback.
///
/// # Examples
///
/// ```
/// use np_solvers::solvers::{Algorithm, SizeGate};
///
/// let gate = SizeGate::new(10);
/// assert!(gate.admits(10));
/// assert!(!gate.admits(11));
/// assert_eq!(gate.fallback, Algorithm::Greedy);
///
/// let exact = gate.with_fallback(Algorithm::DivideConquer);
/// assert_eq!(exact.fallback, Algorithm::DivideConquer);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeGate {
    /// Largest size the exact path accepts.
    pub max_exact_size: usize,

    /// Strategy run, with its defaults, on larger instances.
    pub fallback: Algorithm,
}

impl SizeGate {
    /// Gate with the given limit and a greedy fallback.
    pub fn new(max_exact_size: usize) -> Self {
        Self {
            max_exact_size,
            fallback: Algorithm::Greedy,
        }
    }

    /// Gate that admits every size.
    pub fn unbounded() -> Self {
        Self::new(usize::MAX)
    }

    /// Replaces the fallback strategy.
    pub fn with_fallback(mut self, fallback: Algorithm) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns `true` if `size` may run the exact path.
    pub fn admits(&self, size: usize) -> bool {
        size <= self.max_exact_size
    }

    /// The same gate with its limit lowered to at most `limit`.
    pub(crate) fn capped(self, limit: usize) -> Self {
        Self {
            max_exact_size: self.max_exact_size.min(limit),
            ..self
        }
    }

    /// Runs `exact` when `size` is admitted, otherwise the fallback.
    pub(crate) fn run(
        &self,
        solver: &'static str,
        size: usize,
        problem: &Problem,
        exact: impl FnOnce() -> Solution,
    ) -> Solution {
        if self.admits(size) {
            exact()
        } else {
            debug!(
                solver,
                size,
                limit = self.max_exact_size,
                fallback = self.fallback.name(),
                "instance above size gate, delegating"
            );
            self.fallback.solve(problem)
        }
    }
}
