//! Problem trait and the closed set of problem variants.

use serde::{Deserialize, Serialize};

use super::{GraphMatching, Knapsack, Solution, Tsp};

/// Optimization direction of an objective.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sense {
    /// Larger objective values are better.
    Maximize,
    /// Smaller objective values are better.
    Minimize,
}

impl Sense {
    /// Returns `true` if `a` is strictly better than `b`.
    pub fn is_better(self, a: f64, b: f64) -> bool {
        match self {
            Sense::Maximize => a > b,
            Sense::Minimize => a < b,
        }
    }

    /// The value `evaluate` reports for an infeasible solution:
    /// `0` when maximizing, `+inf` when minimizing.
    pub fn infeasible_value(self) -> f64 {
        match self {
            Sense::Maximize => 0.0,
            Sense::Minimize => f64::INFINITY,
        }
    }
}

/// Which of the three problem families an instance belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProblemKind {
    /// 0/1 knapsack.
    Knapsack,
    /// Euclidean traveling salesman.
    Tsp,
    /// Maximum-weight graph matching.
    Matching,
}

impl ProblemKind {
    /// Optimization direction of this family.
    pub fn sense(self) -> Sense {
        match self {
            ProblemKind::Knapsack | ProblemKind::Matching => Sense::Maximize,
            ProblemKind::Tsp => Sense::Minimize,
        }
    }
}

/// Capabilities every problem instance exposes to solvers and callers.
///
/// Implementations are immutable: every method takes `&self`, so one
/// instance can be shared by any number of concurrent solves.
pub trait ProblemModel: Send + Sync {
    /// The problem family.
    fn kind(&self) -> ProblemKind;

    /// Instance size used by size gates: items, cities or edges.
    fn size(&self) -> usize;

    /// Objective value of `solution`.
    ///
    /// Total: never panics. Infeasible inputs map to
    /// [`Sense::infeasible_value`] where the family defines a sentinel.
    fn evaluate(&self, solution: &Solution) -> f64;

    /// Returns `true` if `solution` satisfies every constraint.
    fn is_valid(&self, solution: &Solution) -> bool;

    /// Optimization direction.
    fn sense(&self) -> Sense {
        self.kind().sense()
    }
}

/// A problem instance of any supported family.
///
/// Solvers match on this enum exhaustively, so a strategy without a case
/// for some family does not compile.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{Knapsack, Problem, ProblemKind, ProblemModel, Solution};
///
/// let problem: Problem = Knapsack::new(vec![10, 20], vec![60.0, 100.0], 25)
///     .unwrap()
///     .into();
/// assert_eq!(problem.kind(), ProblemKind::Knapsack);
/// assert_eq!(problem.evaluate(&Solution::from_indices(vec![1])), 100.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Problem {
    /// 0/1 knapsack instance.
    Knapsack(Knapsack),
    /// TSP instance.
    Tsp(Tsp),
    /// Graph matching instance.
    Matching(GraphMatching),
}

impl Problem {
    fn model(&self) -> &dyn ProblemModel {
        match self {
            Problem::Knapsack(p) => p as &dyn ProblemModel,
            Problem::Tsp(p) => p,
            Problem::Matching(p) => p,
        }
    }
}

impl ProblemModel for Problem {
    fn kind(&self) -> ProblemKind {
        self.model().kind()
    }

    fn size(&self) -> usize {
        self.model().size()
    }

    fn evaluate(&self, solution: &Solution) -> f64 {
        self.model().evaluate(solution)
    }

    fn is_valid(&self, solution: &Solution) -> bool {
        self.model().is_valid(solution)
    }
}

impl From<Knapsack> for Problem {
    fn from(p: Knapsack) -> Self {
        Problem::Knapsack(p)
    }
}

impl From<Tsp> for Problem {
    fn from(p: Tsp) -> Self {
        Problem::Tsp(p)
    }
}

impl From<GraphMatching> for Problem {
    fn from(p: GraphMatching) -> Self {
        Problem::Matching(p)
    }
}
