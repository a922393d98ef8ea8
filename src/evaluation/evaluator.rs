//! Scoring solutions and comparing strategies on one instance.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::models::{Problem, ProblemModel, Sense, Solution};
use crate::solvers::Algorithm;

/// Objective value of `solution`, with the infeasibility sentinels of
/// [`ProblemModel::evaluate`].
pub fn evaluate(problem: &Problem, solution: &Solution) -> f64 {
    problem.evaluate(solution)
}

/// Returns `true` if `solution` satisfies every constraint of `problem`.
pub fn is_valid(problem: &Problem, solution: &Solution) -> bool {
    problem.is_valid(solution)
}

/// Result of running one strategy on one instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    /// The strategy that produced the solution.
    pub algorithm: Algorithm,
    /// The solution returned.
    pub solution: Solution,
    /// Its objective value.
    pub objective: f64,
    /// Whether it satisfies every constraint.
    pub feasible: bool,
}

/// Runs each of `algorithms` on `problem` with default configuration.
///
/// Outcomes are returned in the order of `algorithms`. A degenerate
/// strategy shows up as an infeasible outcome rather than an error, so the
/// sweep always completes.
///
/// # Examples
///
/// ```
/// use np_solvers::evaluation::{best, compare};
/// use np_solvers::models::{Knapsack, Problem, ProblemModel};
/// use np_solvers::solvers::Algorithm;
///
/// let problem: Problem = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50)
///     .unwrap()
///     .into();
/// let outcomes = compare(&problem, &Algorithm::ALL);
/// assert_eq!(outcomes.len(), 5);
/// let winner = best(&outcomes, problem.sense()).unwrap();
/// assert_eq!(winner.algorithm, Algorithm::DivideConquer);
/// assert_eq!(winner.objective, 220.0);
/// ```
pub fn compare(problem: &Problem, algorithms: &[Algorithm]) -> Vec<Outcome> {
    algorithms
        .iter()
        .map(|&algorithm| {
            let solution = algorithm.solve(problem);
            let objective = problem.evaluate(&solution);
            let feasible = problem.is_valid(&solution);
            debug!(
                algorithm = algorithm.name(),
                kind = ?problem.kind(),
                objective,
                feasible,
                "strategy finished"
            );
            Outcome {
                algorithm,
                solution,
                objective,
                feasible,
            }
        })
        .collect()
}

/// The best feasible outcome under `sense`; the earliest wins ties.
pub fn best(outcomes: &[Outcome], sense: Sense) -> Option<&Outcome> {
    outcomes
        .iter()
        .filter(|o| o.feasible)
        .fold(None, |acc: Option<&Outcome>, o| match acc {
            Some(b) if !sense.is_better(o.objective, b.objective) => Some(b),
            _ => Some(o),
        })
}
