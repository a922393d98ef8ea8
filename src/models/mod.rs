//! Problem models.
//!
//! Provides the three immutable problem families (knapsack, TSP, graph
//! matching), the [`Solution`] they all score, and the [`ProblemModel`]
//! trait that ties them together.

mod knapsack;
mod matching;
mod problem;
mod solution;
mod tsp;

pub use knapsack::Knapsack;
pub use matching::{Edge, GraphMatching};
pub use problem::{Problem, ProblemKind, ProblemModel, Sense};
pub use solution::Solution;
pub use tsp::Tsp;
