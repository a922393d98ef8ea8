//! # np-solvers
//!
//! Three NP-hard combinatorial problems solved by five strategies, so that
//! solution quality can be compared across strategies on the same instance.
//!
//! ## Modules
//!
//! - [`models`] — Problem families (Knapsack, TSP, GraphMatching), Solution, ProblemModel trait
//! - [`distance`] — Dense distance matrix cached by TSP instances
//! - [`generate`] — Seeded random instance generation
//! - [`solvers`] — Greedy, meet-in-the-middle, DP, backtracking, branch-and-bound
//! - [`evaluation`] — Scoring and cross-strategy comparison
//! - [`error`] — Construction and parsing errors
//!
//! ## Example
//!
//! ```
//! use np_solvers::models::{Edge, GraphMatching, Problem};
//! use np_solvers::solvers::{Algorithm, Backtracking, Greedy, Solver};
//! use np_solvers::evaluation::evaluate;
//!
//! let problem: Problem = GraphMatching::new(vec![
//!     Edge::new(0, 1, 5.0),
//!     Edge::new(1, 2, 3.0),
//!     Edge::new(0, 2, 8.0),
//!     Edge::new(2, 3, 4.0),
//! ])?
//! .into();
//!
//! assert_eq!(evaluate(&problem, &Greedy.solve(&problem)), 8.0);
//! assert_eq!(evaluate(&problem, &Backtracking::default().solve(&problem)), 9.0);
//! assert_eq!(evaluate(&problem, &Algorithm::BranchAndBound.solve(&problem)), 9.0);
//! # Ok::<(), np_solvers::error::ProblemError>(())
//! ```

pub mod distance;
pub mod error;
pub mod evaluation;
pub mod generate;
pub mod models;
pub mod solvers;
