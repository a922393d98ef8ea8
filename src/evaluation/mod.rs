//! Solution scoring and strategy comparison.

mod evaluator;

pub use evaluator::{best, compare, evaluate, is_valid, Outcome};
