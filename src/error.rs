//! Error types.

use thiserror::Error;

/// A malformed problem instance, rejected before any solver runs.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProblemError {
    /// Knapsack weights and values have different lengths.
    #[error("knapsack has {weights} weights but {values} values")]
    LengthMismatch {
        /// Number of weights supplied.
        weights: usize,
        /// Number of values supplied.
        values: usize,
    },

    /// Knapsack item weights must be at least 1.
    #[error("item {index} has zero weight")]
    ZeroWeight {
        /// Offending item index.
        index: usize,
    },

    /// Knapsack item values must be finite and non-negative.
    #[error("item {index} has invalid value {value}")]
    InvalidValue {
        /// Offending item index.
        index: usize,
        /// The rejected value.
        value: f64,
    },

    /// Knapsack capacity must be non-negative.
    #[error("capacity {0} is negative")]
    NegativeCapacity(i64),

    /// City coordinates must be finite.
    #[error("city {index} has non-finite coordinates ({x}, {y})")]
    InvalidCoordinate {
        /// Offending city index.
        index: usize,
        /// X-coordinate.
        x: f64,
        /// Y-coordinate.
        y: f64,
    },

    /// An edge joins a vertex to itself.
    #[error("edge {index} is a self-loop on vertex {vertex}")]
    SelfLoop {
        /// Offending edge index.
        index: usize,
        /// The repeated endpoint.
        vertex: usize,
    },

    /// Edge weights must be finite and non-negative.
    #[error("edge {index} has invalid weight {weight}")]
    InvalidEdgeWeight {
        /// Offending edge index.
        index: usize,
        /// The rejected weight.
        weight: f64,
    },

    /// Generator edge probability is NaN.
    #[error("edge probability {0} is not a number")]
    InvalidProbability(f64),

    /// Generator weight range is non-finite or negative.
    #[error("weight range {start}..{end} must be finite and non-negative")]
    InvalidWeightRange {
        /// Range start.
        start: f64,
        /// Range end.
        end: f64,
    },
}

/// An algorithm name that does not match any strategy.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown algorithm `{0}`")]
pub struct ParseAlgorithmError(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let e = ProblemError::LengthMismatch {
            weights: 3,
            values: 2,
        };
        assert_eq!(e.to_string(), "knapsack has 3 weights but 2 values");
        assert_eq!(
            ProblemError::NegativeCapacity(-5).to_string(),
            "capacity -5 is negative"
        );
        assert_eq!(
            ProblemError::InvalidWeightRange {
                start: -1.0,
                end: 2.0
            }
            .to_string(),
            "weight range -1..2 must be finite and non-negative"
        );
        assert_eq!(
            ParseAlgorithmError("foo".into()).to_string(),
            "unknown algorithm `foo`"
        );
    }
}
