//! Solution type.

use serde::{Deserialize, Serialize};

/// An ordered sequence of indices produced by a solver.
///
/// The meaning depends on the problem: chosen item indices for knapsack,
/// the visiting order of a closed tour for TSP, and chosen edge indices for
/// graph matching.
///
/// # Examples
///
/// ```
/// use np_solvers::models::Solution;
///
/// let sol = Solution::from_indices(vec![2, 0]);
/// assert_eq!(sol.indices(), &[2, 0]);
/// assert_eq!(sol.len(), 2);
/// assert!(Solution::new().is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Solution {
    indices: Vec<usize>,
}

impl Solution {
    /// Creates an empty solution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wraps an index sequence.
    pub fn from_indices(indices: Vec<usize>) -> Self {
        Self { indices }
    }

    /// The indices, in solver output order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Number of indices.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Returns `true` if no index was chosen.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Consumes the solution, returning its indices.
    pub fn into_indices(self) -> Vec<usize> {
        self.indices
    }
}

impl From<Vec<usize>> for Solution {
    fn from(indices: Vec<usize>) -> Self {
        Self::from_indices(indices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_solution_empty() {
        let sol = Solution::new();
        assert!(sol.is_empty());
        assert_eq!(sol.len(), 0);
        assert_eq!(sol, Solution::default());
    }

    #[test]
    fn test_solution_from_vec() {
        let sol: Solution = vec![3, 1, 2].into();
        assert_eq!(sol.indices(), &[3, 1, 2]);
        assert_eq!(sol.into_indices(), vec![3, 1, 2]);
    }

    #[test]
    fn test_solution_serializes_as_list() {
        let sol = Solution::from_indices(vec![0, 4]);
        let json = serde_json::to_string(&sol).expect("serialize");
        assert_eq!(json, "[0,4]");
        let back: Solution = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, sol);
    }
}
