//! 0/1 knapsack instance.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ProblemKind, ProblemModel, Solution};
use crate::error::ProblemError;

/// A 0/1 knapsack instance: items with integer weights and real values,
/// and an integer capacity.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{Knapsack, ProblemModel, Solution};
///
/// let ks = Knapsack::new(vec![10, 20, 30], vec![60.0, 100.0, 120.0], 50).unwrap();
/// let pick = Solution::from_indices(vec![1, 2]);
/// assert_eq!(ks.evaluate(&pick), 220.0);
/// assert!(ks.is_valid(&pick));
/// assert!(!ks.is_valid(&Solution::from_indices(vec![0, 1, 2])));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "KnapsackData", into = "KnapsackData")]
pub struct Knapsack {
    weights: Vec<u64>,
    values: Vec<f64>,
    capacity: u64,
}

/// Raw serialized form, validated on the way in.
#[derive(Serialize, Deserialize)]
struct KnapsackData {
    weights: Vec<u64>,
    values: Vec<f64>,
    capacity: i64,
}

impl Knapsack {
    /// Creates a knapsack instance.
    ///
    /// Fails if the lengths differ, any weight is zero, any value is
    /// negative or non-finite, or the capacity is negative.
    pub fn new(weights: Vec<u64>, values: Vec<f64>, capacity: i64) -> Result<Self, ProblemError> {
        if weights.len() != values.len() {
            return Err(ProblemError::LengthMismatch {
                weights: weights.len(),
                values: values.len(),
            });
        }
        if let Some(index) = weights.iter().position(|&w| w == 0) {
            return Err(ProblemError::ZeroWeight { index });
        }
        if let Some((index, &value)) = values
            .iter()
            .enumerate()
            .find(|(_, v)| !v.is_finite() || **v < 0.0)
        {
            return Err(ProblemError::InvalidValue { index, value });
        }
        let capacity = u64::try_from(capacity).map_err(|_| ProblemError::NegativeCapacity(capacity))?;
        Ok(Self {
            weights,
            values,
            capacity,
        })
    }

    /// Draws a random instance.
    ///
    /// Weights are uniform in `1..=max_weight`, values uniform in
    /// `1..=max_value`, and the capacity is half the total weight, rounded
    /// down.
    pub fn random<R: Rng + ?Sized>(
        num_items: usize,
        max_weight: u64,
        max_value: u64,
        rng: &mut R,
    ) -> Self {
        let max_weight = max_weight.max(1);
        let max_value = max_value.max(1);
        let weights: Vec<u64> = (0..num_items)
            .map(|_| rng.random_range(1..=max_weight))
            .collect();
        let values = (0..num_items)
            .map(|_| rng.random_range(1..=max_value) as f64)
            .collect();
        let capacity = weights.iter().fold(0, |acc: u64, &w| acc.saturating_add(w)) / 2;
        Self {
            weights,
            values,
            capacity,
        }
    }

    /// Item weights.
    pub fn weights(&self) -> &[u64] {
        &self.weights
    }

    /// Item values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Knapsack capacity.
    pub fn capacity(&self) -> u64 {
        self.capacity
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Returns `true` if there are no items.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Sum of weights of the in-range `indices`.
    ///
    /// Saturates at `u64::MAX`, which always exceeds the capacity.
    pub fn total_weight(&self, indices: &[usize]) -> u64 {
        indices
            .iter()
            .filter_map(|&i| self.weights.get(i))
            .fold(0, |acc: u64, &w| acc.saturating_add(w))
    }

    /// Sum of values of the in-range `indices`.
    pub fn total_value(&self, indices: &[usize]) -> f64 {
        indices.iter().filter_map(|&i| self.values.get(i)).sum()
    }
}

impl ProblemModel for Knapsack {
    fn kind(&self) -> ProblemKind {
        ProblemKind::Knapsack
    }

    fn size(&self) -> usize {
        self.len()
    }

    /// Sums chosen values without checking capacity; pair with
    /// [`is_valid`](ProblemModel::is_valid) for feasibility.
    fn evaluate(&self, solution: &Solution) -> f64 {
        self.total_value(solution.indices())
    }

    fn is_valid(&self, solution: &Solution) -> bool {
        let mut seen = vec![false; self.len()];
        for &i in solution.indices() {
            if i >= self.len() || seen[i] {
                return false;
            }
            seen[i] = true;
        }
        self.total_weight(solution.indices()) <= self.capacity
    }
}

impl TryFrom<KnapsackData> for Knapsack {
    type Error = ProblemError;

    fn try_from(data: KnapsackData) -> Result<Self, Self::Error> {
        Self::new(data.weights, data.values, data.capacity)
    }
}

impl From<Knapsack> for KnapsackData {
    fn from(ks: Knapsack) -> Self {
        Self {
            weights: ks.weights,
            values: ks.values,
            capacity: i64::try_from(ks.capacity).unwrap_or(i64::MAX),
        }
    }
}
