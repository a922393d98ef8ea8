//! Euclidean traveling salesman instance.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ProblemKind, ProblemModel, Solution};
use crate::distance::DistanceMatrix;
use crate::error::ProblemError;

/// A set of cities in the plane with their all-pairs Euclidean distances.
///
/// The distance matrix is computed once in [`Tsp::new`] and kept for the
/// lifetime of the instance.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{ProblemModel, Solution, Tsp};
///
/// let tsp = Tsp::new(vec![(0.0, 0.0), (3.0, 0.0), (3.0, 4.0)]).unwrap();
/// assert!((tsp.distance(0, 2) - 5.0).abs() < 1e-10);
/// assert!((tsp.evaluate(&Solution::from_indices(vec![0, 1, 2])) - 12.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "TspData", into = "TspData")]
pub struct Tsp {
    cities: Vec<(f64, f64)>,
    distances: DistanceMatrix,
}

#[derive(Serialize, Deserialize)]
struct TspData {
    cities: Vec<(f64, f64)>,
}

impl Tsp {
    /// Creates an instance, rejecting non-finite coordinates.
    pub fn new(cities: Vec<(f64, f64)>) -> Result<Self, ProblemError> {
        if let Some((index, &(x, y))) = cities
            .iter()
            .enumerate()
            .find(|(_, (x, y))| !x.is_finite() || !y.is_finite())
        {
            return Err(ProblemError::InvalidCoordinate { index, x, y });
        }
        let distances = DistanceMatrix::from_points(&cities);
        Ok(Self { cities, distances })
    }

    /// Draws `num_cities` cities uniformly from `[0, max_coord)²`.
    ///
    /// Fails like [`Tsp::new`] when a non-finite `max_coord` produces
    /// non-finite coordinates.
    pub fn random<R: Rng + ?Sized>(
        num_cities: usize,
        max_coord: f64,
        rng: &mut R,
    ) -> Result<Self, ProblemError> {
        let cities = (0..num_cities)
            .map(|_| (rng.random::<f64>() * max_coord, rng.random::<f64>() * max_coord))
            .collect();
        Self::new(cities)
    }

    /// City coordinates.
    pub fn cities(&self) -> &[(f64, f64)] {
        &self.cities
    }

    /// Number of cities.
    pub fn len(&self) -> usize {
        self.cities.len()
    }

    /// Returns `true` if there are no cities.
    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    /// Distance between two cities.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn distance(&self, from: usize, to: usize) -> f64 {
        self.distances.get(from, to)
    }

    /// The cached distance matrix.
    pub fn distances(&self) -> &DistanceMatrix {
        &self.distances
    }

    /// Length of the closed tour through `tour`, wrapping last to first.
    ///
    /// Indices must be in range.
    pub fn tour_length(&self, tour: &[usize]) -> f64 {
        tour.iter()
            .zip(tour.iter().cycle().skip(1))
            .map(|(&a, &b)| self.distance(a, b))
            .sum()
    }

    fn is_permutation(&self, tour: &[usize]) -> bool {
        if tour.len() != self.len() {
            return false;
        }
        let mut seen = vec![false; self.len()];
        for &c in tour {
            if c >= self.len() || seen[c] {
                return false;
            }
            seen[c] = true;
        }
        true
    }
}

impl ProblemModel for Tsp {
    fn kind(&self) -> ProblemKind {
        ProblemKind::Tsp
    }

    fn size(&self) -> usize {
        self.len()
    }

    /// Closed-tour length; `+inf` for out-of-range cities and for
    /// sequences shorter than two cities, except the complete tour of a
    /// zero- or one-city instance, which has length `0`.
    fn evaluate(&self, solution: &Solution) -> f64 {
        let tour = solution.indices();
        if tour.len() < 2 {
            return if self.is_permutation(tour) {
                0.0
            } else {
                f64::INFINITY
            };
        }
        if tour.iter().any(|&c| c >= self.len()) {
            return f64::INFINITY;
        }
        self.tour_length(tour)
    }

    fn is_valid(&self, solution: &Solution) -> bool {
        self.is_permutation(solution.indices())
    }
}

impl TryFrom<TspData> for Tsp {
    type Error = ProblemError;

    fn try_from(data: TspData) -> Result<Self, Self::Error> {
        Self::new(data.cities)
    }
}

impl From<Tsp> for TspData {
    fn from(tsp: Tsp) -> Self {
        Self { cities: tsp.cities }
    }
}
