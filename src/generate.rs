//! Random instance generation.

use std::ops::Range;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::ProblemError;
use crate::models::{GraphMatching, Knapsack, Problem, ProblemKind, Tsp};

/// Parameters for [`generate_random_instance`].
///
/// # Examples
///
/// ```
/// use np_solvers::generate::GeneratorConfig;
///
/// let config = GeneratorConfig::default()
///     .with_seed(42)
///     .with_max_weight(20)
///     .with_edge_probability(0.5);
/// assert_eq!(config.seed, Some(42));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Knapsack weights are drawn from `1..=max_weight`.
    pub max_weight: u64,

    /// Knapsack values are drawn from `1..=max_value`.
    pub max_value: u64,

    /// TSP coordinates are drawn from `[0, max_coord)`.
    pub max_coord: f64,

    /// Probability that a vertex pair becomes a matching edge.
    pub edge_probability: f64,

    /// Matching edge weights are drawn from this range.
    pub weight_range: Range<f64>,

    /// Random seed for reproducibility.
    pub seed: Option<u64>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            max_weight: 50,
            max_value: 100,
            max_coord: 100.0,
            edge_probability: 0.3,
            weight_range: 1.0..100.0,
            seed: None,
        }
    }
}

impl GeneratorConfig {
    pub fn with_max_weight(mut self, w: u64) -> Self {
        self.max_weight = w;
        self
    }

    pub fn with_max_value(mut self, v: u64) -> Self {
        self.max_value = v;
        self
    }

    pub fn with_max_coord(mut self, c: f64) -> Self {
        self.max_coord = c;
        self
    }

    pub fn with_edge_probability(mut self, p: f64) -> Self {
        self.edge_probability = p;
        self
    }

    pub fn with_weight_range(mut self, range: Range<f64>) -> Self {
        self.weight_range = range;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

/// Generates a random instance of the given family.
///
/// `size` is the number of items (knapsack), cities (TSP) or vertices
/// (matching). Fails when the config would produce an instance its
/// constructor rejects: a NaN edge probability, a negative or non-finite
/// weight range, or a non-finite `max_coord`.
///
/// # Examples
///
/// ```
/// use np_solvers::generate::{generate_random_instance, GeneratorConfig};
/// use np_solvers::models::{ProblemKind, ProblemModel};
///
/// let config = GeneratorConfig::default().with_seed(7);
/// let problem = generate_random_instance(ProblemKind::Tsp, 8, &config)?;
/// assert_eq!(problem.size(), 8);
/// # Ok::<(), np_solvers::error::ProblemError>(())
/// ```
pub fn generate_random_instance(
    kind: ProblemKind,
    size: usize,
    config: &GeneratorConfig,
) -> Result<Problem, ProblemError> {
    let mut rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let problem = match kind {
        ProblemKind::Knapsack => {
            Knapsack::random(size, config.max_weight, config.max_value, &mut rng).into()
        }
        ProblemKind::Tsp => Tsp::random(size, config.max_coord, &mut rng)?.into(),
        ProblemKind::Matching => GraphMatching::random(
            size,
            config.edge_probability,
            config.weight_range.clone(),
            &mut rng,
        )?
        .into(),
    };
    Ok(problem)
}
