//! Maximum-weight graph matching instance.

use std::collections::{BTreeMap, BTreeSet};
use std::ops::Range;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{ProblemKind, ProblemModel, Solution};
use crate::error::ProblemError;

/// A weighted undirected edge.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// First endpoint.
    pub u: usize,
    /// Second endpoint.
    pub v: usize,
    /// Edge weight.
    pub weight: f64,
}

impl Edge {
    /// Creates an edge.
    pub fn new(u: usize, v: usize, weight: f64) -> Self {
        Self { u, v, weight }
    }
}

impl From<(usize, usize, f64)> for Edge {
    fn from((u, v, weight): (usize, usize, f64)) -> Self {
        Self::new(u, v, weight)
    }
}

/// A weighted undirected graph whose vertex set is the union of the edge
/// endpoints.
///
/// Vertex labels may be sparse; internally each label is mapped to a dense
/// id in `0..num_vertices()` so solvers can track used vertices in a flat
/// array.
///
/// # Examples
///
/// ```
/// use np_solvers::models::{Edge, GraphMatching, ProblemModel, Solution};
///
/// let g = GraphMatching::new(vec![
///     Edge::new(0, 1, 5.0),
///     Edge::new(1, 2, 3.0),
///     Edge::new(2, 3, 4.0),
/// ]).unwrap();
/// assert_eq!(g.num_vertices(), 4);
/// assert_eq!(g.evaluate(&Solution::from_indices(vec![0, 2])), 9.0);
/// // Edges 0 and 1 share vertex 1.
/// assert_eq!(g.evaluate(&Solution::from_indices(vec![0, 1])), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "MatchingData", into = "MatchingData")]
pub struct GraphMatching {
    edges: Vec<Edge>,
    vertices: Vec<usize>,
    endpoints: Vec<(usize, usize)>,
}

#[derive(Serialize, Deserialize)]
struct MatchingData {
    edges: Vec<Edge>,
}

impl GraphMatching {
    /// Creates an instance, rejecting self-loops and negative or
    /// non-finite weights.
    pub fn new(edges: Vec<Edge>) -> Result<Self, ProblemError> {
        for (index, e) in edges.iter().enumerate() {
            if e.u == e.v {
                return Err(ProblemError::SelfLoop { index, vertex: e.u });
            }
            if !e.weight.is_finite() || e.weight < 0.0 {
                return Err(ProblemError::InvalidEdgeWeight {
                    index,
                    weight: e.weight,
                });
            }
        }
        Ok(Self::build(edges))
    }

    /// Draws an Erdős–Rényi graph on `num_vertices` vertices.
    ///
    /// Each unordered pair is included independently with probability
    /// `edge_probability`, clamped to `[0, 1]`; weights are uniform in
    /// `weight_range`, or equal to its start when the range is empty.
    ///
    /// Fails on a NaN probability or a non-finite or negative range.
    pub fn random<R: Rng + ?Sized>(
        num_vertices: usize,
        edge_probability: f64,
        weight_range: Range<f64>,
        rng: &mut R,
    ) -> Result<Self, ProblemError> {
        if edge_probability.is_nan() {
            return Err(ProblemError::InvalidProbability(edge_probability));
        }
        let (start, end) = (weight_range.start, weight_range.end);
        if !start.is_finite() || !end.is_finite() || start < 0.0 || end < 0.0 {
            return Err(ProblemError::InvalidWeightRange { start, end });
        }
        let p = edge_probability.clamp(0.0, 1.0);
        let mut edges = Vec::new();
        for u in 0..num_vertices {
            for v in (u + 1)..num_vertices {
                if rng.random_bool(p) {
                    let weight = if weight_range.is_empty() {
                        weight_range.start
                    } else {
                        rng.random_range(weight_range.clone())
                    };
                    edges.push(Edge::new(u, v, weight));
                }
            }
        }
        Self::new(edges)
    }

    fn build(edges: Vec<Edge>) -> Self {
        let labels: BTreeSet<usize> = edges.iter().flat_map(|e| [e.u, e.v]).collect();
        let dense: BTreeMap<usize, usize> = labels
            .iter()
            .enumerate()
            .map(|(id, &label)| (label, id))
            .collect();
        let endpoints = edges.iter().map(|e| (dense[&e.u], dense[&e.v])).collect();
        Self {
            edges,
            vertices: labels.into_iter().collect(),
            endpoints,
        }
    }

    /// The edges, in input order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Sorted vertex labels.
    pub fn vertices(&self) -> &[usize] {
        &self.vertices
    }

    /// Number of distinct vertices.
    pub fn num_vertices(&self) -> usize {
        self.vertices.len()
    }

    /// Number of edges.
    pub fn num_edges(&self) -> usize {
        self.edges.len()
    }

    /// Dense endpoint ids of edge `index`, each in `0..num_vertices()`.
    pub(crate) fn endpoints(&self, index: usize) -> (usize, usize) {
        self.endpoints[index]
    }

    /// Returns `true` if every index is in range and no vertex is used twice.
    pub fn is_valid_matching(&self, edge_indices: &[usize]) -> bool {
        let mut used = vec![false; self.num_vertices()];
        for &i in edge_indices {
            if i >= self.num_edges() {
                return false;
            }
            let (a, b) = self.endpoints(i);
            if used[a] || used[b] {
                return false;
            }
            used[a] = true;
            used[b] = true;
        }
        true
    }
}

impl ProblemModel for GraphMatching {
    fn kind(&self) -> ProblemKind {
        ProblemKind::Matching
    }

    fn size(&self) -> usize {
        self.num_edges()
    }

    /// Total matched weight, or `0` if the matching is invalid.
    fn evaluate(&self, solution: &Solution) -> f64 {
        if !self.is_valid_matching(solution.indices()) {
            return 0.0;
        }
        solution
            .indices()
            .iter()
            .map(|&i| self.edges[i].weight)
            .sum()
    }

    fn is_valid(&self, solution: &Solution) -> bool {
        self.is_valid_matching(solution.indices())
    }
}

impl TryFrom<MatchingData> for GraphMatching {
    type Error = ProblemError;

    fn try_from(data: MatchingData) -> Result<Self, Self::Error> {
        Self::new(data.edges)
    }
}

impl From<GraphMatching> for MatchingData {
    fn from(g: GraphMatching) -> Self {
        Self { edges: g.edges }
    }
}
