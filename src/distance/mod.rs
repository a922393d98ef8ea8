//! Distance matrices.
//!
//! Provides the dense distance matrix cached by TSP instances.

mod matrix;

pub use matrix::DistanceMatrix;
