//! Dense distance matrix.

/// A dense n×n distance matrix stored in row-major order.
///
/// # Examples
///
/// ```
/// use np_solvers::distance::DistanceMatrix;
///
/// let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (3.0, 4.0), (6.0, 8.0)]);
/// assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
/// assert_eq!(dm.size(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceMatrix {
    data: Vec<f64>,
    size: usize,
}

impl DistanceMatrix {
    /// Creates a distance matrix of the given size, initialized to zero.
    pub fn new(size: usize) -> Self {
        Self {
            data: vec![0.0; size * size],
            size,
        }
    }

    /// Computes the symmetric Euclidean distance matrix of 2-D points.
    ///
    /// The diagonal is zero.
    pub fn from_points(points: &[(f64, f64)]) -> Self {
        let n = points.len();
        let mut dm = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
                let d = (dx * dx + dy * dy).sqrt();
                dm.set(i, j, d);
                dm.set(j, i, d);
            }
        }
        dm
    }

    /// Returns the distance from location `from` to location `to`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.data[from * self.size + to]
    }

    /// Sets the distance from location `from` to location `to`.
    pub fn set(&mut self, from: usize, to: usize, distance: f64) {
        self.data[from * self.size + to] = distance;
    }

    /// Number of locations in this matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Returns `true` if the matrix is symmetric within the given tolerance.
    pub fn is_symmetric(&self, tol: f64) -> bool {
        for i in 0..self.size {
            for j in (i + 1)..self.size {
                if (self.get(i, j) - self.get(j, i)).abs() > tol {
                    return false;
                }
            }
        }
        true
    }

    /// Returns the nearest of `candidates` to `from`.
    ///
    /// Equal distances resolve to the lowest index. Returns `None` if
    /// `candidates` is empty.
    pub fn nearest_neighbor(&self, from: usize, candidates: &[usize]) -> Option<usize> {
        candidates
            .iter()
            .copied()
            .min_by(|&a, &b| {
                self.get(from, a)
                    .total_cmp(&self.get(from, b))
                    .then(a.cmp(&b))
            })
    }

    /// Length of the cheapest edge leaving `city`, or `0.0` for a
    /// single-location matrix.
    pub fn min_outgoing(&self, city: usize) -> f64 {
        (0..self.size)
            .filter(|&j| j != city)
            .map(|j| self.get(city, j))
            .min_by(f64::total_cmp)
            .unwrap_or(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_points() -> Vec<(f64, f64)> {
        vec![(0.0, 0.0), (3.0, 4.0), (0.0, 8.0)]
    }

    #[test]
    fn test_from_points() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert_eq!(dm.size(), 3);
        assert!((dm.get(0, 1) - 5.0).abs() < 1e-10);
        assert!((dm.get(0, 2) - 8.0).abs() < 1e-10);
        assert!((dm.get(1, 1)).abs() < 1e-10);
    }

    #[test]
    fn test_symmetric() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert!(dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_asymmetric_matrix() {
        let mut dm = DistanceMatrix::new(2);
        dm.set(0, 1, 10.0);
        dm.set(1, 0, 15.0);
        assert!(!dm.is_symmetric(1e-10));
    }

    #[test]
    fn test_nearest_neighbor() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert_eq!(dm.nearest_neighbor(0, &[1, 2]), Some(1));
        assert_eq!(dm.nearest_neighbor(0, &[2]), Some(2));
        assert_eq!(dm.nearest_neighbor(0, &[]), None);
    }

    #[test]
    fn test_nearest_neighbor_tie_prefers_lower_index() {
        let dm = DistanceMatrix::from_points(&[(0.0, 0.0), (1.0, 0.0), (-1.0, 0.0)]);
        assert_eq!(dm.nearest_neighbor(0, &[2, 1]), Some(1));
    }

    #[test]
    fn test_min_outgoing() {
        let dm = DistanceMatrix::from_points(&sample_points());
        assert!((dm.min_outgoing(0) - 5.0).abs() < 1e-10);
        assert!((dm.min_outgoing(2) - 5.0).abs() < 1e-10);
        assert_eq!(DistanceMatrix::new(1).min_outgoing(0), 0.0);
    }
}
