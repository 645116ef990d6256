//! Direction matrices describing image axis orientation.

use nalgebra::SMatrix;
use serde::{Deserialize, Serialize};

use super::Vector;

/// Orientation of image axes in physical space.
///
/// A D×D cosine matrix; column `i` is the physical direction of the i-th
/// image axis. Must be invertible for the physical-to-index mapping to
/// exist, which is validated wherever a direction enters from external
/// input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Direction<const D: usize>(pub SMatrix<f64, D, D>);

impl<const D: usize> Direction<D> {
    /// The identity orientation (axes aligned with physical axes).
    pub fn identity() -> Self {
        Self(SMatrix::identity())
    }

    /// Build a direction matrix from a flattened row-major slice.
    ///
    /// The slice length must equal `D * D`.
    pub fn from_row_major(entries: &[f64]) -> Self {
        assert!(entries.len() == D * D, "direction slice length must be D * D");
        let mut matrix = SMatrix::<f64, D, D>::zeros();
        for r in 0..D {
            for c in 0..D {
                matrix[(r, c)] = entries[r * D + c];
            }
        }
        Self(matrix)
    }

    /// Flatten to a row-major vector, the inverse of [`from_row_major`].
    ///
    /// [`from_row_major`]: Direction::from_row_major
    pub fn to_row_major(&self) -> Vec<f64> {
        let mut entries = Vec::with_capacity(D * D);
        for r in 0..D {
            for c in 0..D {
                entries.push(self.0[(r, c)]);
            }
        }
        entries
    }

    /// The inverse orientation, if the matrix is invertible.
    pub fn try_inverse(&self) -> Option<Self> {
        self.0.try_inverse().map(Self)
    }

    /// The inner nalgebra matrix.
    pub fn inner(&self) -> &SMatrix<f64, D, D> {
        &self.0
    }
}

impl<const D: usize> std::ops::Index<(usize, usize)> for Direction<D> {
    type Output = f64;

    fn index(&self, index: (usize, usize)) -> &Self::Output {
        &self.0[index]
    }
}

impl<const D: usize> std::ops::Mul<Vector<D>> for Direction<D> {
    type Output = Vector<D>;

    fn mul(self, vector: Vector<D>) -> Self::Output {
        Vector(self.0 * vector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Direction2 = Direction<2>;

    #[test]
    fn test_identity() {
        let d = Direction2::identity();
        assert_eq!(d[(0, 0)], 1.0);
        assert_eq!(d[(0, 1)], 0.0);
    }

    #[test]
    fn test_row_major_round_trip() {
        let entries = [0.0, -1.0, 1.0, 0.0];
        let d = Direction2::from_row_major(&entries);
        assert_eq!(d.to_row_major(), entries.to_vec());
        assert_eq!(d[(0, 1)], -1.0);
        assert_eq!(d[(1, 0)], 1.0);
    }

    #[test]
    fn test_try_inverse() {
        let rotation = Direction2::from_row_major(&[0.0, -1.0, 1.0, 0.0]);
        let inverse = rotation.try_inverse().unwrap();
        assert_eq!(inverse.to_row_major(), vec![0.0, 1.0, -1.0, 0.0]);

        let singular = Direction2::from_row_major(&[1.0, 1.0, 1.0, 1.0]);
        assert!(singular.try_inverse().is_none());
    }

    #[test]
    fn test_direction_applies_to_vectors() {
        let rotation = Direction2::from_row_major(&[0.0, -1.0, 1.0, 0.0]);
        let rotated = rotation * Vector::new([1.0, 0.0]);
        assert!((rotated[0] - 0.0).abs() < 1e-12);
        assert!((rotated[1] - 1.0).abs() < 1e-12);
    }
}
