//! Point type for positions in physical space.

use nalgebra::Point as NaPoint;
use serde::{Deserialize, Serialize};

use super::Vector;

/// A position in D-dimensional physical space.
///
/// Used for image origins and for mapping between index and physical
/// coordinates. This is a thin wrapper around nalgebra's `Point` that
/// keeps the domain vocabulary while exposing the inner value for linear
/// algebra.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point<const D: usize>(pub NaPoint<f64, D>);

impl<const D: usize> Point<D> {
    /// Create a point from coordinates.
    pub fn new(coords: [f64; D]) -> Self {
        Self(NaPoint::from(coords))
    }

    /// The origin (all coordinates zero).
    pub fn origin() -> Self {
        Self(NaPoint::origin())
    }

    /// Create a point from a runtime slice.
    ///
    /// The slice length must equal `D`.
    pub fn from_slice(coords: &[f64]) -> Self {
        assert!(coords.len() == D, "coordinate slice length must match dimension");
        let mut point = Self::origin();
        for i in 0..D {
            point.0.coords[i] = coords[i];
        }
        point
    }

    /// Coordinates as a heap vector, axis order preserved.
    pub fn to_vec(&self) -> Vec<f64> {
        (0..D).map(|i| self.0.coords[i]).collect()
    }

    /// The inner nalgebra point.
    pub fn inner(&self) -> &NaPoint<f64, D> {
        &self.0
    }
}

impl<const D: usize> std::ops::Index<usize> for Point<D> {
    type Output = f64;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0.coords[index]
    }
}

impl<const D: usize> std::ops::IndexMut<usize> for Point<D> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.0.coords[index]
    }
}

impl<const D: usize> std::ops::Sub for Point<D> {
    type Output = Vector<D>;

    fn sub(self, other: Self) -> Self::Output {
        Vector(self.0.coords - other.0.coords)
    }
}

impl<const D: usize> std::ops::Add<Vector<D>> for Point<D> {
    type Output = Self;

    fn add(self, vector: Vector<D>) -> Self::Output {
        Self(self.0 + vector.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Point2 = Point<2>;
    type Vector2 = Vector<2>;

    #[test]
    fn test_point_creation_and_indexing() {
        let p = Point2::new([3.0, -1.5]);
        assert_eq!(p[0], 3.0);
        assert_eq!(p[1], -1.5);
        assert_eq!(Point2::origin().to_vec(), vec![0.0, 0.0]);
    }

    #[test]
    fn test_point_from_slice() {
        let p = Point2::from_slice(&[2.0, 4.0]);
        assert_eq!(p, Point2::new([2.0, 4.0]));
    }

    #[test]
    fn test_point_arithmetic() {
        let a = Point2::new([5.0, 5.0]);
        let b = Point2::new([2.0, 3.0]);
        assert_eq!(a - b, Vector2::new([3.0, 2.0]));
        assert_eq!(b + Vector2::new([1.0, 1.0]), Point2::new([3.0, 4.0]));
    }
}
