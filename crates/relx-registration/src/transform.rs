//! The translation transform instantiated by the pair table.

use relx_core::spatial::{Point, Vector};

/// A rigid translation in physical space.
///
/// Maps a fixed-image physical point to the corresponding moving-image
/// physical point. Parameters are the per-axis offsets in physical units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TranslationTransform<const D: usize> {
    offset: Vector<D>,
}

impl<const D: usize> TranslationTransform<D> {
    /// The identity translation.
    pub fn identity() -> Self {
        Self {
            offset: Vector::zeros(),
        }
    }

    /// A translation by the given offset.
    pub fn new(offset: Vector<D>) -> Self {
        Self { offset }
    }

    /// The current offset.
    pub fn offset(&self) -> &Vector<D> {
        &self.offset
    }

    /// The flat parameter vector, one offset per axis.
    pub fn parameters(&self) -> Vec<f64> {
        self.offset.to_vec()
    }

    /// Map a fixed-space point into moving space.
    pub fn transform_point(&self, point: &Point<D>) -> Point<D> {
        *point + self.offset
    }

    /// This translation shifted by an additional delta.
    pub fn translated(&self, delta: Vector<D>) -> Self {
        Self {
            offset: self.offset + delta,
        }
    }
}

impl<const D: usize> Default for TranslationTransform<D> {
    fn default() -> Self {
        Self::identity()
    }
}
