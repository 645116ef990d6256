//! Physical-space metadata shared by all image containers.

use crate::spatial::{Direction, Point, Spacing};

/// How image indices map to physical coordinates.
///
/// Combines the origin (physical position of index zero), per-axis
/// spacing, and the axis orientation matrix. Defaults to zero origin,
/// unit spacing, and identity orientation.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageMetadata<const D: usize> {
    origin: Point<D>,
    spacing: Spacing<D>,
    direction: Direction<D>,
}

impl<const D: usize> ImageMetadata<D> {
    /// Create metadata from its three components.
    pub fn new(origin: Point<D>, spacing: Spacing<D>, direction: Direction<D>) -> Self {
        Self {
            origin,
            spacing,
            direction,
        }
    }

    /// Physical coordinate of the first pixel.
    pub fn origin(&self) -> &Point<D> {
        &self.origin
    }

    /// Physical distance between adjacent pixels, per axis.
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Orientation of the image axes.
    pub fn direction(&self) -> &Direction<D> {
        &self.direction
    }
}

impl<const D: usize> Default for ImageMetadata<D> {
    fn default() -> Self {
        Self {
            origin: Point::origin(),
            spacing: Spacing::uniform(1.0),
            direction: Direction::identity(),
        }
    }
}
