//! f64 working copies of typed images.
//!
//! The registration pipeline is generic over the fixed and moving pixel
//! kinds only at its boundary: pixels are widened to `f64` once, and the
//! metric, optimizer, and resampler all operate on [`WorkingImage`]. This
//! keeps the per-pair monomorphizations thin while the numeric core is
//! compiled once per dimension.

use relx_core::image::{Image, ImageMetadata};
use relx_core::pixel::Scalar;
use relx_core::spatial::{Direction, Point, Spacing, Vector};

/// An f64 image with precomputed geometry, x-fastest buffer order.
#[derive(Debug, Clone)]
pub struct WorkingImage<const D: usize> {
    data: Vec<f64>,
    size: [usize; D],
    origin: Point<D>,
    spacing: Spacing<D>,
    direction: Direction<D>,
    inverse_direction: Direction<D>,
}

impl<const D: usize> WorkingImage<D> {
    /// Widen a typed image into a working copy.
    pub fn from_image<P: Scalar>(image: &Image<P, D>) -> Self {
        let data = image.data().iter().map(|&p| p.to_f64()).collect();
        let direction = *image.direction();
        let inverse_direction = direction
            .try_inverse()
            .expect("direction matrix must be invertible");
        Self {
            data,
            size: image.size(),
            origin: *image.origin(),
            spacing: *image.spacing(),
            direction,
            inverse_direction,
        }
    }

    /// Per-axis pixel counts.
    pub fn size(&self) -> [usize; D] {
        self.size
    }

    /// Total pixel count.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether the image holds no pixels.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Per-axis physical spacing.
    pub fn spacing(&self) -> &Spacing<D> {
        &self.spacing
    }

    /// Geometry as image metadata, for building result images on this
    /// grid.
    pub fn metadata(&self) -> ImageMetadata<D> {
        ImageMetadata::new(self.origin, self.spacing, self.direction)
    }

    /// Value at a linear buffer offset.
    pub fn value_at(&self, linear: usize) -> f64 {
        self.data[linear]
    }

    /// Pixel index of a linear buffer offset.
    pub fn index_of(&self, mut linear: usize) -> [usize; D] {
        let mut index = [0usize; D];
        for axis in 0..D {
            index[axis] = linear % self.size[axis];
            linear /= self.size[axis];
        }
        index
    }

    /// Map a continuous index to a physical point.
    pub fn index_to_physical(&self, index: [f64; D]) -> Point<D> {
        let mut scaled = Vector::<D>::zeros();
        for axis in 0..D {
            scaled[axis] = index[axis] * self.spacing[axis];
        }
        self.origin + self.direction * scaled
    }

    /// Map a physical point to a continuous index.
    pub fn physical_to_continuous_index(&self, point: &Point<D>) -> [f64; D] {
        let rotated = self.inverse_direction * (*point - self.origin);
        let mut index = [0.0; D];
        for axis in 0..D {
            index[axis] = rotated[axis] / self.spacing[axis];
        }
        index
    }

    /// Linearly interpolate at a continuous index.
    ///
    /// Returns `None` outside the image support (any axis below 0 or
    /// above `size - 1`).
    pub fn sample_linear(&self, index: [f64; D]) -> Option<f64> {
        let mut base = [0usize; D];
        let mut frac = [0.0; D];
        for axis in 0..D {
            let x = index[axis];
            let upper = (self.size[axis] - 1) as f64;
            if !(0.0..=upper).contains(&x) {
                return None;
            }
            let floor = x.floor();
            base[axis] = floor as usize;
            frac[axis] = x - floor;
        }

        let mut value = 0.0;
        for corner in 0..(1usize << D) {
            let mut weight = 1.0;
            let mut linear = 0;
            for axis in (0..D).rev() {
                let high = corner & (1 << axis) != 0;
                // A zero-weight corner may fall on the border; clamp its
                // index so the read stays in bounds.
                let coordinate = if high {
                    weight *= frac[axis];
                    (base[axis] + 1).min(self.size[axis] - 1)
                } else {
                    weight *= 1.0 - frac[axis];
                    base[axis]
                };
                linear = linear * self.size[axis] + coordinate;
            }
            if weight > 0.0 {
                value += weight * self.data[linear];
            }
        }
        Some(value)
    }

    /// Nearest-neighbor sample at a continuous index.
    ///
    /// Returns `None` outside the image support.
    pub fn sample_nearest(&self, index: [f64; D]) -> Option<f64> {
        let mut linear = 0;
        for axis in (0..D).rev() {
            let rounded = index[axis].round();
            if rounded < 0.0 || rounded > (self.size[axis] - 1) as f64 {
                return None;
            }
            linear = linear * self.size[axis] + rounded as usize;
        }
        Some(self.data[linear])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp_image() -> WorkingImage<2> {
        // 3x2, values 0..6, x-fastest.
        let data: Vec<f32> = (0..6).map(|v| v as f32).collect();
        let typed = Image::<f32, 2>::from_buffer([3, 2], ImageMetadata::default(), data);
        WorkingImage::from_image(&typed)
    }

    #[test]
    fn test_widening_preserves_values_and_order() {
        let image = ramp_image();
        assert_eq!(image.size(), [3, 2]);
        assert_eq!(image.value_at(0), 0.0);
        assert_eq!(image.value_at(5), 5.0);
        assert_eq!(image.index_of(4), [1, 1]);
    }

    #[test]
    fn test_sample_at_grid_points_is_exact() {
        let image = ramp_image();
        assert_eq!(image.sample_linear([0.0, 0.0]), Some(0.0));
        assert_eq!(image.sample_linear([2.0, 1.0]), Some(5.0));
        assert_eq!(image.sample_nearest([1.2, 0.8]), Some(4.0));
    }

    #[test]
    fn test_sample_interpolates_between_grid_points() {
        let image = ramp_image();
        // Halfway along x between values 0 and 1.
        assert_eq!(image.sample_linear([0.5, 0.0]), Some(0.5));
        // Halfway along y between values 1 and 4.
        assert_eq!(image.sample_linear([1.0, 0.5]), Some(2.5));
    }

    #[test]
    fn test_sample_outside_support_is_none() {
        let image = ramp_image();
        assert_eq!(image.sample_linear([-0.1, 0.0]), None);
        assert_eq!(image.sample_linear([0.0, 1.1]), None);
        assert_eq!(image.sample_nearest([0.0, -0.6]), None);
    }

    #[test]
    fn test_physical_mapping_round_trip() {
        let typed = Image::<u8, 2>::from_buffer(
            [4, 4],
            ImageMetadata::new(
                Point::new([5.0, -1.0]),
                Spacing::new([2.0, 0.5]),
                Direction::identity(),
            ),
            vec![0; 16],
        );
        let image = WorkingImage::from_image(&typed);
        let point = image.index_to_physical([1.0, 2.0]);
        assert_eq!(point, Point::new([7.0, 0.0]));
        let back = image.physical_to_continuous_index(&point);
        assert!((back[0] - 1.0).abs() < 1e-12);
        assert!((back[1] - 2.0).abs() < 1e-12);
    }
}
