//! Resampling the moving image onto the fixed grid.

use rayon::prelude::*;

use relx_core::image::Image;
use relx_core::pixel::Scalar;

use crate::transform::TranslationTransform;
use crate::working::WorkingImage;

/// Resample `moving` through `transform` onto the grid of `reference`.
///
/// Each reference voxel is mapped to physical space, pushed through the
/// transform, and linearly interpolated in the moving image; points
/// outside the moving support receive `default_value`. The result is cast
/// back to the requested pixel kind and carries the reference geometry.
pub fn resample_to_reference<M: Scalar, const D: usize>(
    moving: &WorkingImage<D>,
    reference: &WorkingImage<D>,
    transform: &TranslationTransform<D>,
    default_value: f64,
) -> Image<M, D> {
    let data: Vec<M> = (0..reference.len())
        .into_par_iter()
        .map(|linear| {
            let index = reference.index_of(linear);
            let continuous = index.map(|i| i as f64);
            let point = reference.index_to_physical(continuous);
            let mapped = transform.transform_point(&point);
            let moving_index = moving.physical_to_continuous_index(&mapped);
            let value = moving.sample_linear(moving_index).unwrap_or(default_value);
            M::from_f64(value)
        })
        .collect();

    Image::from_buffer(reference.size(), reference.metadata(), data)
}
