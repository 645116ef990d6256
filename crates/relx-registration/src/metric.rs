//! Mean-squares similarity metric.

use relx_core::spatial::Vector;

use crate::error::{RegistrationError, Result};
use crate::transform::TranslationTransform;
use crate::working::WorkingImage;

/// Mean squared intensity difference.
///
/// `MSD = (1/N) * sum((Fixed(x) - Moving(T(x)))^2)` over the fixed-image
/// grid, restricted to points where both images (and both masks, when
/// present) are defined. Masks participate at half intensity or above.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeanSquares;

/// Everything a metric evaluation samples against.
pub struct MetricInputs<'a, const D: usize> {
    /// The fixed (reference) image.
    pub fixed: &'a WorkingImage<D>,
    /// The moving image.
    pub moving: &'a WorkingImage<D>,
    /// Optional fixed-domain mask.
    pub fixed_mask: Option<&'a WorkingImage<D>>,
    /// Optional moving-domain mask.
    pub moving_mask: Option<&'a WorkingImage<D>>,
}

impl MeanSquares {
    /// Evaluate the metric under a transform.
    ///
    /// Fails when the transformed fixed grid does not overlap the moving
    /// image at all.
    pub fn value<const D: usize>(
        &self,
        inputs: &MetricInputs<'_, D>,
        transform: &TranslationTransform<D>,
    ) -> Result<f64> {
        let mut sum = 0.0;
        let mut count = 0usize;

        for linear in 0..inputs.fixed.len() {
            let index = inputs.fixed.index_of(linear);
            let continuous = index.map(|i| i as f64);
            let point = inputs.fixed.index_to_physical(continuous);

            if let Some(mask) = inputs.fixed_mask {
                let mask_index = mask.physical_to_continuous_index(&point);
                match mask.sample_nearest(mask_index) {
                    Some(value) if value >= 0.5 => {}
                    _ => continue,
                }
            }

            let mapped = transform.transform_point(&point);

            if let Some(mask) = inputs.moving_mask {
                let mask_index = mask.physical_to_continuous_index(&mapped);
                match mask.sample_nearest(mask_index) {
                    Some(value) if value >= 0.5 => {}
                    _ => continue,
                }
            }

            let moving_index = inputs.moving.physical_to_continuous_index(&mapped);
            let Some(moving_value) = inputs.moving.sample_linear(moving_index) else {
                continue;
            };

            let diff = inputs.fixed.value_at(linear) - moving_value;
            sum += diff * diff;
            count += 1;
        }

        if count == 0 {
            return Err(RegistrationError::metric(
                "no overlapping samples between the fixed and moving images",
            ));
        }
        Ok(sum / count as f64)
    }

    /// Evaluate the metric and its gradient with respect to the
    /// translation parameters, by central differences.
    pub fn value_and_gradient<const D: usize>(
        &self,
        inputs: &MetricInputs<'_, D>,
        transform: &TranslationTransform<D>,
    ) -> Result<(f64, Vector<D>)> {
        let value = self.value(inputs, transform)?;

        let step = 0.5 * inputs.moving.spacing().min_spacing();
        let mut gradient = Vector::<D>::zeros();
        for axis in 0..D {
            let mut delta = Vector::<D>::zeros();
            delta[axis] = step;
            let forward = self.value(inputs, &transform.translated(delta))?;
            let backward = self.value(inputs, &transform.translated(-delta))?;
            gradient[axis] = (forward - backward) / (2.0 * step);
        }
        Ok((value, gradient))
    }
}
