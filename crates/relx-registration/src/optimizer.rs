//! Regular-step gradient descent over translation parameters.

use relx_core::spatial::Vector;

use crate::error::Result;
use crate::metric::{MeanSquares, MetricInputs};
use crate::transform::TranslationTransform;

/// Gradient descent with a self-regulating step length.
///
/// Steps a fixed physical distance along the negative normalized metric
/// gradient. When the gradient direction reverses between iterations the
/// step length is relaxed; the walk stops when the step falls below
/// `min_step_length`, the gradient magnitude vanishes, or the iteration
/// budget runs out.
#[derive(Debug, Clone)]
pub struct RegularStepGradientDescent {
    /// Iteration budget.
    pub max_iterations: usize,
    /// Initial (and largest) step length, in physical units.
    pub max_step_length: f64,
    /// Step length below which the walk is considered converged.
    pub min_step_length: f64,
    /// Step shrink factor applied on gradient reversal.
    pub relaxation_factor: f64,
    /// Gradient magnitude treated as zero.
    pub gradient_magnitude_tolerance: f64,
}

impl Default for RegularStepGradientDescent {
    fn default() -> Self {
        Self {
            max_iterations: 100,
            max_step_length: 1.0,
            min_step_length: 1e-3,
            relaxation_factor: 0.5,
            gradient_magnitude_tolerance: 1e-8,
        }
    }
}

impl RegularStepGradientDescent {
    /// Minimize the metric starting from an initial transform.
    ///
    /// Returns the optimized transform and the last metric value.
    pub fn optimize<const D: usize>(
        &self,
        metric: &MeanSquares,
        inputs: &MetricInputs<'_, D>,
        initial: TranslationTransform<D>,
    ) -> Result<(TranslationTransform<D>, f64)> {
        let mut transform = initial;
        let mut step = self.max_step_length;
        let mut previous_gradient: Option<Vector<D>> = None;
        let mut value = metric.value(inputs, &transform)?;

        for iteration in 0..self.max_iterations {
            let (current, gradient) = metric.value_and_gradient(inputs, &transform)?;
            value = current;

            if iteration % 50 == 0 {
                tracing::info!("Iteration {}: Metric {:.6}", iteration, value);
            }

            let magnitude = gradient.norm();
            if magnitude < self.gradient_magnitude_tolerance {
                break;
            }
            if let Some(previous) = previous_gradient {
                if gradient.inner().dot(previous.inner()) < 0.0 {
                    step *= self.relaxation_factor;
                }
            }
            if step < self.min_step_length {
                break;
            }

            transform = transform.translated(gradient * (-step / magnitude));
            previous_gradient = Some(gradient);
        }

        Ok((transform, value))
    }
}
