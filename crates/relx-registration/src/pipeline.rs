//! The generic two-type-parameter registration pipeline.
//!
//! `run_pair<F, M, D>` is the routine the pair table monomorphizes: one
//! instantiation per registered (fixed kind, moving kind, dimension)
//! point. The typed boundary is thin — downcast the collections, widen
//! the first fixed/moving pair (and masks) to f64 working copies, then
//! run each parameter-map stage and resample. Everything numeric is
//! shared across instantiations through [`WorkingImage`].

use std::path::Path;

use relx_core::image::{Image, RuntimeImage};
use relx_core::pixel::Scalar;

use crate::error::{RegistrationError, Result};
use crate::metric::{MeanSquares, MetricInputs};
use crate::optimizer::RegularStepGradientDescent;
use crate::parameters::ParameterMap;
use crate::resample::resample_to_reference;
use crate::transform::TranslationTransform;
use crate::working::WorkingImage;

/// Validated inputs handed to a registered pair routine.
pub(crate) struct RegistrationInputs<'a> {
    pub fixed: &'a [RuntimeImage],
    pub moving: &'a [RuntimeImage],
    pub fixed_masks: &'a [RuntimeImage],
    pub moving_masks: &'a [RuntimeImage],
    pub parameter_maps: &'a [ParameterMap],
    pub fixed_point_set: Option<&'a Path>,
    pub moving_point_set: Option<&'a Path>,
    pub log_to_console: bool,
}

/// What a pair routine hands back to the driver.
pub(crate) struct RegistrationOutput {
    pub image: RuntimeImage,
    pub transform_parameter_maps: Vec<ParameterMap>,
}

/// Per-stage settings parsed out of a parameter map.
struct StageSettings {
    max_iterations: usize,
    max_step_length: f64,
    min_step_length: f64,
}

fn parse_value<T: std::str::FromStr>(
    map: &ParameterMap,
    key: &str,
    stage: usize,
) -> Result<Option<T>> {
    match map.first(key) {
        None => Ok(None),
        Some(text) => text.parse().map(Some).map_err(|_| {
            RegistrationError::invalid_configuration(format!(
                "stage {stage}: cannot parse {key} value {text:?}"
            ))
        }),
    }
}

fn expect_setting(
    map: &ParameterMap,
    key: &str,
    supported: &[&str],
    stage: usize,
) -> Result<()> {
    let value = map.first(key).unwrap_or(supported[0]);
    if supported.contains(&value) {
        Ok(())
    } else {
        Err(RegistrationError::invalid_configuration(format!(
            "stage {stage}: unsupported {key} {value:?}"
        )))
    }
}

impl StageSettings {
    fn from_map(map: &ParameterMap, stage: usize) -> Result<Self> {
        expect_setting(map, "Transform", &["TranslationTransform"], stage)?;
        expect_setting(map, "Metric", &["AdvancedMeanSquares", "MeanSquares"], stage)?;
        expect_setting(map, "Optimizer", &["RegularStepGradientDescent"], stage)?;

        let max_iterations =
            parse_value(map, "MaximumNumberOfIterations", stage)?.unwrap_or(100usize);
        if max_iterations == 0 {
            return Err(RegistrationError::invalid_configuration(format!(
                "stage {stage}: MaximumNumberOfIterations must be positive"
            )));
        }
        let max_step_length = parse_value(map, "MaximumStepLength", stage)?.unwrap_or(1.0f64);
        if max_step_length <= 0.0 {
            return Err(RegistrationError::invalid_configuration(format!(
                "stage {stage}: MaximumStepLength must be positive"
            )));
        }
        let min_step_length = parse_value(map, "MinimumStepLength", stage)?.unwrap_or(1e-3f64);

        Ok(Self {
            max_iterations,
            max_step_length,
            min_step_length,
        })
    }
}

fn downcast_collection<'a, P: Scalar, const D: usize>(
    images: &'a [RuntimeImage],
    role: &'static str,
) -> Vec<&'a Image<P, D>> {
    images
        .iter()
        .map(|image| {
            image
                .typed::<P, D>()
                .unwrap_or_else(|| unreachable!("pair table key matches the {role} variant"))
        })
        .collect()
}

/// Emit the elastix-style transform parameter map for one finished stage.
fn transform_parameter_map<M: Scalar, const D: usize>(
    fixed: &WorkingImage<D>,
    transform: &TranslationTransform<D>,
) -> ParameterMap {
    let to_strings = |values: &[f64]| -> Vec<String> {
        values.iter().map(|v| format!("{v}")).collect()
    };
    let size: Vec<String> = fixed.size().iter().map(|s| s.to_string()).collect();
    let metadata = fixed.metadata();

    ParameterMap::new()
        .with("Transform", ["TranslationTransform"])
        .with("NumberOfParameters", [D.to_string()])
        .with("TransformParameters", to_strings(&transform.parameters()))
        .with(
            "InitialTransformParametersFileName",
            ["NoInitialTransform"],
        )
        .with("HowToCombineTransforms", ["Compose"])
        .with("FixedImageDimension", [D.to_string()])
        .with("MovingImageDimension", [D.to_string()])
        .with("Size", size)
        .with("Spacing", to_strings(&metadata.spacing().to_vec()))
        .with("Origin", to_strings(&metadata.origin().to_vec()))
        .with("Direction", to_strings(&metadata.direction().to_row_major()))
        .with("ResultImagePixelType", [M::KIND.name()])
}

/// The fully-typed pair routine; one monomorphization per pair-table
/// entry.
pub(crate) fn run_pair<F: Scalar, M: Scalar, const D: usize>(
    inputs: &RegistrationInputs<'_>,
) -> Result<RegistrationOutput> {
    let fixed = downcast_collection::<F, D>(inputs.fixed, "fixed");
    let moving = downcast_collection::<M, D>(inputs.moving, "moving");
    let fixed_masks = downcast_collection::<F, D>(inputs.fixed_masks, "fixed mask");
    let moving_masks = downcast_collection::<M, D>(inputs.moving_masks, "moving mask");

    if let Some(path) = inputs.fixed_point_set {
        tracing::debug!(path = %path.display(), "fixed point set forwarded unread");
    }
    if let Some(path) = inputs.moving_point_set {
        tracing::debug!(path = %path.display(), "moving point set forwarded unread");
    }

    if inputs.parameter_maps.is_empty() {
        // Degenerate run: no stages to execute, the result is an owned
        // copy of the moving image and there are no transform parameters.
        let image = RuntimeImage::from(moving[0].clone());
        return Ok(RegistrationOutput {
            image,
            transform_parameter_maps: Vec::new(),
        });
    }

    let fixed_working = WorkingImage::from_image(fixed[0]);
    let moving_working = WorkingImage::from_image(moving[0]);
    let fixed_mask_working = fixed_masks.first().map(|mask| WorkingImage::from_image(*mask));
    let moving_mask_working = moving_masks.first().map(|mask| WorkingImage::from_image(*mask));
    let metric_inputs = MetricInputs {
        fixed: &fixed_working,
        moving: &moving_working,
        fixed_mask: fixed_mask_working.as_ref(),
        moving_mask: moving_mask_working.as_ref(),
    };

    let metric = MeanSquares;
    let mut transform = TranslationTransform::<D>::identity();
    let mut transform_parameter_maps = Vec::with_capacity(inputs.parameter_maps.len());

    for (stage, map) in inputs.parameter_maps.iter().enumerate() {
        let settings = StageSettings::from_map(map, stage)?;
        if inputs.log_to_console {
            tracing::info!(
                stage,
                iterations = settings.max_iterations,
                "running registration stage"
            );
        }

        let optimizer = RegularStepGradientDescent {
            max_iterations: settings.max_iterations,
            max_step_length: settings.max_step_length,
            min_step_length: settings.min_step_length,
            ..Default::default()
        };
        let (optimized, value) = optimizer.optimize(&metric, &metric_inputs, transform)?;
        transform = optimized;

        if inputs.log_to_console {
            tracing::info!(stage, metric = value, "registration stage finished");
        }
        transform_parameter_maps.push(transform_parameter_map::<M, D>(&fixed_working, &transform));
    }

    let resampled: Image<M, D> =
        resample_to_reference(&moving_working, &fixed_working, &transform, 0.0);
    Ok(RegistrationOutput {
        image: RuntimeImage::from(resampled),
        transform_parameter_maps,
    })
}
