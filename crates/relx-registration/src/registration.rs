//! The runtime-typed registration driver.
//!
//! [`Registration`] accepts fixed/moving image and mask collections whose
//! pixel kinds are known only at runtime, derives their type descriptors,
//! and dispatches into the compiled variant registered for that exact
//! descriptor pair. The driver owns the run's ancillary settings —
//! point-set file names (opaque here), output directory, log flags, and
//! the parameter object — and stores the last result for inspection.

use std::path::PathBuf;

use relx_core::RuntimeImage;

use crate::error::Result;
use crate::parameters::{ParameterMap, ParameterObject};
use crate::pipeline::RegistrationInputs;
use crate::registry;
use crate::validation;

/// Pairwise registration of runtime-typed images.
///
/// # Examples
/// ```rust
/// use relx_io::import_as_u8;
/// use relx_registration::Registration;
///
/// let pixels: Vec<u8> = (0..16).collect();
/// let image = import_as_u8(&pixels, &[4, 4]).unwrap();
///
/// let mut registration = Registration::new();
/// registration
///     .set_fixed_image(image.clone())
///     .set_moving_image(image);
/// // No parameter maps: a degenerate run that copies the moving image.
/// let result = registration.execute().unwrap();
/// assert!(registration.transform_parameter_maps().is_empty());
/// assert_eq!(result.size(), vec![4, 4]);
/// ```
#[derive(Debug, Default)]
pub struct Registration {
    fixed_images: Vec<RuntimeImage>,
    moving_images: Vec<RuntimeImage>,
    fixed_masks: Vec<RuntimeImage>,
    moving_masks: Vec<RuntimeImage>,
    fixed_point_set: Option<PathBuf>,
    moving_point_set: Option<PathBuf>,
    output_directory: Option<PathBuf>,
    log_file_name: Option<PathBuf>,
    log_to_console: bool,
    log_to_file: bool,
    parameters: ParameterObject,
    result_image: Option<RuntimeImage>,
    transform_parameter_maps: Vec<ParameterMap>,
}

impl Registration {
    /// Create a driver with empty collections and default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the fixed collection with a single image.
    pub fn set_fixed_image(&mut self, image: RuntimeImage) -> &mut Self {
        self.fixed_images = vec![image];
        self
    }

    /// Append a fixed image.
    pub fn add_fixed_image(&mut self, image: RuntimeImage) -> &mut Self {
        self.fixed_images.push(image);
        self
    }

    /// The fixed collection.
    pub fn fixed_images(&self) -> &[RuntimeImage] {
        &self.fixed_images
    }

    /// Replace the moving collection with a single image.
    pub fn set_moving_image(&mut self, image: RuntimeImage) -> &mut Self {
        self.moving_images = vec![image];
        self
    }

    /// Append a moving image.
    pub fn add_moving_image(&mut self, image: RuntimeImage) -> &mut Self {
        self.moving_images.push(image);
        self
    }

    /// The moving collection.
    pub fn moving_images(&self) -> &[RuntimeImage] {
        &self.moving_images
    }

    /// Replace the fixed mask collection with a single mask.
    pub fn set_fixed_mask(&mut self, mask: RuntimeImage) -> &mut Self {
        self.fixed_masks = vec![mask];
        self
    }

    /// Append a fixed mask.
    pub fn add_fixed_mask(&mut self, mask: RuntimeImage) -> &mut Self {
        self.fixed_masks.push(mask);
        self
    }

    /// Replace the moving mask collection with a single mask.
    pub fn set_moving_mask(&mut self, mask: RuntimeImage) -> &mut Self {
        self.moving_masks = vec![mask];
        self
    }

    /// Append a moving mask.
    pub fn add_moving_mask(&mut self, mask: RuntimeImage) -> &mut Self {
        self.moving_masks.push(mask);
        self
    }

    /// Fixed point-set file name; forwarded to the pipeline unread.
    pub fn set_fixed_point_set_file_name(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.fixed_point_set = Some(path.into());
        self
    }

    /// Moving point-set file name; forwarded to the pipeline unread.
    pub fn set_moving_point_set_file_name(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.moving_point_set = Some(path.into());
        self
    }

    /// Directory for run artifacts such as the log file.
    pub fn set_output_directory(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.output_directory = Some(path.into());
        self
    }

    /// File name of the run summary written when logging to file.
    pub fn set_log_file_name(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.log_file_name = Some(path.into());
        self
    }

    /// Emit per-stage progress events.
    pub fn set_log_to_console(&mut self, enabled: bool) -> &mut Self {
        self.log_to_console = enabled;
        self
    }

    /// Write a run summary file after execution.
    pub fn set_log_to_file(&mut self, enabled: bool) -> &mut Self {
        self.log_to_file = enabled;
        self
    }

    /// Replace the parameter object.
    pub fn set_parameter_object(&mut self, parameters: ParameterObject) -> &mut Self {
        self.parameters = parameters;
        self
    }

    /// Replace the parameter object with a single stage map.
    pub fn set_parameter_map(&mut self, map: ParameterMap) -> &mut Self {
        self.parameters = ParameterObject::from_maps(vec![map]);
        self
    }

    /// Append a stage map.
    pub fn add_parameter_map(&mut self, map: ParameterMap) -> &mut Self {
        self.parameters.add_map(map);
        self
    }

    /// The configured parameter object.
    pub fn parameter_object(&self) -> &ParameterObject {
        &self.parameters
    }

    /// Validate the inputs, resolve the descriptor pair, and run the
    /// compiled registration variant.
    ///
    /// The returned image is decoupled from the driver's stored copy: it
    /// stays valid and unchanged however the driver is reused afterwards.
    pub fn execute(&mut self) -> Result<RuntimeImage> {
        let (fixed_descriptor, moving_descriptor) = validation::validate_inputs(
            &self.fixed_images,
            &self.moving_images,
            &self.fixed_masks,
            &self.moving_masks,
        )?;
        tracing::debug!(%fixed_descriptor, %moving_descriptor, "resolving registration variant");
        let callable = registry::lookup(&fixed_descriptor, &moving_descriptor)?;

        let inputs = RegistrationInputs {
            fixed: &self.fixed_images,
            moving: &self.moving_images,
            fixed_masks: &self.fixed_masks,
            moving_masks: &self.moving_masks,
            parameter_maps: self.parameters.maps(),
            fixed_point_set: self.fixed_point_set.as_deref(),
            moving_point_set: self.moving_point_set.as_deref(),
            log_to_console: self.log_to_console,
        };
        let output = callable(&inputs)?;

        self.transform_parameter_maps = output.transform_parameter_maps;
        self.result_image = Some(output.image.clone());

        if self.log_to_file {
            if let Err(error) = self.write_run_summary(&fixed_descriptor, &moving_descriptor) {
                tracing::warn!(%error, "could not write the registration log file");
            }
        }

        // Deep-copy before returning: the stored handle shares the
        // pipeline's result, and the caller's copy must not alias state
        // that the next execute() will replace.
        let mut result = output.image;
        result.make_unique();
        Ok(result)
    }

    /// The stored result of the last run.
    pub fn result_image(&self) -> Option<&RuntimeImage> {
        self.result_image.as_ref()
    }

    /// One resolved transform parameter map per executed stage.
    pub fn transform_parameter_maps(&self) -> &[ParameterMap] {
        &self.transform_parameter_maps
    }

    fn log_file_path(&self) -> PathBuf {
        let file_name = self
            .log_file_name
            .clone()
            .unwrap_or_else(|| PathBuf::from("registration.log"));
        match &self.output_directory {
            Some(directory) => directory.join(file_name),
            None => file_name,
        }
    }

    fn write_run_summary(
        &self,
        fixed: &relx_core::TypeDescriptor,
        moving: &relx_core::TypeDescriptor,
    ) -> std::io::Result<()> {
        let mut contents = String::new();
        contents.push_str(&format!("fixed: {fixed}\n"));
        contents.push_str(&format!("moving: {moving}\n"));
        contents.push_str(&format!("stages: {}\n", self.transform_parameter_maps.len()));
        for (stage, map) in self.transform_parameter_maps.iter().enumerate() {
            let parameters = map
                .get("TransformParameters")
                .map(|values| values.join(" "))
                .unwrap_or_default();
            contents.push_str(&format!("stage {stage}: TransformParameters = {parameters}\n"));
        }
        std::fs::write(self.log_file_path(), contents)
    }
}

/// Convenience entry point mirroring the driver defaults: one fixed
/// image, one moving image, one parameter map.
pub fn register(
    fixed: RuntimeImage,
    moving: RuntimeImage,
    parameter_map: ParameterMap,
) -> Result<RuntimeImage> {
    let mut registration = Registration::new();
    registration
        .set_fixed_image(fixed)
        .set_moving_image(moving)
        .set_parameter_map(parameter_map);
    registration.execute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use relx_core::image::{Image, ImageMetadata};
    use relx_core::{DispatchError, ScalarKind, TypeDescriptor};
    use crate::error::RegistrationError;

    fn image_u8_2d(values: &[u8]) -> RuntimeImage {
        RuntimeImage::from(Image::<u8, 2>::from_buffer(
            [2, 2],
            ImageMetadata::default(),
            values.to_vec(),
        ))
    }

    #[test]
    fn test_degenerate_execute_copies_the_moving_image() {
        let fixed = image_u8_2d(&[0, 1, 2, 3]);
        let moving = image_u8_2d(&[4, 5, 6, 7]);
        let mut registration = Registration::new();
        registration.set_fixed_image(fixed).set_moving_image(moving);

        let result = registration.execute().unwrap();
        assert_eq!(result.descriptor(), TypeDescriptor::scalar(ScalarKind::UInt8, 2));
        assert_eq!(result.typed::<u8, 2>().unwrap().data(), &[4, 5, 6, 7]);
        assert!(registration.transform_parameter_maps().is_empty());
    }

    #[test]
    fn test_result_is_decoupled_from_the_driver() {
        let image = image_u8_2d(&[1, 1, 1, 1]);
        let mut registration = Registration::new();
        registration
            .set_fixed_image(image.clone())
            .set_moving_image(image);

        let result = registration.execute().unwrap();
        assert!(!result.is_shared());
        assert!(registration.result_image().is_some());
    }

    #[test]
    fn test_missing_inputs_fail_before_dispatch() {
        let mut registration = Registration::new();
        let err = registration.execute().unwrap_err();
        assert!(matches!(err, RegistrationError::MissingFixedImages));
    }

    #[test]
    fn test_heterogeneous_fixed_collection_fails_before_dispatch() {
        let mut registration = Registration::new();
        registration
            .add_fixed_image(image_u8_2d(&[0; 4]))
            .add_fixed_image(RuntimeImage::from(Image::<f32, 2>::new(
                [2, 2],
                ImageMetadata::default(),
            )))
            .set_moving_image(image_u8_2d(&[0; 4]));

        let err = registration.execute().unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Dispatch(DispatchError::HeterogeneousCollection {
                collection: "fixed",
                ..
            })
        ));
    }
}
