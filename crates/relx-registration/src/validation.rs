//! Input validation for the registration driver.
//!
//! Everything here runs before any registry lookup: collection
//! homogeneity, mask/image descriptor agreement, and the fixed/moving
//! dimension check. A dimension mismatch is its own failure, never folded
//! into an unsupported-pair miss.

use relx_core::{DispatchError, RuntimeImage, TypeDescriptor};

use crate::error::{RegistrationError, Result};

/// The shared descriptor of a collection, or `None` when it is empty.
///
/// Fails on the first element whose descriptor differs from the first
/// image's; `collection` names the offending collection in the error.
pub fn homogeneous_descriptor(
    collection: &'static str,
    images: &[RuntimeImage],
) -> std::result::Result<Option<TypeDescriptor>, DispatchError> {
    let Some(first) = images.first() else {
        return Ok(None);
    };
    let expected = first.descriptor();
    for (index, image) in images.iter().enumerate().skip(1) {
        let found = image.descriptor();
        if found != expected {
            return Err(DispatchError::HeterogeneousCollection {
                collection,
                index,
                expected,
                found,
            });
        }
    }
    Ok(Some(expected))
}

/// Check that every mask matches its image collection's descriptor.
fn validate_masks(
    collection: &'static str,
    masks: &[RuntimeImage],
    expected: TypeDescriptor,
) -> std::result::Result<(), DispatchError> {
    for (index, mask) in masks.iter().enumerate() {
        let found = mask.descriptor();
        if found != expected {
            return Err(DispatchError::HeterogeneousCollection {
                collection,
                index,
                expected,
                found,
            });
        }
    }
    Ok(())
}

/// Validate all driver inputs and derive the (fixed, moving) descriptor
/// pair for dispatch.
pub fn validate_inputs(
    fixed: &[RuntimeImage],
    moving: &[RuntimeImage],
    fixed_masks: &[RuntimeImage],
    moving_masks: &[RuntimeImage],
) -> Result<(TypeDescriptor, TypeDescriptor)> {
    let fixed_descriptor =
        homogeneous_descriptor("fixed", fixed)?.ok_or(RegistrationError::MissingFixedImages)?;
    let moving_descriptor =
        homogeneous_descriptor("moving", moving)?.ok_or(RegistrationError::MissingMovingImages)?;

    validate_masks("fixed mask", fixed_masks, fixed_descriptor)?;
    validate_masks("moving mask", moving_masks, moving_descriptor)?;

    if fixed_descriptor.dimension() != moving_descriptor.dimension() {
        return Err(DispatchError::IncompatibleDimension {
            fixed: fixed_descriptor.dimension(),
            moving: moving_descriptor.dimension(),
        }
        .into());
    }

    Ok((fixed_descriptor, moving_descriptor))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relx_core::image::{Image, ImageMetadata};
    use relx_core::ScalarKind;

    fn image_u8_2d() -> RuntimeImage {
        RuntimeImage::from(Image::<u8, 2>::new([2, 2], ImageMetadata::default()))
    }

    fn image_f32_2d() -> RuntimeImage {
        RuntimeImage::from(Image::<f32, 2>::new([2, 2], ImageMetadata::default()))
    }

    fn image_u8_3d() -> RuntimeImage {
        RuntimeImage::from(Image::<u8, 3>::new([2, 2, 2], ImageMetadata::default()))
    }

    #[test]
    fn test_empty_collection_has_no_descriptor() {
        assert_eq!(homogeneous_descriptor("fixed", &[]).unwrap(), None);
    }

    #[test]
    fn test_homogeneous_collection_is_accepted() {
        let images = [image_u8_2d(), image_u8_2d()];
        let descriptor = homogeneous_descriptor("fixed", &images).unwrap().unwrap();
        assert_eq!(descriptor, TypeDescriptor::scalar(ScalarKind::UInt8, 2));
    }

    #[test]
    fn test_mixed_collection_is_rejected() {
        let images = [image_u8_2d(), image_f32_2d()];
        let err = homogeneous_descriptor("fixed", &images).unwrap_err();
        assert!(matches!(
            err,
            DispatchError::HeterogeneousCollection {
                collection: "fixed",
                index: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_mask_descriptor_must_match_images() {
        let err = validate_inputs(
            &[image_u8_2d()],
            &[image_u8_2d()],
            &[image_f32_2d()],
            &[],
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Dispatch(DispatchError::HeterogeneousCollection {
                collection: "fixed mask",
                ..
            })
        ));
    }

    #[test]
    fn test_dimension_mismatch_is_distinct() {
        let err = validate_inputs(&[image_u8_2d()], &[image_u8_3d()], &[], &[]).unwrap_err();
        assert!(matches!(
            err,
            RegistrationError::Dispatch(DispatchError::IncompatibleDimension {
                fixed: 2,
                moving: 3
            })
        ));
    }

    #[test]
    fn test_missing_collections_are_reported() {
        let err = validate_inputs(&[], &[image_u8_2d()], &[], &[]).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingFixedImages));

        let err = validate_inputs(&[image_u8_2d()], &[], &[], &[]).unwrap_err();
        assert!(matches!(err, RegistrationError::MissingMovingImages));
    }
}
