//! The runtime-typed opaque image value.
//!
//! A [`RuntimeImage`] wraps one concretely-typed [`Image`] or
//! [`VectorImage`] behind a shared, type-erased handle. The only things it
//! exposes are its [`TypeDescriptor`] and the ability to be downcast by a
//! callable that the dispatch registry selected for that exact descriptor.
//!
//! Cloning a `RuntimeImage` is shallow: both handles share one underlying
//! object. [`RuntimeImage::make_unique`] deep-copies a shared object so
//! that a value returned from a transient compute context stops aliasing
//! anything that context still holds.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::descriptor::TypeDescriptor;
use crate::image::typed::{Image, VectorImage};
use crate::pixel::Scalar;

/// Object-safe facet implemented by every typed image container.
///
/// This is the seam the dispatch layer sees: descriptor derivation, basic
/// shape queries, deep cloning, and `Any` access for downcasting inside a
/// registered callable.
pub trait ImageObject: Any + Send + Sync {
    /// The descriptor identifying this object's compiled variant.
    fn descriptor(&self) -> TypeDescriptor;

    /// Per-axis pixel counts.
    fn size(&self) -> Vec<usize>;

    /// Components per pixel (1 for scalar kinds).
    fn components_per_pixel(&self) -> u32;

    /// Deep copy into a fresh, unshared object.
    fn clone_object(&self) -> Arc<dyn ImageObject>;

    /// `Any` access for descriptor-directed downcasting.
    fn as_any(&self) -> &dyn Any;
}

impl<P: Scalar, const D: usize> ImageObject for Image<P, D> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::scalar(P::KIND, D as u32)
    }

    fn size(&self) -> Vec<usize> {
        Image::size(self).to_vec()
    }

    fn components_per_pixel(&self) -> u32 {
        1
    }

    fn clone_object(&self) -> Arc<dyn ImageObject> {
        Arc::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

impl<P: Scalar, const D: usize> ImageObject for VectorImage<P, D> {
    fn descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::vector(P::KIND, D as u32)
    }

    fn size(&self) -> Vec<usize> {
        VectorImage::size(self).to_vec()
    }

    fn components_per_pixel(&self) -> u32 {
        VectorImage::components_per_pixel(self)
    }

    fn clone_object(&self) -> Arc<dyn ImageObject> {
        Arc::new(self.clone())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// A runtime-typed image value.
///
/// The descriptor is fixed at construction and derivable without failure;
/// two values with the same descriptor are interchangeable as inputs to
/// the same registered callable.
#[derive(Clone)]
pub struct RuntimeImage {
    object: Arc<dyn ImageObject>,
}

impl RuntimeImage {
    /// Wrap a typed image object.
    pub fn new(object: impl ImageObject) -> Self {
        Self {
            object: Arc::new(object),
        }
    }

    /// The descriptor of the wrapped object. Total; never fails.
    pub fn descriptor(&self) -> TypeDescriptor {
        self.object.descriptor()
    }

    /// The spatial dimension.
    pub fn dimension(&self) -> u32 {
        self.descriptor().dimension()
    }

    /// Per-axis pixel counts.
    pub fn size(&self) -> Vec<usize> {
        self.object.size()
    }

    /// Components per pixel (1 for scalar kinds).
    pub fn components_per_pixel(&self) -> u32 {
        self.object.components_per_pixel()
    }

    /// Whether another handle shares the underlying object.
    pub fn is_shared(&self) -> bool {
        Arc::strong_count(&self.object) > 1
    }

    /// Decouple this handle from every other owner.
    ///
    /// Deep-copies the underlying object when it is shared; a value that
    /// is already sole owner is left untouched. Called at the dispatch
    /// boundary on results whose compute context dies before the caller
    /// is done with them.
    pub fn make_unique(&mut self) {
        if self.is_shared() {
            self.object = self.object.clone_object();
        }
    }

    /// Downcast to a concrete scalar image.
    ///
    /// Returns `None` unless `(P, D)` matches the wrapped variant; the
    /// dispatch registry guarantees the match inside registered callables.
    pub fn typed<P: Scalar, const D: usize>(&self) -> Option<&Image<P, D>> {
        self.object.as_any().downcast_ref()
    }

    /// Downcast to a concrete vector image.
    pub fn typed_vector<P: Scalar, const D: usize>(&self) -> Option<&VectorImage<P, D>> {
        self.object.as_any().downcast_ref()
    }
}

impl fmt::Debug for RuntimeImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeImage")
            .field("descriptor", &self.descriptor().to_string())
            .field("size", &self.size())
            .finish()
    }
}

impl<P: Scalar, const D: usize> From<Image<P, D>> for RuntimeImage {
    fn from(image: Image<P, D>) -> Self {
        Self::new(image)
    }
}

impl<P: Scalar, const D: usize> From<VectorImage<P, D>> for RuntimeImage {
    fn from(image: VectorImage<P, D>) -> Self {
        Self::new(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image::metadata::ImageMetadata;
    use crate::pixel::ScalarKind;

    fn sample_image() -> RuntimeImage {
        let data: Vec<u8> = (0..16).collect();
        RuntimeImage::from(Image::<u8, 2>::from_buffer(
            [4, 4],
            ImageMetadata::default(),
            data,
        ))
    }

    #[test]
    fn test_descriptor_is_structural() {
        let image = sample_image();
        assert_eq!(image.descriptor(), TypeDescriptor::scalar(ScalarKind::UInt8, 2));
        assert_eq!(image.dimension(), 2);
        assert_eq!(image.size(), vec![4, 4]);
        assert_eq!(image.components_per_pixel(), 1);
    }

    #[test]
    fn test_clone_is_shallow_until_make_unique() {
        let original = sample_image();
        let mut copy = original.clone();
        assert!(original.is_shared());
        assert!(copy.is_shared());

        copy.make_unique();
        assert!(!original.is_shared());
        assert!(!copy.is_shared());
        assert_eq!(copy.typed::<u8, 2>().unwrap(), original.typed::<u8, 2>().unwrap());
    }

    #[test]
    fn test_make_unique_on_sole_owner_is_noop() {
        let mut image = sample_image();
        assert!(!image.is_shared());
        image.make_unique();
        assert_eq!(image.size(), vec![4, 4]);
    }

    #[test]
    fn test_downcast_requires_exact_variant() {
        let image = sample_image();
        assert!(image.typed::<u8, 2>().is_some());
        assert!(image.typed::<i8, 2>().is_none());
        assert!(image.typed::<u8, 3>().is_none());
        assert!(image.typed_vector::<u8, 2>().is_none());
    }

    #[test]
    fn test_vector_image_descriptor() {
        let image = RuntimeImage::from(VectorImage::<f32, 3>::new(
            [2, 2, 2],
            3,
            ImageMetadata::default(),
        ));
        assert_eq!(
            image.descriptor(),
            TypeDescriptor::vector(ScalarKind::Float32, 3)
        );
        assert_eq!(image.components_per_pixel(), 3);
    }
}
