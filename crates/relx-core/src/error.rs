//! Error types for the dispatch layer.
//!
//! Every failure mode of descriptor resolution and registry lookup is a
//! distinct, named variant. Dispatch never coerces to a "closest" type and
//! never downgrades a miss to a default; either the exact descriptor (or
//! pair) resolves to exactly one callable, or the call fails here before
//! any numeric work begins.

use thiserror::Error;

use crate::descriptor::TypeDescriptor;

/// Failures raised by the dispatch registries and input validation.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// No compiled variant is registered for this descriptor.
    #[error("no {registry} variant is registered for pixel type {descriptor}")]
    UnsupportedType {
        /// Name of the registry that was probed.
        registry: &'static str,
        /// The offending descriptor.
        descriptor: TypeDescriptor,
    },

    /// No compiled variant is registered for this descriptor pair.
    #[error("no {registry} variant is registered for the pixel type pair ({fixed}, {moving})")]
    UnsupportedTypePair {
        /// Name of the registry that was probed.
        registry: &'static str,
        /// Descriptor of the fixed side.
        fixed: TypeDescriptor,
        /// Descriptor of the moving side.
        moving: TypeDescriptor,
    },

    /// Fixed and moving inputs have different spatial dimensions.
    ///
    /// Detected before any pair lookup; cross-dimension pairs are never
    /// registered and never probed.
    #[error("fixed dimension {fixed} does not match moving dimension {moving}")]
    IncompatibleDimension {
        /// Dimension of the fixed side.
        fixed: u32,
        /// Dimension of the moving side.
        moving: u32,
    },

    /// A collection of images does not share a single descriptor.
    #[error(
        "{collection} image {index} has pixel type {found}, expected {expected}"
    )]
    HeterogeneousCollection {
        /// Which collection failed (e.g. "fixed", "moving mask").
        collection: &'static str,
        /// Index of the first mismatching element.
        index: usize,
        /// Descriptor shared by the preceding elements.
        expected: TypeDescriptor,
        /// Descriptor of the mismatching element.
        found: TypeDescriptor,
    },

    /// A registry key was registered twice.
    ///
    /// Registration is append-only and happens once during initialization;
    /// a duplicate key is a programming error reported at insert time, not
    /// deferred to lookup.
    #[error("duplicate {registry} registration for {key}")]
    DuplicateRegistration {
        /// Name of the registry.
        registry: &'static str,
        /// Rendered key.
        key: String,
    },
}

/// Result alias for dispatch operations.
pub type Result<T> = std::result::Result<T, DispatchError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::ScalarKind;

    #[test]
    fn test_unsupported_type_display() {
        let err = DispatchError::UnsupportedType {
            registry: "import",
            descriptor: TypeDescriptor::scalar(ScalarKind::UInt8, 5),
        };
        assert_eq!(
            err.to_string(),
            "no import variant is registered for pixel type uint8 5-D"
        );
    }

    #[test]
    fn test_incompatible_dimension_display() {
        let err = DispatchError::IncompatibleDimension { fixed: 2, moving: 3 };
        assert_eq!(
            err.to_string(),
            "fixed dimension 2 does not match moving dimension 3"
        );
    }
}
