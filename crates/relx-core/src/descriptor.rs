//! Runtime type descriptors identifying compiled image variants.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::pixel::{ElementKind, ScalarKind};

/// Identifies which compiled variant a runtime image value holds.
///
/// A descriptor is the pair of the pixel [`ElementKind`] and the spatial
/// dimension. Equality and hashing are structural, so descriptors are
/// usable directly as dispatch-table keys. Descriptors are derived on
/// demand from a runtime image and never change after the image is
/// constructed.
///
/// # Examples
/// ```rust
/// use relx_core::{ElementKind, ScalarKind, TypeDescriptor};
///
/// let a = TypeDescriptor::scalar(ScalarKind::UInt8, 2);
/// let b = TypeDescriptor::new(ElementKind::Scalar(ScalarKind::UInt8), 2);
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "uint8 2-D");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDescriptor {
    element: ElementKind,
    dimension: u32,
}

impl TypeDescriptor {
    /// Create a descriptor from an element kind and a dimension.
    pub fn new(element: ElementKind, dimension: u32) -> Self {
        Self { element, dimension }
    }

    /// Descriptor of a single-component image.
    pub fn scalar(kind: ScalarKind, dimension: u32) -> Self {
        Self::new(ElementKind::Scalar(kind), dimension)
    }

    /// Descriptor of a multi-component image.
    pub fn vector(kind: ScalarKind, dimension: u32) -> Self {
        Self::new(ElementKind::Vector(kind), dimension)
    }

    /// The pixel element kind.
    pub fn element(&self) -> ElementKind {
        self.element
    }

    /// The component kind, regardless of vector-ness.
    pub fn scalar_kind(&self) -> ScalarKind {
        self.element.scalar_kind()
    }

    /// The spatial dimension.
    pub fn dimension(&self) -> u32 {
        self.dimension
    }

    /// Whether the element kind is multi-component.
    pub fn is_vector(&self) -> bool {
        self.element.is_vector()
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}-D", self.element, self.dimension)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structural_equality() {
        let a = TypeDescriptor::scalar(ScalarKind::Float32, 3);
        let b = TypeDescriptor::new(ElementKind::Scalar(ScalarKind::Float32), 3);
        assert_eq!(a, b);
        assert_ne!(a, TypeDescriptor::scalar(ScalarKind::Float32, 2));
        assert_ne!(a, TypeDescriptor::vector(ScalarKind::Float32, 3));
    }

    #[test]
    fn test_accessors() {
        let d = TypeDescriptor::vector(ScalarKind::Int16, 4);
        assert_eq!(d.scalar_kind(), ScalarKind::Int16);
        assert_eq!(d.dimension(), 4);
        assert!(d.is_vector());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            TypeDescriptor::scalar(ScalarKind::UInt8, 2).to_string(),
            "uint8 2-D"
        );
        assert_eq!(
            TypeDescriptor::vector(ScalarKind::Float64, 3).to_string(),
            "vector of float64 3-D"
        );
    }
}
