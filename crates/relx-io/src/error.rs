//! Error types for buffer import.

use thiserror::Error;

use relx_core::DispatchError;

/// Failures raised while composing an image from an external buffer.
///
/// Everything except `Dispatch` is a malformed-construction-argument
/// failure detected before any dispatch happens; `Dispatch` carries an
/// unsupported-descriptor miss from the import registry unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ImportError {
    /// No buffer was attached to the filter.
    #[error("no buffer was attached to the import filter")]
    MissingBuffer,

    /// The requested size has no axes.
    #[error("size must have at least one axis")]
    EmptySize,

    /// A size entry is zero.
    #[error("size entries must be positive, axis {axis} is zero")]
    ZeroSizeEntry {
        /// Offending axis.
        axis: usize,
    },

    /// The component count is zero.
    #[error("components per pixel must be at least 1")]
    ZeroComponents,

    /// The buffer does not hold exactly `size product * components`
    /// elements.
    #[error("buffer holds {actual} elements but size and components require {expected}")]
    BufferLengthMismatch {
        /// Required element count.
        expected: usize,
        /// Supplied element count.
        actual: usize,
    },

    /// A geometry vector has the wrong number of entries for the
    /// requested dimension.
    #[error("{field} has {actual} entries, expected {expected}")]
    GeometryLengthMismatch {
        /// Which geometry input failed.
        field: &'static str,
        /// Required entry count.
        expected: usize,
        /// Supplied entry count.
        actual: usize,
    },

    /// A spacing entry is zero or negative.
    #[error("spacing entries must be positive, axis {axis} is {value}")]
    NonPositiveSpacing {
        /// Offending axis.
        axis: usize,
        /// Offending value.
        value: f64,
    },

    /// The direction matrix has no inverse.
    #[error("direction matrix is singular")]
    SingularDirection,

    /// The derived descriptor has no compiled import variant.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Result alias for import operations.
pub type Result<T> = std::result::Result<T, ImportError>;
