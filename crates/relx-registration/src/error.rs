//! Error types for registration operations.

use thiserror::Error;

use relx_core::DispatchError;

/// Main error type for the registration driver and pipeline.
///
/// Dispatch-level failures (unsupported pairs, dimension mismatches,
/// heterogeneous collections) pass through unchanged in the `Dispatch`
/// variant; everything else originates inside a successfully dispatched
/// stage and is likewise propagated without reinterpretation.
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// The fixed image collection is empty.
    #[error("no fixed images were set")]
    MissingFixedImages,

    /// The moving image collection is empty.
    #[error("no moving images were set")]
    MissingMovingImages,

    /// A parameter map carries an unusable setting.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    /// Error in metric computation.
    #[error("metric error: {0}")]
    MetricError(String),

    /// Error in optimizer operation.
    #[error("optimizer error: {0}")]
    OptimizerError(String),

    /// Descriptor resolution or registry lookup failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
}

/// Result type for registration operations.
pub type Result<T> = std::result::Result<T, RegistrationError>;

impl RegistrationError {
    /// Create an invalid configuration error.
    pub fn invalid_configuration(msg: impl Into<String>) -> Self {
        Self::InvalidConfiguration(msg.into())
    }

    /// Create a metric error.
    pub fn metric(msg: impl Into<String>) -> Self {
        Self::MetricError(msg.into())
    }

    /// Create an optimizer error.
    pub fn optimizer(msg: impl Into<String>) -> Self {
        Self::OptimizerError(msg.into())
    }
}
