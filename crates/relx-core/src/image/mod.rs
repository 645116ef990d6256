//! Image types: statically-typed containers and the runtime-typed value.
//!
//! [`Image`] and [`VectorImage`] are the concretely-typed containers that
//! the numeric code is compiled against, one instantiation per supported
//! (element kind, dimension) point. [`RuntimeImage`] is the opaque value
//! handed across the dispatch boundary: it exposes only a type descriptor
//! and the capability to be downcast by a registered callable.

pub mod metadata;
pub mod runtime;
pub mod typed;

pub use metadata::ImageMetadata;
pub use runtime::{ImageObject, RuntimeImage};
pub use typed::{Image, VectorImage};
