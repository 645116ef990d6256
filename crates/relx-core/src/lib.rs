pub mod descriptor;
pub mod dispatch;
pub mod error;
pub mod image;
pub mod pixel;
pub mod spatial;

pub use descriptor::TypeDescriptor;
pub use dispatch::{PairRegistry, TypedRegistry};
pub use error::DispatchError;
pub use image::{Image, ImageMetadata, RuntimeImage, VectorImage};
pub use pixel::{ElementKind, Scalar, ScalarKind, SUPPORTED_DIMENSIONS};
pub use spatial::{Direction, Point, Spacing, Vector};
