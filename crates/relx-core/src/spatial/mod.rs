//! Spatial types: points, vectors, spacings, and direction matrices.
//!
//! Thin nalgebra wrappers carrying the physical-space conventions used by
//! every image in this workspace. All quantities are `f64`; image pixel
//! kinds never leak into the spatial model.

pub mod direction;
pub mod point;
pub mod spacing;
pub mod vector;

pub use direction::Direction;
pub use point::Point;
pub use spacing::Spacing;
pub use vector::Vector;

/// Common aliases for the 2-D and 3-D cases.
pub type Point2 = Point<2>;
pub type Point3 = Point<3>;
pub type Vector2 = Vector<2>;
pub type Vector3 = Vector<3>;
pub type Spacing2 = Spacing<2>;
pub type Spacing3 = Spacing<3>;
pub type Direction2 = Direction<2>;
pub type Direction3 = Direction<3>;
