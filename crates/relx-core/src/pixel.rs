//! Pixel element kinds and the compile-time scalar pixel trait.
//!
//! Every runtime image holds pixels drawn from a fixed, finite set of
//! numeric component kinds. [`ScalarKind`] enumerates the kinds,
//! [`ElementKind`] adds the multi-component (vector) variant of each, and
//! the [`Scalar`] trait ties each kind back to the concrete Rust type that
//! the statically-typed image code is compiled against. The finiteness of
//! this set is what makes exhaustive registration of compiled variants
//! tractable.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Numeric kind of a single pixel component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ScalarKind {
    /// Signed 8-bit integer.
    Int8,
    /// Unsigned 8-bit integer.
    UInt8,
    /// Signed 16-bit integer.
    Int16,
    /// Unsigned 16-bit integer.
    UInt16,
    /// Signed 32-bit integer.
    Int32,
    /// Unsigned 32-bit integer.
    UInt32,
    /// Signed 64-bit integer.
    Int64,
    /// Unsigned 64-bit integer.
    UInt64,
    /// 32-bit floating point.
    Float32,
    /// 64-bit floating point.
    Float64,
}

impl ScalarKind {
    /// Every scalar kind with a compiled variant, in registration order.
    pub const ALL: [ScalarKind; 10] = [
        ScalarKind::Int8,
        ScalarKind::UInt8,
        ScalarKind::Int16,
        ScalarKind::UInt16,
        ScalarKind::Int32,
        ScalarKind::UInt32,
        ScalarKind::Int64,
        ScalarKind::UInt64,
        ScalarKind::Float32,
        ScalarKind::Float64,
    ];

    /// Lowercase name used in error messages and parameter maps.
    pub fn name(&self) -> &'static str {
        match self {
            ScalarKind::Int8 => "int8",
            ScalarKind::UInt8 => "uint8",
            ScalarKind::Int16 => "int16",
            ScalarKind::UInt16 => "uint16",
            ScalarKind::Int32 => "int32",
            ScalarKind::UInt32 => "uint32",
            ScalarKind::Int64 => "int64",
            ScalarKind::UInt64 => "uint64",
            ScalarKind::Float32 => "float32",
            ScalarKind::Float64 => "float64",
        }
    }

    /// Whether this kind is an integer kind.
    pub fn is_integer(&self) -> bool {
        !matches!(self, ScalarKind::Float32 | ScalarKind::Float64)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Element kind of a pixel: either a single scalar component, or a
/// runtime-length vector of identical components.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ElementKind {
    /// One component per pixel.
    Scalar(ScalarKind),
    /// Multiple interleaved components per pixel, count fixed per image.
    Vector(ScalarKind),
}

impl ElementKind {
    /// The component kind, regardless of vector-ness.
    pub fn scalar_kind(&self) -> ScalarKind {
        match self {
            ElementKind::Scalar(kind) | ElementKind::Vector(kind) => *kind,
        }
    }

    /// Whether this is a multi-component kind.
    pub fn is_vector(&self) -> bool {
        matches!(self, ElementKind::Vector(_))
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ElementKind::Scalar(kind) => write!(f, "{}", kind),
            ElementKind::Vector(kind) => write!(f, "vector of {}", kind),
        }
    }
}

/// Spatial dimensions with a compiled variant in the dispatch tables.
pub const SUPPORTED_DIMENSIONS: [u32; 3] = [2, 3, 4];

/// Compile-time pixel component trait.
///
/// Implemented for exactly the ten primitive types enumerated by
/// [`ScalarKind`]. The `f64` conversions define the working precision of
/// the registration pipeline: widening is exact for every kind except
/// `i64`/`u64` extremes, narrowing rounds and saturates.
pub trait Scalar: Copy + Default + PartialOrd + Send + Sync + 'static {
    /// The runtime kind tag for this component type.
    const KIND: ScalarKind;

    /// Widen to the pipeline's working precision.
    fn to_f64(self) -> f64;

    /// Narrow from working precision, rounding and saturating for integer
    /// kinds.
    fn from_f64(value: f64) -> Self;
}

macro_rules! impl_integer_scalar {
    ($ty:ty, $kind:ident) => {
        impl Scalar for $ty {
            const KIND: ScalarKind = ScalarKind::$kind;

            fn to_f64(self) -> f64 {
                self as f64
            }

            fn from_f64(value: f64) -> Self {
                // Float-to-int `as` saturates and maps NaN to zero.
                value.round() as $ty
            }
        }
    };
}

impl_integer_scalar!(i8, Int8);
impl_integer_scalar!(u8, UInt8);
impl_integer_scalar!(i16, Int16);
impl_integer_scalar!(u16, UInt16);
impl_integer_scalar!(i32, Int32);
impl_integer_scalar!(u32, UInt32);
impl_integer_scalar!(i64, Int64);
impl_integer_scalar!(u64, UInt64);

impl Scalar for f32 {
    const KIND: ScalarKind = ScalarKind::Float32;

    fn to_f64(self) -> f64 {
        self as f64
    }

    fn from_f64(value: f64) -> Self {
        value as f32
    }
}

impl Scalar for f64 {
    const KIND: ScalarKind = ScalarKind::Float64;

    fn to_f64(self) -> f64 {
        self
    }

    fn from_f64(value: f64) -> Self {
        value
    }
}

/// Invoke a callback macro once per supported scalar kind.
///
/// The callback receives any leading tokens passed after the `!`, followed
/// by the Rust type and the [`ScalarKind`] variant name. Both dispatch
/// tables are built from this single enumeration so the supported-kind
/// list has one source of truth.
#[macro_export]
macro_rules! for_each_scalar {
    ($action:ident ! ($($args:tt)*)) => {
        $action!($($args)* i8, Int8);
        $action!($($args)* u8, UInt8);
        $action!($($args)* i16, Int16);
        $action!($($args)* u16, UInt16);
        $action!($($args)* i32, Int32);
        $action!($($args)* u32, UInt32);
        $action!($($args)* i64, Int64);
        $action!($($args)* u64, UInt64);
        $action!($($args)* f32, Float32);
        $action!($($args)* f64, Float64);
    };
}
