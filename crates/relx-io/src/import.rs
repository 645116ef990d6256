//! Composing runtime-typed images from external memory buffers.
//!
//! [`ImportFilter`] bridges one externally-supplied numeric buffer plus
//! geometry metadata into a [`RuntimeImage`]. The buffer's declared
//! element kind and the length of the requested size form the type
//! descriptor; a single-dispatch registry, built once over the full
//! supported (element kind × dimension) matrix, selects the compiled
//! import routine. A component count above one selects the vector variant
//! of the buffer's element kind; the component count is bound onto the
//! typed object at construction, before any data is attached.

use std::sync::LazyLock;

use relx_core::for_each_scalar;
use relx_core::image::{Image, ImageMetadata, RuntimeImage, VectorImage};
use relx_core::pixel::{ElementKind, Scalar, ScalarKind};
use relx_core::spatial::{Direction, Point, Spacing};
use relx_core::{TypeDescriptor, TypedRegistry};

use crate::error::{ImportError, Result};

/// A borrowed, typed view of the caller's buffer.
#[derive(Debug, Clone, Copy)]
enum ImportBuffer<'a> {
    Int8(&'a [i8]),
    UInt8(&'a [u8]),
    Int16(&'a [i16]),
    UInt16(&'a [u16]),
    Int32(&'a [i32]),
    UInt32(&'a [u32]),
    Int64(&'a [i64]),
    UInt64(&'a [u64]),
    Float32(&'a [f32]),
    Float64(&'a [f64]),
}

impl ImportBuffer<'_> {
    fn scalar_kind(&self) -> ScalarKind {
        match self {
            ImportBuffer::Int8(_) => ScalarKind::Int8,
            ImportBuffer::UInt8(_) => ScalarKind::UInt8,
            ImportBuffer::Int16(_) => ScalarKind::Int16,
            ImportBuffer::UInt16(_) => ScalarKind::UInt16,
            ImportBuffer::Int32(_) => ScalarKind::Int32,
            ImportBuffer::UInt32(_) => ScalarKind::UInt32,
            ImportBuffer::Int64(_) => ScalarKind::Int64,
            ImportBuffer::UInt64(_) => ScalarKind::UInt64,
            ImportBuffer::Float32(_) => ScalarKind::Float32,
            ImportBuffer::Float64(_) => ScalarKind::Float64,
        }
    }

    fn len(&self) -> usize {
        match self {
            ImportBuffer::Int8(b) => b.len(),
            ImportBuffer::UInt8(b) => b.len(),
            ImportBuffer::Int16(b) => b.len(),
            ImportBuffer::UInt16(b) => b.len(),
            ImportBuffer::Int32(b) => b.len(),
            ImportBuffer::UInt32(b) => b.len(),
            ImportBuffer::Int64(b) => b.len(),
            ImportBuffer::UInt64(b) => b.len(),
            ImportBuffer::Float32(b) => b.len(),
            ImportBuffer::Float64(b) => b.len(),
        }
    }
}

/// Recovers the typed slice behind an [`ImportBuffer`] variant.
trait ImportSource: Scalar {
    fn slice_from<'a>(buffer: &ImportBuffer<'a>) -> Option<&'a [Self]>;
}

macro_rules! impl_import_source {
    ($ty:ty, $kind:ident) => {
        impl ImportSource for $ty {
            fn slice_from<'a>(buffer: &ImportBuffer<'a>) -> Option<&'a [Self]> {
                match *buffer {
                    ImportBuffer::$kind(slice) => Some(slice),
                    _ => None,
                }
            }
        }
    };
}

for_each_scalar!(impl_import_source!());

/// Validated inputs handed to a registered import routine.
struct ImportRequest<'a> {
    buffer: ImportBuffer<'a>,
    size: &'a [usize],
    spacing: &'a [f64],
    origin: &'a [f64],
    direction: Option<&'a [f64]>,
    components: u32,
}

type ImportFn = fn(&ImportRequest<'_>) -> Result<RuntimeImage>;

/// The fully-typed import routine; one monomorphization per registry
/// entry.
fn import_typed<P: ImportSource, const D: usize>(request: &ImportRequest<'_>) -> Result<RuntimeImage> {
    let Some(buffer) = P::slice_from(&request.buffer) else {
        unreachable!("import registry key is derived from the buffer variant");
    };
    let size: [usize; D] = request
        .size
        .try_into()
        .expect("size length matches the dispatched dimension");

    let origin = Point::<D>::from_slice(request.origin);
    let spacing = Spacing::<D>::from_slice(request.spacing);
    let direction = match request.direction {
        Some(entries) => Direction::<D>::from_row_major(entries),
        None => Direction::identity(),
    };
    if direction.try_inverse().is_none() {
        return Err(ImportError::SingularDirection);
    }
    let metadata = ImageMetadata::new(origin, spacing, direction);

    if request.components > 1 {
        // The component count is bound by the constructor, ahead of the
        // data copy; the two steps are inseparable for vector kinds.
        let image = VectorImage::<P, D>::from_interleaved_buffer(
            size,
            request.components,
            metadata,
            buffer.to_vec(),
        );
        Ok(RuntimeImage::from(image))
    } else {
        let image = Image::<P, D>::from_buffer(size, metadata, buffer.to_vec());
        Ok(RuntimeImage::from(image))
    }
}

macro_rules! import_entries {
    ($reg:ident, $dim:literal, $ty:ty, $kind:ident) => {
        $reg.register(
            TypeDescriptor::scalar(ScalarKind::$kind, $dim),
            import_typed::<$ty, $dim> as ImportFn,
        )
        .expect("import table is built once");
        $reg.register(
            TypeDescriptor::vector(ScalarKind::$kind, $dim),
            import_typed::<$ty, $dim> as ImportFn,
        )
        .expect("import table is built once");
    };
}

fn build_registry() -> TypedRegistry<ImportFn> {
    let mut registry = TypedRegistry::new("import");
    for_each_scalar!(import_entries!(registry, 2,));
    for_each_scalar!(import_entries!(registry, 3,));
    for_each_scalar!(import_entries!(registry, 4,));
    registry
}

static IMPORT_REGISTRY: LazyLock<TypedRegistry<ImportFn>> = LazyLock::new(build_registry);

/// Whether the import registry holds a compiled variant for a descriptor.
pub fn supports(descriptor: &TypeDescriptor) -> bool {
    IMPORT_REGISTRY.contains(descriptor)
}

/// Number of compiled import variants.
pub fn registered_variant_count() -> usize {
    IMPORT_REGISTRY.len()
}

/// Builder composing a [`RuntimeImage`] from a borrowed numeric buffer.
///
/// Spacing defaults to 1.0 per axis, origin to 0.0 per axis, direction to
/// identity, and components per pixel to 1. The buffer is copied on
/// execution; the returned image owns its data.
///
/// # Examples
/// ```rust
/// use relx_core::{ScalarKind, TypeDescriptor};
/// use relx_io::ImportFilter;
///
/// let pixels: Vec<u8> = (0..16).collect();
/// let image = ImportFilter::new()
///     .with_size(&[4, 4])
///     .buffer_u8(&pixels)
///     .execute()
///     .unwrap();
/// assert_eq!(image.descriptor(), TypeDescriptor::scalar(ScalarKind::UInt8, 2));
/// ```
#[derive(Debug, Clone)]
pub struct ImportFilter<'a> {
    buffer: Option<ImportBuffer<'a>>,
    size: Vec<usize>,
    spacing: Option<Vec<f64>>,
    origin: Option<Vec<f64>>,
    direction: Option<Vec<f64>>,
    components_per_pixel: u32,
}

impl Default for ImportFilter<'_> {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! buffer_setters {
    ($lt:lifetime, $(($method:ident, $ty:ty, $kind:ident)),* $(,)?) => {
        $(
            /// Attach a borrowed buffer of this element kind.
            pub fn $method(mut self, buffer: &$lt [$ty]) -> Self {
                self.buffer = Some(ImportBuffer::$kind(buffer));
                self
            }
        )*
    };
}

impl<'a> ImportFilter<'a> {
    /// Create a filter with default geometry and a single component per
    /// pixel.
    pub fn new() -> Self {
        Self {
            buffer: None,
            size: Vec::new(),
            spacing: None,
            origin: None,
            direction: None,
            components_per_pixel: 1,
        }
    }

    /// Per-axis pixel counts; the number of axes selects the dimension.
    pub fn with_size(mut self, size: &[usize]) -> Self {
        self.size = size.to_vec();
        self
    }

    /// Per-axis physical spacing. Defaults to 1.0 per axis.
    pub fn with_spacing(mut self, spacing: &[f64]) -> Self {
        self.spacing = Some(spacing.to_vec());
        self
    }

    /// Physical coordinate of the first pixel. Defaults to 0.0 per axis.
    pub fn with_origin(mut self, origin: &[f64]) -> Self {
        self.origin = Some(origin.to_vec());
        self
    }

    /// Flattened row-major axis orientation matrix. Defaults to identity.
    pub fn with_direction(mut self, direction: &[f64]) -> Self {
        self.direction = Some(direction.to_vec());
        self
    }

    /// Components per pixel. A count above one selects the vector variant
    /// of the buffer's element kind.
    pub fn with_components_per_pixel(mut self, components: u32) -> Self {
        self.components_per_pixel = components;
        self
    }

    buffer_setters!(
        'a,
        (buffer_i8, i8, Int8),
        (buffer_u8, u8, UInt8),
        (buffer_i16, i16, Int16),
        (buffer_u16, u16, UInt16),
        (buffer_i32, i32, Int32),
        (buffer_u32, u32, UInt32),
        (buffer_i64, i64, Int64),
        (buffer_u64, u64, UInt64),
        (buffer_f32, f32, Float32),
        (buffer_f64, f64, Float64),
    );

    /// Validate the construction arguments, derive the type descriptor,
    /// and dispatch to the compiled import routine.
    pub fn execute(&self) -> Result<RuntimeImage> {
        let buffer = self.buffer.ok_or(ImportError::MissingBuffer)?;
        if self.size.is_empty() {
            return Err(ImportError::EmptySize);
        }
        if let Some(axis) = self.size.iter().position(|&s| s == 0) {
            return Err(ImportError::ZeroSizeEntry { axis });
        }
        if self.components_per_pixel == 0 {
            return Err(ImportError::ZeroComponents);
        }

        let dimension = self.size.len();
        let expected = self.size.iter().product::<usize>() * self.components_per_pixel as usize;
        if buffer.len() != expected {
            return Err(ImportError::BufferLengthMismatch {
                expected,
                actual: buffer.len(),
            });
        }

        let default_spacing;
        let spacing: &[f64] = match &self.spacing {
            Some(values) => values,
            None => {
                default_spacing = vec![1.0; dimension];
                &default_spacing
            }
        };
        if spacing.len() != dimension {
            return Err(ImportError::GeometryLengthMismatch {
                field: "spacing",
                expected: dimension,
                actual: spacing.len(),
            });
        }
        if let Some(axis) = spacing.iter().position(|&s| s <= 0.0) {
            return Err(ImportError::NonPositiveSpacing {
                axis,
                value: spacing[axis],
            });
        }

        let default_origin;
        let origin: &[f64] = match &self.origin {
            Some(values) => values,
            None => {
                default_origin = vec![0.0; dimension];
                &default_origin
            }
        };
        if origin.len() != dimension {
            return Err(ImportError::GeometryLengthMismatch {
                field: "origin",
                expected: dimension,
                actual: origin.len(),
            });
        }

        if let Some(direction) = &self.direction {
            if direction.len() != dimension * dimension {
                return Err(ImportError::GeometryLengthMismatch {
                    field: "direction",
                    expected: dimension * dimension,
                    actual: direction.len(),
                });
            }
        }

        let element = if self.components_per_pixel > 1 {
            ElementKind::Vector(buffer.scalar_kind())
        } else {
            ElementKind::Scalar(buffer.scalar_kind())
        };
        let descriptor = TypeDescriptor::new(element, dimension as u32);
        tracing::debug!(%descriptor, "importing image from buffer");

        let callable = IMPORT_REGISTRY.lookup(&descriptor)?;
        let request = ImportRequest {
            buffer,
            size: &self.size,
            spacing,
            origin,
            direction: self.direction.as_deref(),
            components: self.components_per_pixel,
        };
        callable(&request)
    }
}

macro_rules! import_as_fns {
    ($(($fname:ident, $method:ident, $ty:ty)),* $(,)?) => {
        $(
            /// One-call import of a scalar buffer with default spacing,
            /// origin, and direction. Use [`ImportFilter`] for full
            /// geometry control.
            pub fn $fname(buffer: &[$ty], size: &[usize]) -> Result<RuntimeImage> {
                ImportFilter::new().with_size(size).$method(buffer).execute()
            }
        )*
    };
}

import_as_fns!(
    (import_as_i8, buffer_i8, i8),
    (import_as_u8, buffer_u8, u8),
    (import_as_i16, buffer_i16, i16),
    (import_as_u16, buffer_u16, u16),
    (import_as_i32, buffer_i32, i32),
    (import_as_u32, buffer_u32, u32),
    (import_as_i64, buffer_i64, i64),
    (import_as_u64, buffer_u64, u64),
    (import_as_f32, buffer_f32, f32),
    (import_as_f64, buffer_f64, f64),
);
