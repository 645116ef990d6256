//! Dispatch registries mapping type descriptors to compiled callables.
//!
//! A registry is built once, eagerly, over the full supported matrix of
//! descriptors during initialization, then published immutably (typically
//! inside a `LazyLock` static). Lookups are exact-match only: a missing
//! entry is a deterministic [`DispatchError`], never a coercion to a
//! "closest" variant. Because the tables are never mutated after
//! construction, concurrent lookups need no locking.
//!
//! [`TypedRegistry`] keys on a single [`TypeDescriptor`] (operations with
//! one runtime-typed input). [`PairRegistry`] keys on an ordered
//! descriptor pair (operations generically parameterized by two
//! independent pixel types); its callables genuinely need both types
//! bound at once, so the key is the pair, not two nested single lookups.

use std::collections::HashMap;

use crate::descriptor::TypeDescriptor;
use crate::error::{DispatchError, Result};

/// Immutable-after-build table from one descriptor to a callable.
#[derive(Debug)]
pub struct TypedRegistry<F> {
    name: &'static str,
    entries: HashMap<TypeDescriptor, F>,
}

impl<F> TypedRegistry<F> {
    /// Create an empty registry with a name used in error messages.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: HashMap::new(),
        }
    }

    /// Add an entry. A prior entry for the same descriptor is a
    /// programming error, rejected immediately.
    pub fn register(&mut self, descriptor: TypeDescriptor, entry: F) -> Result<()> {
        if self.entries.contains_key(&descriptor) {
            return Err(DispatchError::DuplicateRegistration {
                registry: self.name,
                key: descriptor.to_string(),
            });
        }
        self.entries.insert(descriptor, entry);
        Ok(())
    }

    /// Exact-match lookup.
    pub fn lookup(&self, descriptor: &TypeDescriptor) -> Result<&F> {
        self.entries
            .get(descriptor)
            .ok_or(DispatchError::UnsupportedType {
                registry: self.name,
                descriptor: *descriptor,
            })
    }

    /// Whether a descriptor has an entry.
    pub fn contains(&self, descriptor: &TypeDescriptor) -> bool {
        self.entries.contains_key(descriptor)
    }

    /// Number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over the registered descriptors.
    pub fn descriptors(&self) -> impl Iterator<Item = &TypeDescriptor> {
        self.entries.keys()
    }
}

/// Immutable-after-build table from an ordered descriptor pair to a
/// callable.
///
/// Only same-dimension pairs are representable: registration rejects a
/// cross-dimension key outright, which keeps the table at `D * K^2`
/// entries instead of `D^2 * K^2`, and lookup reports a dimension
/// mismatch before probing the table at all.
#[derive(Debug)]
pub struct PairRegistry<F> {
    name: &'static str,
    entries: HashMap<(TypeDescriptor, TypeDescriptor), F>,
}

impl<F> PairRegistry<F> {
    /// Create an empty pair registry with a name used in error messages.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            entries: HashMap::new(),
        }
    }

    /// Add an entry for an ordered (fixed, moving) pair.
    ///
    /// Rejects cross-dimension pairs and duplicate keys immediately.
    pub fn register(
        &mut self,
        fixed: TypeDescriptor,
        moving: TypeDescriptor,
        entry: F,
    ) -> Result<()> {
        if fixed.dimension() != moving.dimension() {
            return Err(DispatchError::IncompatibleDimension {
                fixed: fixed.dimension(),
                moving: moving.dimension(),
            });
        }
        if self.entries.contains_key(&(fixed, moving)) {
            return Err(DispatchError::DuplicateRegistration {
                registry: self.name,
                key: format!("({}, {})", fixed, moving),
            });
        }
        self.entries.insert((fixed, moving), entry);
        Ok(())
    }

    /// Exact-match pair lookup.
    ///
    /// Dimension equality is checked before the table probe, so a
    /// cross-dimension pair surfaces as [`DispatchError::IncompatibleDimension`]
    /// even when both element kinds would otherwise have an entry.
    pub fn lookup(&self, fixed: &TypeDescriptor, moving: &TypeDescriptor) -> Result<&F> {
        if fixed.dimension() != moving.dimension() {
            return Err(DispatchError::IncompatibleDimension {
                fixed: fixed.dimension(),
                moving: moving.dimension(),
            });
        }
        self.entries
            .get(&(*fixed, *moving))
            .ok_or(DispatchError::UnsupportedTypePair {
                registry: self.name,
                fixed: *fixed,
                moving: *moving,
            })
    }

    /// Whether an ordered pair has an entry.
    pub fn contains(&self, fixed: &TypeDescriptor, moving: &TypeDescriptor) -> bool {
        self.entries.contains_key(&(*fixed, *moving))
    }

    /// Number of registered pairs.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel::ScalarKind;

    type Callable = fn() -> u32;

    fn one() -> u32 {
        1
    }

    fn two() -> u32 {
        2
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = TypedRegistry::<Callable>::new("test");
        let u8_2d = TypeDescriptor::scalar(ScalarKind::UInt8, 2);
        registry.register(u8_2d, one).unwrap();

        let entry = registry.lookup(&u8_2d).unwrap();
        assert_eq!(entry(), 1);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_lookup_miss_is_unsupported_type() {
        let registry = TypedRegistry::<Callable>::new("test");
        let err = registry
            .lookup(&TypeDescriptor::scalar(ScalarKind::Float32, 3))
            .unwrap_err();
        assert!(matches!(err, DispatchError::UnsupportedType { .. }));
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut registry = TypedRegistry::<Callable>::new("test");
        let key = TypeDescriptor::scalar(ScalarKind::Int32, 3);
        registry.register(key, one).unwrap();

        let err = registry.register(key, two).unwrap_err();
        assert!(matches!(err, DispatchError::DuplicateRegistration { .. }));
        // The original entry is untouched.
        assert_eq!(registry.lookup(&key).unwrap()(), 1);
    }

    #[test]
    fn test_pair_registration_rejects_cross_dimension() {
        let mut registry = PairRegistry::<Callable>::new("test");
        let err = registry
            .register(
                TypeDescriptor::scalar(ScalarKind::UInt8, 2),
                TypeDescriptor::scalar(ScalarKind::UInt8, 3),
                one,
            )
            .unwrap_err();
        assert!(matches!(err, DispatchError::IncompatibleDimension { fixed: 2, moving: 3 }));
        assert!(registry.is_empty());
    }

    #[test]
    fn test_pair_lookup_checks_dimension_before_probe() {
        let mut registry = PairRegistry::<Callable>::new("test");
        let u8_2d = TypeDescriptor::scalar(ScalarKind::UInt8, 2);
        let u8_3d = TypeDescriptor::scalar(ScalarKind::UInt8, 3);
        registry.register(u8_2d, u8_2d, one).unwrap();
        registry.register(u8_3d, u8_3d, two).unwrap();

        // Both element kinds have entries; the mismatch must still be
        // reported as a dimension error, not an unsupported pair.
        let err = registry.lookup(&u8_2d, &u8_3d).unwrap_err();
        assert!(matches!(err, DispatchError::IncompatibleDimension { .. }));
    }

    #[test]
    fn test_pair_lookup_is_ordered() {
        let mut registry = PairRegistry::<Callable>::new("test");
        let u8_2d = TypeDescriptor::scalar(ScalarKind::UInt8, 2);
        let f32_2d = TypeDescriptor::scalar(ScalarKind::Float32, 2);
        registry.register(u8_2d, f32_2d, one).unwrap();

        assert_eq!(registry.lookup(&u8_2d, &f32_2d).unwrap()(), 1);
        let err = registry.lookup(&f32_2d, &u8_2d).unwrap_err();
        assert!(matches!(err, DispatchError::UnsupportedTypePair { .. }));
    }
}
