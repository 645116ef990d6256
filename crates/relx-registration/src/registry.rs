//! The dual-dispatch table of compiled registration variants.
//!
//! Built once, eagerly, over the full cross product of scalar fixed and
//! moving kinds at each supported dimension — `D * K^2` entries, since a
//! fixed and a moving image of different dimension is never a valid pair
//! and is rejected at registration time. The table lives behind a
//! `LazyLock` and is immutable after construction, so lookups from
//! concurrent runs need no locking.

use std::sync::LazyLock;

use relx_core::pixel::SUPPORTED_DIMENSIONS;
use relx_core::{for_each_scalar, PairRegistry, ScalarKind, TypeDescriptor};

use crate::error::Result;
use crate::pipeline::{run_pair, RegistrationInputs, RegistrationOutput};

pub(crate) type RegistrationFn = fn(&RegistrationInputs<'_>) -> Result<RegistrationOutput>;

macro_rules! pair_entry {
    ($reg:ident, $dim:tt, $f:ty, $fk:ident, $m:ty, $mk:ident) => {
        $reg.register(
            TypeDescriptor::scalar(ScalarKind::$fk, $dim),
            TypeDescriptor::scalar(ScalarKind::$mk, $dim),
            run_pair::<$f, $m, $dim> as RegistrationFn,
        )
        .expect("registration table is built once");
    };
}

macro_rules! pairs_for_fixed {
    ($reg:ident, $dim:tt, $f:ty, $fk:ident) => {
        for_each_scalar!(pair_entry!($reg, $dim, $f, $fk,));
    };
}

fn build_registry() -> PairRegistry<RegistrationFn> {
    let mut registry = PairRegistry::new("registration");
    for_each_scalar!(pairs_for_fixed!(registry, 2,));
    for_each_scalar!(pairs_for_fixed!(registry, 3,));
    for_each_scalar!(pairs_for_fixed!(registry, 4,));
    registry
}

static REGISTRATION_REGISTRY: LazyLock<PairRegistry<RegistrationFn>> =
    LazyLock::new(build_registry);

/// Resolve the compiled variant for an ordered (fixed, moving) pair.
///
/// Dimension mismatches are reported distinctly, before the table probe.
pub(crate) fn lookup(fixed: &TypeDescriptor, moving: &TypeDescriptor) -> Result<RegistrationFn> {
    Ok(*REGISTRATION_REGISTRY.lookup(fixed, moving)?)
}

/// Whether a (fixed, moving) pair has a compiled variant.
pub fn supports_pair(fixed: &TypeDescriptor, moving: &TypeDescriptor) -> bool {
    REGISTRATION_REGISTRY.contains(fixed, moving)
}

/// Number of compiled registration variants.
pub fn registered_pair_count() -> usize {
    REGISTRATION_REGISTRY.len()
}

/// Expected table size: every same-dimension scalar pair.
pub fn expected_pair_count() -> usize {
    SUPPORTED_DIMENSIONS.len() * ScalarKind::ALL.len() * ScalarKind::ALL.len()
}
