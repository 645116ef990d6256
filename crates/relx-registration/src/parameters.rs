//! Parameter maps: the configuration payload of a registration run.
//!
//! A [`ParameterMap`] maps string keys to ordered sequences of string
//! values; a [`ParameterObject`] is an ordered collection of maps, one per
//! pipeline stage. Stage order and value order are both significant
//! (multi-stage pipelines run maps in sequence, and a key's values may
//! encode per-resolution schedules). The dispatch layer threads parameter
//! maps through to the registration pipeline unmodified.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{RegistrationError, Result};

/// One stage's configuration: string keys to ordered string values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterMap {
    entries: BTreeMap<String, Vec<String>>,
}

impl ParameterMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a key to an ordered sequence of values, replacing any previous
    /// values.
    pub fn set<K, V, I>(&mut self, key: K, values: I) -> &mut Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = V>,
    {
        self.entries
            .insert(key.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Builder-style [`set`].
    ///
    /// [`set`]: ParameterMap::set
    pub fn with<K, V, I>(mut self, key: K, values: I) -> Self
    where
        K: Into<String>,
        V: Into<String>,
        I: IntoIterator<Item = V>,
    {
        self.set(key, values);
        self
    }

    /// The values of a key, in order.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    /// The first value of a key.
    pub fn first(&self, key: &str) -> Option<&str> {
        self.get(key)?.first().map(String::as_str)
    }

    /// Whether a key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no keys.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over key/values pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.entries.iter()
    }
}

/// Ordered collection of stage maps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterObject {
    maps: Vec<ParameterMap>,
}

impl ParameterObject {
    /// Create an empty object (a degenerate, no-op run).
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an object from an ordered list of stage maps.
    pub fn from_maps(maps: Vec<ParameterMap>) -> Self {
        Self { maps }
    }

    /// Append a stage map.
    pub fn add_map(&mut self, map: ParameterMap) -> &mut Self {
        self.maps.push(map);
        self
    }

    /// The stage maps, in execution order.
    pub fn maps(&self) -> &[ParameterMap] {
        &self.maps
    }

    /// Number of stages.
    pub fn len(&self) -> usize {
        self.maps.len()
    }

    /// Whether the object has no stages.
    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    /// A ready-to-run stage map for a named transform class.
    ///
    /// Currently the only supported class is `"translation"`.
    pub fn default_parameter_map(transform: &str) -> Result<ParameterMap> {
        match transform {
            "translation" => Ok(ParameterMap::new()
                .with("Transform", ["TranslationTransform"])
                .with("Metric", ["AdvancedMeanSquares"])
                .with("Optimizer", ["RegularStepGradientDescent"])
                .with("MaximumNumberOfIterations", ["256"])
                .with("MaximumStepLength", ["1.0"])
                .with("MinimumStepLength", ["0.001"])),
            other => Err(RegistrationError::invalid_configuration(format!(
                "no default parameter map for transform class {other:?}"
            ))),
        }
    }
}
