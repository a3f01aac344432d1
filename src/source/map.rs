//! In-memory map source

use crate::source::{ordinal_from_key, ConfigSource, CONFIG_ORDINAL, DEFAULT_ORDINAL};
use crate::types::BoxError;
use parking_lot::RwLock;
use std::collections::HashMap;

/// A named map of properties that its owner may keep mutating after
/// registration. Hold it in an `Arc` and call [`MapSource::set`]; the next
/// lookup sees the new value.
pub struct MapSource {
    name: String,
    ordinal: Option<i32>,
    values: RwLock<HashMap<String, String>>,
}

impl MapSource {
    pub fn new<N, I, K, V>(name: N, values: I) -> Self
    where
        N: Into<String>,
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            ordinal: None,
            values: RwLock::new(
                values
                    .into_iter()
                    .map(|(k, v)| (k.into(), v.into()))
                    .collect(),
            ),
        }
    }

    /// Empty source.
    pub fn empty(name: impl Into<String>) -> Self {
        Self::new(name, std::iter::empty::<(String, String)>())
    }

    /// Pin the ordinal. Takes precedence over a `config_ordinal` entry.
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    /// Insert or replace a property, returning the previous value.
    pub fn set(&self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.write().insert(key.into(), value.into())
    }

    pub fn remove(&self, key: &str) -> Option<String> {
        self.values.write().remove(key)
    }

    pub fn len(&self) -> usize {
        self.values.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.read().is_empty()
    }
}

impl ConfigSource for MapSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, BoxError> {
        Ok(self.values.read().get(key).cloned())
    }

    fn ordinal(&self) -> i32 {
        match self.ordinal {
            Some(ordinal) => ordinal,
            None => ordinal_from_key(&self.name, self.try_get(CONFIG_ORDINAL), DEFAULT_ORDINAL),
        }
    }

    fn property_names(&self) -> Vec<String> {
        self.values.read().keys().cloned().collect()
    }
}
