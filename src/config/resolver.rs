//! Value resolution over the ordered sources
//!
//! A lookup walks the sources highest ordinal first, stops at the first one
//! that defines the key, and converts that raw value. Nothing is cached
//! between lookups: every call re-reads the sources.

use crate::config::ConfigBuilder;
use crate::convert::{ActiveConverter, ConvertResult, ConverterRegistry};
use crate::source::{ConfigSource, SourceIndex};
use crate::types::{ConfigError, ConvertError, Result};
use std::any::type_name;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, trace};

/// A raw property value and the source it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawValue {
    pub source_name: String,
    pub value: String,
}

/// The configuration engine.
///
/// Built once by the application and shared by reference or `Arc`.
pub struct Config {
    sources: SourceIndex,
    converters: ConverterRegistry,
}

impl Config {
    pub fn new(sources: Vec<Arc<dyn ConfigSource>>, converters: ConverterRegistry) -> Self {
        Self {
            sources: SourceIndex::new(sources),
            converters,
        }
    }

    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }

    /// Value of `key` as `T`; [`ConfigError::NotFound`] if no source has it.
    pub fn get_value<T: 'static>(&self, key: &str) -> Result<T> {
        self.get_optional_value(key)?
            .ok_or_else(|| ConfigError::NotFound {
                key: key.to_string(),
            })
    }

    /// Value of `key` as `T`, `None` if no source has it.
    ///
    /// A value that is present but cannot be converted is still an error.
    pub fn get_optional_value<T: 'static>(&self, key: &str) -> Result<Option<T>> {
        let converter = self.converter::<T>()?;
        match self.find_raw(key)? {
            Some(raw) => converter
                .convert(&raw.value)
                .map(Some)
                .map_err(|e| conversion_error::<T>(key, &raw.value, &raw.source_name, e)),
            None => Ok(None),
        }
    }

    /// List value of `key`; [`ConfigError::NotFound`] if absent.
    pub fn get_values<T: 'static>(&self, key: &str) -> Result<Vec<T>> {
        self.get_optional_values(key)?
            .ok_or_else(|| ConfigError::NotFound {
                key: key.to_string(),
            })
    }

    /// List value of `key`.
    ///
    /// A value defined for `key` itself is split on unescaped commas. When
    /// `key` is not defined anywhere, the indexed keys `key.0`, `key.1`, ...
    /// are collected until the first gap, each converted whole.
    pub fn get_optional_values<T: 'static>(&self, key: &str) -> Result<Option<Vec<T>>> {
        let converter = self.converter::<T>()?;

        if let Some(raw) = self.find_raw(key)? {
            let values = crate::convert::split_escaped(&raw.value)
                .iter()
                .map(|part| {
                    converter
                        .convert(part)
                        .map_err(|e| conversion_error::<T>(key, part, &raw.source_name, e))
                })
                .collect::<Result<Vec<T>>>()?;
            return Ok(Some(values));
        }

        let mut values = Vec::new();
        for index in 0usize.. {
            let indexed_key = format!("{}.{}", key, index);
            match self.find_raw(&indexed_key)? {
                Some(raw) => values.push(converter.convert(&raw.value).map_err(|e| {
                    conversion_error::<T>(&indexed_key, &raw.value, &raw.source_name, e)
                })?),
                None => break,
            }
        }

        if values.is_empty() {
            Ok(None)
        } else {
            debug!("Collected {} indexed values for '{}'", values.len(), key);
            Ok(Some(values))
        }
    }

    /// Raw value of `key` from the highest-priority source defining it.
    ///
    /// Lower-priority sources are not read once a value is found. A source
    /// read error stops the walk and is returned as
    /// [`ConfigError::SourceRead`].
    pub fn find_raw(&self, key: &str) -> Result<Option<RawValue>> {
        let ordered = self.sources.ordered();

        for source in ordered.iter() {
            trace!("Probing '{}' in source '{}'", key, source.name());
            match source.try_get(key) {
                Ok(Some(value)) => {
                    debug!("Resolved '{}' from source '{}'", key, source.name());
                    return Ok(Some(RawValue {
                        source_name: source.name().to_string(),
                        value,
                    }));
                }
                Ok(None) => continue,
                Err(e) => {
                    return Err(ConfigError::SourceRead {
                        source_name: source.name().to_string(),
                        key: key.to_string(),
                        source: e,
                    });
                }
            }
        }

        trace!("No source defines '{}'", key);
        Ok(None)
    }

    /// Sources in precedence order, highest first.
    pub fn config_sources(&self) -> Vec<Arc<dyn ConfigSource>> {
        self.sources.ordered().to_vec()
    }

    /// Union of the keys every source can enumerate.
    pub fn property_names(&self) -> BTreeSet<String> {
        self.sources
            .ordered()
            .iter()
            .flat_map(|source| source.property_names())
            .collect()
    }

    /// Register an additional source and rebuild the order.
    pub fn add_source(&self, source: Arc<dyn ConfigSource>) {
        self.sources.push(source);
    }

    /// Remove every source named `name`. Returns how many were removed.
    pub fn remove_source(&self, name: &str) -> usize {
        self.sources.remove(name)
    }

    /// Replace the source set.
    pub fn rebuild_sources(&self, sources: Vec<Arc<dyn ConfigSource>>) {
        self.sources.rebuild(sources);
    }

    /// Re-read source ordinals and re-sort the current set.
    pub fn refresh_sources(&self) {
        self.sources.refresh();
    }

    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Register a converter for `T`; see [`ConverterRegistry::register`].
    pub fn register_converter<T, F>(&self, priority: i32, converter: F) -> bool
    where
        T: Send + 'static,
        F: Fn(&str) -> ConvertResult<T> + Send + Sync + 'static,
    {
        self.converters.register(priority, converter)
    }

    fn converter<T: 'static>(&self) -> Result<ActiveConverter<T>> {
        self.converters
            .active::<T>()
            .ok_or(ConfigError::UnsupportedType {
                type_name: type_name::<T>(),
            })
    }
}

fn conversion_error<T>(key: &str, raw: &str, source_name: &str, error: ConvertError) -> ConfigError {
    ConfigError::Conversion {
        key: key.to_string(),
        raw: raw.to_string(),
        type_name: type_name::<T>(),
        source_name: source_name.to_string(),
        reason: error.to_string(),
    }
}
