//! Process environment source
//!
//! Keys are matched against the environment in three steps:
//! 1. Exact name (`app.port`)
//! 2. Non-alphanumerics replaced by `_` (`app_port`)
//! 3. The same, uppercased (`APP_PORT`)
//!
//! A `config_ordinal` (or `CONFIG_ORDINAL`) variable sets the ordinal.

use crate::source::{ordinal_from_key, ConfigSource, CONFIG_ORDINAL};
use crate::types::BoxError;
use std::env::{self, VarError};

/// Ordinal of the environment source unless overridden.
pub const ENV_ORDINAL: i32 = 300;

pub struct EnvSource {
    name: String,
    ordinal: Option<i32>,
}

impl EnvSource {
    pub fn new() -> Self {
        Self {
            name: "environment".to_string(),
            ordinal: None,
        }
    }

    /// Pin the ordinal. Takes precedence over a `config_ordinal` variable.
    pub fn with_ordinal(mut self, ordinal: i32) -> Self {
        self.ordinal = Some(ordinal);
        self
    }

    fn read(name: &str) -> Result<Option<String>, BoxError> {
        match env::var(name) {
            Ok(value) => Ok(Some(value)),
            Err(VarError::NotPresent) => Ok(None),
            Err(e @ VarError::NotUnicode(_)) => Err(Box::new(e)),
        }
    }
}

impl Default for EnvSource {
    fn default() -> Self {
        Self::new()
    }
}

fn sanitize(key: &str) -> String {
    key.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, BoxError> {
        if let Some(value) = Self::read(key)? {
            return Ok(Some(value));
        }

        let sanitized = sanitize(key);
        if sanitized != key {
            if let Some(value) = Self::read(&sanitized)? {
                return Ok(Some(value));
            }
        }

        let upper = sanitized.to_uppercase();
        if upper != sanitized {
            return Self::read(&upper);
        }

        Ok(None)
    }

    fn ordinal(&self) -> i32 {
        match self.ordinal {
            Some(ordinal) => ordinal,
            None => ordinal_from_key(&self.name, self.try_get(CONFIG_ORDINAL), ENV_ORDINAL),
        }
    }

    fn property_names(&self) -> Vec<String> {
        env::vars_os()
            .filter_map(|(k, _)| k.into_string().ok())
            .collect()
    }
}
