//! TOML file source
//!
//! The file is flattened into dotted keys:
//! - nested tables become `server.http.port`
//! - arrays become indexed keys `hosts.0`, `hosts.1`, ...
//! - strings are stored unquoted, other scalars in their TOML text form

use crate::source::ConfigSource;
use crate::types::{BoxError, ConfigError};
use arc_swap::ArcSwap;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

/// Properties loaded from a TOML file.
///
/// Contents are a snapshot of the file taken at [`TomlFileSource::open`] and
/// refreshed on [`TomlFileSource::reload`]; lookups between reloads see the
/// last loaded snapshot.
pub struct TomlFileSource {
    name: String,
    path: PathBuf,
    values: ArcSwap<HashMap<String, String>>,
}

impl TomlFileSource {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        let values = Self::load(&path)?;
        info!("Loaded {} properties from {}", values.len(), path.display());

        Ok(Self {
            name: format!("file:{}", path.display()),
            path,
            values: ArcSwap::from_pointee(values),
        })
    }

    /// Parse TOML text directly. `name` is used for diagnostics only.
    pub fn parse_str(name: impl Into<String>, content: &str) -> Result<Self, ConfigError> {
        let name = name.into();
        let path = PathBuf::from(&name);
        let values = parse(&path, content)?;

        Ok(Self {
            name,
            path,
            values: ArcSwap::from_pointee(values),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Re-read the file and swap in its new contents.
    ///
    /// On error the previous contents stay in place.
    pub fn reload(&self) -> Result<(), ConfigError> {
        let values = Self::load(&self.path)?;
        debug!("Reloaded {} properties from {}", values.len(), self.path.display());
        self.values.store(Arc::new(values));
        Ok(())
    }

    fn load(path: &Path) -> Result<HashMap<String, String>, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
            path: path.to_path_buf(),
            error,
        })?;
        parse(path, &content)
    }
}

fn parse(path: &Path, content: &str) -> Result<HashMap<String, String>, ConfigError> {
    let table: toml::Table = content.parse().map_err(|e: toml::de::Error| ConfigError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let mut values = HashMap::new();
    for (key, value) in &table {
        flatten(key.clone(), value, &mut values);
    }
    Ok(values)
}

fn flatten(prefix: String, value: &toml::Value, out: &mut HashMap<String, String>) {
    match value {
        toml::Value::Table(table) => {
            for (key, value) in table {
                flatten(format!("{}.{}", prefix, key), value, out);
            }
        }
        toml::Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                flatten(format!("{}.{}", prefix, i), item, out);
            }
        }
        toml::Value::String(s) => {
            out.insert(prefix, s.clone());
        }
        other => {
            out.insert(prefix, other.to_string());
        }
    }
}

impl ConfigSource for TomlFileSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn try_get(&self, key: &str) -> Result<Option<String>, BoxError> {
        Ok(self.values.load().get(key).cloned())
    }

    fn property_names(&self) -> Vec<String> {
        self.values.load().keys().cloned().collect()
    }
}
