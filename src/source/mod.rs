//! Configuration sources
//!
//! A source is a named, externally owned key/value view with a priority
//! ordinal. Sources are read live on every lookup: the engine keeps a shared
//! handle, never a copy of their contents.

mod env;
mod index;
mod map;
mod toml_file;

pub use env::{EnvSource, ENV_ORDINAL};
pub use index::{OrderedSources, SourceIndex};
pub use map::MapSource;
pub use toml_file::TomlFileSource;

use crate::types::BoxError;
use tracing::warn;

/// Reserved key a source may define to override its ordinal.
pub const CONFIG_ORDINAL: &str = "config_ordinal";

/// Ordinal used when a source does not define one.
pub const DEFAULT_ORDINAL: i32 = 100;

/// Uniform read contract for a key/value provider.
///
/// Implementations must be safe to call from several threads at once and
/// must reflect the current state of their store on every `try_get`.
pub trait ConfigSource: Send + Sync {
    /// Diagnostic name. Not required to be unique.
    fn name(&self) -> &str;

    /// Current value of `key`, `Ok(None)` when the key is not defined.
    ///
    /// An `Err` means the store could not be read; it is never treated as
    /// absence.
    fn try_get(&self, key: &str) -> Result<Option<String>, BoxError>;

    /// Priority of this source; higher wins.
    ///
    /// The default reads [`CONFIG_ORDINAL`] from the source itself on every
    /// call and falls back to [`DEFAULT_ORDINAL`]. A failed read of that key
    /// is logged and the fallback used; it is not propagated, since ordinals
    /// are only read while rebuilding the source order.
    fn ordinal(&self) -> i32 {
        ordinal_from_key(self.name(), self.try_get(CONFIG_ORDINAL), DEFAULT_ORDINAL)
    }

    /// Keys this source can enumerate. Sources that cannot list their keys
    /// return an empty list.
    fn property_names(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Interpret the result of reading [`CONFIG_ORDINAL`] from a source.
pub(crate) fn ordinal_from_key(
    source_name: &str,
    raw: Result<Option<String>, BoxError>,
    fallback: i32,
) -> i32 {
    match raw {
        Ok(Some(value)) => match value.trim().parse::<i32>() {
            Ok(ordinal) => ordinal,
            Err(e) => {
                warn!(
                    "Ignoring invalid {} '{}' in source {}: {}",
                    CONFIG_ORDINAL, value, source_name, e
                );
                fallback
            }
        },
        Ok(None) => fallback,
        Err(e) => {
            warn!(
                "Failed to read {} from source {}: {}",
                CONFIG_ORDINAL, source_name, e
            );
            fallback
        }
    }
}
