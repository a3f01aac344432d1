use std::path::PathBuf;
use thiserror::Error;

/// Error type accepted from source reads and converter callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Error, Debug)]
pub enum ConfigError {
    /// No source defines the key.
    #[error("No configuration value found for key '{key}'")]
    NotFound { key: String },

    /// A value was found but its converter declined or failed on it.
    #[error("Cannot convert value '{raw}' of key '{key}' (from source '{source_name}') to {type_name}: {reason}")]
    Conversion {
        key: String,
        raw: String,
        type_name: &'static str,
        source_name: String,
        reason: String,
    },

    /// Nobody registered a converter for the requested type.
    #[error("No converter registered for type {type_name}")]
    UnsupportedType { type_name: &'static str },

    #[error("Source '{source_name}' failed to read key '{key}': {source}")]
    SourceRead {
        source_name: String,
        key: String,
        #[source]
        source: BoxError,
    },

    #[error("IO error reading {path}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// Outcome of a failed conversion, before key and source context is attached.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("no converter registered for {0}")]
    Unsupported(&'static str),

    #[error("converter declined the value")]
    Declined,

    #[error("{0}")]
    Failed(#[source] BoxError),
}

impl ConfigError {
    /// True for the strict-lookup absence failure.
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, ConfigError>;
