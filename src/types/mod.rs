//! Shared error types

mod errors;

pub use errors::{BoxError, ConfigError, ConvertError, Result};
