//! livecfg - live multi-source configuration resolution
//!
//! Typed lookups over an ordered set of named key/value sources. The source
//! with the highest ordinal that defines a key wins, its value is read at
//! lookup time, and a priority-ordered converter registry turns the raw
//! string into the requested type, including comma-separated lists.
//!
//! ```no_run
//! use livecfg::{ConfigBuilder, MapSource};
//!
//! let config = ConfigBuilder::new()
//!     .with_source(MapSource::new("app", [("server.port", "8080")]))
//!     .with_default_sources()
//!     .build()?;
//!
//! let port: u16 = config.get_value("server.port")?;
//! let hosts: Option<Vec<String>> = config.get_optional_values("server.hosts")?;
//! # Ok::<(), livecfg::ConfigError>(())
//! ```

pub mod config;
pub mod convert;
pub mod source;
pub mod types;

pub use config::{Config, ConfigBuilder, RawValue};
pub use convert::{ConvertResult, Converter, ConverterRegistry, TypeDescriptor};
pub use source::{ConfigSource, EnvSource, MapSource, TomlFileSource, CONFIG_ORDINAL, DEFAULT_ORDINAL};
pub use types::{BoxError, ConfigError, ConvertError, Result};
