//! Configuration engine
//!
//! [`Config`] answers typed lookups against a prioritized set of live
//! sources. [`ConfigBuilder`] assembles one; [`discover_config_files`]
//! finds the TOML files a default setup reads.

mod builder;
mod loader;
mod resolver;

pub use builder::ConfigBuilder;
pub use loader::{discover_config_files, discovered_sources, CONFIG_ENV_VAR, PROJECT_FILE};
pub use resolver::{Config, RawValue};
