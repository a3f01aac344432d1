//! Assembly of a [`Config`] from sources and converters

use crate::config::{loader, Config};
use crate::convert::{ConvertResult, ConverterRegistry};
use crate::source::{ConfigSource, EnvSource};
use crate::types::Result;
use std::sync::Arc;
use tracing::info;

pub struct ConfigBuilder {
    sources: Vec<Arc<dyn ConfigSource>>,
    converters: ConverterRegistry,
    env: bool,
    discover: bool,
}

impl ConfigBuilder {
    /// Builder with the built-in converters and no sources.
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
            converters: ConverterRegistry::with_builtins(),
            env: false,
            discover: false,
        }
    }

    pub fn with_source<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Arc::new(source));
        self
    }

    /// Register a source the caller keeps a handle to, e.g. to mutate it.
    pub fn with_shared_source(mut self, source: Arc<dyn ConfigSource>) -> Self {
        self.sources.push(source);
        self
    }

    pub fn with_sources<I>(mut self, sources: I) -> Self
    where
        I: IntoIterator<Item = Arc<dyn ConfigSource>>,
    {
        self.sources.extend(sources);
        self
    }

    pub fn with_converter<T, F>(self, priority: i32, converter: F) -> Self
    where
        T: Send + 'static,
        F: Fn(&str) -> ConvertResult<T> + Send + Sync + 'static,
    {
        self.converters.register(priority, converter);
        self
    }

    /// Start from an empty converter registry instead of the built-ins.
    pub fn without_builtin_converters(mut self) -> Self {
        self.converters = ConverterRegistry::new();
        self
    }

    /// Add the process environment as a source.
    pub fn with_default_sources(mut self) -> Self {
        self.env = true;
        self
    }

    /// Add every discovered config file as a source at build time.
    pub fn with_discovered_files(mut self) -> Self {
        self.discover = true;
        self
    }

    pub fn build(self) -> Result<Config> {
        let mut sources = self.sources;

        if self.env {
            sources.push(Arc::new(EnvSource::new()));
        }
        if self.discover {
            sources.extend(loader::discovered_sources()?);
        }

        info!(
            "Building configuration with {} sources and {} converters",
            sources.len(),
            self.converters.len()
        );
        Ok(Config::new(sources, self.converters))
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
