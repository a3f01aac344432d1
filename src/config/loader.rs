//! Configuration file discovery
//!
//! Candidate files, highest precedence first:
//! 1. ./.livecfg.toml (project-specific)
//! 2. $LIVECFG_CONFIG (environment variable)
//! 3. ~/.config/livecfg/config.toml (user-global)

use crate::source::{ConfigSource, TomlFileSource};
use crate::types::ConfigError;
use std::ffi::OsString;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

/// Project-local file name.
pub const PROJECT_FILE: &str = ".livecfg.toml";

/// Environment variable naming an extra config file.
pub const CONFIG_ENV_VAR: &str = "LIVECFG_CONFIG";

/// Existing config files, highest precedence first.
pub fn discover_config_files() -> Vec<PathBuf> {
    let candidates = config_file_candidates(
        std::env::current_dir().ok(),
        std::env::var_os(CONFIG_ENV_VAR),
        dirs::config_dir(),
    );

    let found: Vec<PathBuf> = candidates.into_iter().filter(|p| p.is_file()).collect();
    if found.is_empty() {
        debug!("No config files found");
    }
    found
}

/// Open every discovered file as a source, in precedence order.
///
/// All files share the default ordinal unless they set `config_ordinal`, so
/// ties resolve in the order returned here.
pub fn discovered_sources() -> Result<Vec<Arc<dyn ConfigSource>>, ConfigError> {
    let mut sources: Vec<Arc<dyn ConfigSource>> = Vec::new();
    for path in discover_config_files() {
        debug!("Loading config file: {}", path.display());
        sources.push(Arc::new(TomlFileSource::open(&path)?));
    }
    Ok(sources)
}

fn config_file_candidates(
    cwd: Option<PathBuf>,
    env_path: Option<OsString>,
    config_dir: Option<PathBuf>,
) -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if let Some(cwd) = cwd {
        candidates.push(cwd.join(PROJECT_FILE));
    }

    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        candidates.push(PathBuf::from(path));
    }

    if let Some(config_dir) = config_dir {
        candidates.push(config_dir.join("livecfg").join("config.toml"));
    }

    candidates.dedup();
    candidates
}
