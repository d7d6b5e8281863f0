//! Configuration loading and discovery for `porter.toml`
//!
//! Provides functions to find, load, and override configuration.

use super::schema::PorterConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name of the project configuration file
pub const CONFIG_FILE: &str = "porter.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// TOML parsing error
    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Serialize overlapping watch invocations of the same task
    pub exclusive: Option<bool>,
}

/// A loaded configuration together with the project root it applies to.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: PorterConfig,
    /// Directory all configured relative paths resolve against
    pub root: PathBuf,
    /// The file the config came from, if any
    pub source: Option<PathBuf>,
}

/// Find porter.toml by walking up from the current working directory.
pub fn find_config() -> Option<PathBuf> {
    env::current_dir().ok().and_then(find_config_from)
}

/// Find porter.toml by walking up from a specific directory.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE);
        if config_path.is_file() {
            return Some(config_path);
        }

        if !current.pop() {
            return None;
        }
    }
}

/// Load configuration and determine the project root.
///
/// Resolution order:
/// 1. An explicit `config` path; its directory is the root unless `root` is given.
/// 2. `root/porter.toml` when `root` is given.
/// 3. The nearest porter.toml above the current directory.
/// 4. Defaults, rooted at `root` or the current directory.
pub fn load_project(config: Option<&Path>, root: Option<&Path>) -> Result<LoadedConfig, ConfigError> {
    let config_path = match (config, root) {
        (Some(path), _) => Some(path.to_path_buf()),
        (None, Some(root)) => Some(root.join(CONFIG_FILE)).filter(|p| p.is_file()),
        (None, None) => find_config(),
    };

    let root = match (root, &config_path) {
        (Some(root), _) => root.to_path_buf(),
        (None, Some(path)) => path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| env::current_dir().unwrap_or_default()),
        (None, None) => env::current_dir().map_err(|source| ConfigError::Io {
            path: PathBuf::from("."),
            source,
        })?,
    };

    let config = match &config_path {
        Some(path) => load_config_file(path)?,
        None => PorterConfig::default(),
    };

    Ok(LoadedConfig { config, root, source: config_path })
}

/// Load configuration from a specific file path.
pub fn load_config_file(path: &Path) -> Result<PorterConfig, ConfigError> {
    let contents = fs::read_to_string(path)
        .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
    let config: PorterConfig = toml::from_str(&contents)
        .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;

    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors.into_iter().map(|e| e.to_string()).collect()));
    }

    Ok(config)
}

/// Merge CLI overrides into a config.
pub fn merge_cli_overrides(config: &mut PorterConfig, overrides: &CliOverrides) {
    if let Some(exclusive) = overrides.exclusive {
        config.watch.exclusive = exclusive;
    }
}
