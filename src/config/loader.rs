// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::RawConfigFile;
use crate::errors::Result;

/// Environment variable naming a config file when `--config` is not given.
pub const CONFIG_ENV: &str = "PSSH_CONFIG";

/// Load a configuration file from a given path.
///
/// This only performs TOML deserialization; merging with the command line
/// and validation happen in [`crate::config::resolve_settings`].
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawConfigFile> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;

    let config: RawConfigFile = toml::from_str(&contents)?;

    Ok(config)
}

/// Load the config file if one was asked for.
///
/// - An explicit path must exist.
/// - Otherwise `PSSH_CONFIG` is consulted.
/// - With neither, an empty config is returned.
pub fn load_optional(explicit: Option<&Path>) -> Result<RawConfigFile> {
    match explicit.map(Path::to_path_buf).or_else(default_config_path) {
        Some(path) => load_from_path(path),
        None => Ok(RawConfigFile::default()),
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    std::env::var_os(CONFIG_ENV)
        .filter(|p| !p.is_empty())
        .map(PathBuf::from)
}
