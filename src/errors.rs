// src/errors.rs

//! Crate-wide error aliases and helpers.
//!
//! Per-task failures never surface here: a task records what went wrong in
//! its own failure list. These errors cover everything around the tasks
//! (configuration, host lists, driver setup).

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PsshError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Host list error: {0}")]
    HostParse(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to spawn '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PsshError>;
