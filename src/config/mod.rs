// src/config/mod.rs

//! Configuration for a run.
//!
//! Responsibilities:
//! - Define the TOML-backed data model and resolved settings (`model.rs`).
//! - Load an optional config file from disk (`loader.rs`).
//! - Parse host files and host strings (`hosts.rs`).
//! - Merge CLI and file values and validate them (`validate.rs`).

pub mod hosts;
pub mod loader;
pub mod model;
pub mod validate;

pub use hosts::{parse_host_entry, parse_host_lines, parse_host_string, read_host_file};
pub use loader::{load_from_path, load_optional};
pub use model::{DefaultsSection, RawConfigFile, Settings};
pub use validate::{parse_timeout, resolve_settings};
