// src/config/model.rs

use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::task::TaskOptions;
use crate::transport::Transport;
use crate::types::Target;

pub const DEFAULT_PARALLELISM: usize = 32;

/// Optional configuration file as read from TOML.
///
/// ```toml
/// [defaults]
/// user = "deploy"
/// par = 16
/// timeout = "30s"
/// outdir = "out"
/// ssh_options = ["StrictHostKeyChecking=no"]
/// annotate_lines = true
/// ```
///
/// Every key is optional; command-line flags win over the file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawConfigFile {
    #[serde(default)]
    pub defaults: DefaultsSection,
}

/// `[defaults]` section.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultsSection {
    /// Default login user.
    #[serde(default)]
    pub user: Option<String>,

    /// Maximum number of concurrent transport processes.
    #[serde(default)]
    pub par: Option<usize>,

    /// Per-target timeout as a duration string (`"30s"`, `"2m"`); `"0"`
    /// disables it.
    #[serde(default)]
    pub timeout: Option<String>,

    #[serde(default)]
    pub outdir: Option<PathBuf>,

    #[serde(default)]
    pub errdir: Option<PathBuf>,

    /// Transport binary.
    #[serde(default)]
    pub ssh: Option<String>,

    /// `-o` options given to every transport invocation.
    #[serde(default)]
    pub ssh_options: Vec<String>,

    /// Extra transport arguments.
    #[serde(default)]
    pub extra_args: Vec<String>,

    #[serde(default)]
    pub hosts_files: Vec<PathBuf>,

    #[serde(default)]
    pub print: Option<bool>,

    #[serde(default)]
    pub inline: Option<bool>,

    #[serde(default)]
    pub inline_stdout: Option<bool>,

    #[serde(default)]
    pub annotate_lines: Option<bool>,

    #[serde(default)]
    pub buffer_lines: Option<bool>,

    #[serde(default)]
    pub verbose: Option<bool>,
}

/// Fully resolved settings for one run.
///
/// Built from CLI + config file by [`crate::config::resolve_settings`];
/// everything downstream only ever sees this.
#[derive(Debug, Clone)]
pub struct Settings {
    pub targets: Vec<Target>,
    pub command: String,
    pub parallelism: usize,
    pub timeout: Option<Duration>,
    pub outdir: Option<PathBuf>,
    pub errdir: Option<PathBuf>,
    pub transport: Transport,
    pub task_options: TaskOptions,
    pub send_input: bool,
}
