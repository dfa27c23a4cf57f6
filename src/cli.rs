// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! `-h` selects a host file, as in the classic tool, so help is `--help`
//! only.

use std::path::PathBuf;

use clap::{ArgAction, Parser, ValueEnum};

/// Command-line arguments for `pssh`.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "pssh",
    version,
    about = "Run a command on many hosts in parallel over ssh.",
    long_about = None,
    disable_help_flag = true
)]
pub struct CliArgs {
    /// Print help.
    #[arg(long, action = ArgAction::Help)]
    pub help: Option<bool>,

    /// Host file, one `[user@]host[:port]` per line (repeatable).
    #[arg(short = 'h', long = "hosts", value_name = "HOST_FILE")]
    pub hosts_files: Vec<PathBuf>,

    /// Additional host entries, space separated (repeatable).
    #[arg(short = 'H', long = "host", value_name = "HOST_STRING")]
    pub host_strings: Vec<String>,

    /// Default login user.
    #[arg(short = 'l', long, value_name = "USER")]
    pub user: Option<String>,

    /// Maximum number of parallel connections.
    #[arg(short = 'p', long = "par", value_name = "PAR")]
    pub par: Option<usize>,

    /// Per-host timeout (e.g. `30s`, `2m`; `0` means none).
    #[arg(short = 't', long, value_name = "TIMEOUT")]
    pub timeout: Option<String>,

    /// Save each host's stdout to a file in this directory.
    #[arg(short = 'o', long, value_name = "OUTDIR")]
    pub outdir: Option<PathBuf>,

    /// Save each host's stderr to a file in this directory.
    #[arg(short = 'e', long, value_name = "ERRDIR")]
    pub errdir: Option<PathBuf>,

    /// ssh `-o` option (repeatable).
    #[arg(short = 'O', long = "option", value_name = "OPTION")]
    pub ssh_options: Vec<String>,

    /// Extra ssh arguments, split on whitespace.
    #[arg(short = 'x', long = "extra-args", value_name = "ARGS", allow_hyphen_values = true)]
    pub extra_args: Vec<String>,

    /// Single extra ssh argument (repeatable).
    #[arg(short = 'X', long = "extra-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub extra_arg: Vec<String>,

    /// Transport binary to run instead of `ssh`.
    #[arg(long, value_name = "PROGRAM")]
    pub ssh: Option<String>,

    /// Verbose failure details.
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Print output as it arrives, prefixed with the host name.
    #[arg(short = 'P', long = "print")]
    pub print: bool,

    /// Print stdout and stderr for each host after it finishes.
    #[arg(short = 'i', long)]
    pub inline: bool,

    /// Print only stdout for each host after it finishes.
    #[arg(long)]
    pub inline_stdout: bool,

    /// Print lines without the host prefix.
    #[arg(long)]
    pub no_annotate_lines: bool,

    /// Print partial lines as soon as they arrive.
    #[arg(long)]
    pub no_buffer_lines: bool,

    /// Read stdin and send it to every host.
    #[arg(short = 'I', long)]
    pub send_input: bool,

    /// Optional TOML config file (defaults to `$PSSH_CONFIG`).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PSSH_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Command to run on every host.
    #[arg(value_name = "COMMAND", trailing_var_arg = true, allow_hyphen_values = true)]
    pub command: Vec<String>,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
