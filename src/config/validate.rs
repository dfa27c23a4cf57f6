// src/config/validate.rs

//! Merge command line and config file into [`Settings`].
//!
//! Precedence for every value: CLI flag, then `[defaults]` in the config
//! file, then the built-in default.

use std::time::Duration;

use crate::cli::CliArgs;
use crate::config::hosts::{parse_host_string, read_host_file};
use crate::config::model::{DEFAULT_PARALLELISM, RawConfigFile, Settings};
use crate::errors::{PsshError, Result};
use crate::task::TaskOptions;
use crate::transport::{DEFAULT_SSH, Transport};

pub fn resolve_settings(args: &CliArgs, raw: RawConfigFile) -> Result<Settings> {
    let defaults = raw.defaults;

    let command = args.command.join(" ");
    if command.trim().is_empty() {
        return Err(PsshError::ConfigError(
            "a command to run is required".to_string(),
        ));
    }

    let mut targets = Vec::new();
    let hosts_files = if args.hosts_files.is_empty() {
        &defaults.hosts_files
    } else {
        &args.hosts_files
    };
    for path in hosts_files {
        targets.extend(read_host_file(path)?);
    }
    for spec in &args.host_strings {
        targets.extend(parse_host_string(spec)?);
    }
    if targets.is_empty() {
        return Err(PsshError::ConfigError(
            "no hosts given; use -h HOST_FILE or -H HOST_STRING".to_string(),
        ));
    }

    let parallelism = args.par.or(defaults.par).unwrap_or(DEFAULT_PARALLELISM);
    if parallelism == 0 {
        return Err(PsshError::ConfigError(
            "parallelism must be >= 1 (got 0)".to_string(),
        ));
    }

    let timeout = match args.timeout.as_deref().or(defaults.timeout.as_deref()) {
        Some(s) => parse_timeout(s).map_err(PsshError::ConfigError)?,
        None => None,
    };

    let user = args.user.clone().or(defaults.user);

    let mut extra_args = defaults.extra_args;
    for chunk in &args.extra_args {
        extra_args.extend(chunk.split_whitespace().map(str::to_string));
    }
    extra_args.extend(args.extra_arg.iter().cloned());

    let mut ssh_options = defaults.ssh_options;
    ssh_options.extend(args.ssh_options.iter().cloned());

    let transport = Transport {
        program: args
            .ssh
            .clone()
            .or(defaults.ssh)
            .unwrap_or_else(|| DEFAULT_SSH.to_string()),
        ssh_options,
        extra_args,
        default_user: user.clone(),
    };

    let task_options = TaskOptions {
        verbose: args.verbose || defaults.verbose.unwrap_or(false),
        print_out: args.print || defaults.print.unwrap_or(false),
        inline: args.inline || defaults.inline.unwrap_or(false),
        inline_stdout: args.inline_stdout || defaults.inline_stdout.unwrap_or(false),
        annotate_lines: !args.no_annotate_lines && defaults.annotate_lines.unwrap_or(true),
        buffer_lines: !args.no_buffer_lines && defaults.buffer_lines.unwrap_or(true),
        default_user: user,
    };

    Ok(Settings {
        targets,
        command,
        parallelism,
        timeout,
        outdir: args.outdir.clone().or(defaults.outdir),
        errdir: args.errdir.clone().or(defaults.errdir),
        transport,
        task_options,
        send_input: args.send_input,
    })
}

/// `"0"` disables the timeout; otherwise a number with an optional unit
/// (`ms`, `s`, `m`, `h`; bare numbers are seconds).
pub fn parse_timeout(s: &str) -> std::result::Result<Option<Duration>, String> {
    let duration = parse_duration(s)?;
    if duration.is_zero() {
        Ok(None)
    } else {
        Ok(Some(duration))
    }
}

fn parse_duration(s: &str) -> std::result::Result<Duration, String> {
    let s = s.trim();
    if s.is_empty() {
        return Err("empty duration string".to_string());
    }

    // Find the boundary between digits and suffix.
    let idx = s
        .chars()
        .position(|c| !c.is_ascii_digit())
        .unwrap_or(s.len());

    let (num_part, unit_part) = s.split_at(idx);
    let value: u64 = num_part
        .parse()
        .map_err(|e| format!("invalid duration number '{}': {}", num_part, e))?;
    let unit = unit_part.trim().to_lowercase();

    let secs = |factor: u64| {
        value
            .checked_mul(factor)
            .map(Duration::from_secs)
            .ok_or_else(|| format!("duration too large: '{}'", s))
    };

    match unit.as_str() {
        "ms" => Ok(Duration::from_millis(value)),
        "" | "s" => Ok(Duration::from_secs(value)),
        "m" => secs(60),
        "h" => secs(60 * 60),
        _ => Err(format!(
            "unsupported duration unit '{}'; expected ms, s, m, or h",
            unit
        )),
    }
}
