// tests/config_resolve.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use pssh::cli::CliArgs;
use pssh::config::{RawConfigFile, load_from_path, load_optional, parse_timeout, resolve_settings};
use pssh::config::model::DEFAULT_PARALLELISM;
use pssh::errors::PsshError;
use pssh::types::Target;

type TestResult = Result<(), Box<dyn Error>>;

fn args(hosts: &str, command: &[&str]) -> CliArgs {
    CliArgs {
        host_strings: vec![hosts.to_string()],
        command: command.iter().map(|s| s.to_string()).collect(),
        ..CliArgs::default()
    }
}

#[test]
fn defaults_apply_when_nothing_is_configured() -> TestResult {
    init_tracing();
    let settings = resolve_settings(&args("a b:2222", &["uptime"]), RawConfigFile::default())?;

    assert_eq!(
        settings.targets,
        vec![Target::new("a"), Target::new("b").with_port(2222)]
    );
    assert_eq!(settings.command, "uptime");
    assert_eq!(settings.parallelism, DEFAULT_PARALLELISM);
    assert_eq!(settings.timeout, None);
    assert_eq!(settings.transport.program, "ssh");
    assert!(settings.task_options.annotate_lines);
    assert!(settings.task_options.buffer_lines);
    assert!(!settings.task_options.print_out);
    assert!(!settings.send_input);
    Ok(())
}

#[test]
fn command_words_are_joined() -> TestResult {
    init_tracing();
    let settings = resolve_settings(&args("a", &["echo", "hello", "world"]), RawConfigFile::default())?;
    assert_eq!(settings.command, "echo hello world");
    Ok(())
}

#[test]
fn missing_command_hosts_or_parallelism_are_errors() {
    init_tracing();
    let err = resolve_settings(&args("a", &[]), RawConfigFile::default()).unwrap_err();
    assert!(matches!(err, PsshError::ConfigError(_)), "{err}");

    let no_hosts = CliArgs {
        command: vec!["true".to_string()],
        ..CliArgs::default()
    };
    let err = resolve_settings(&no_hosts, RawConfigFile::default()).unwrap_err();
    assert!(err.to_string().contains("no hosts"), "{err}");

    let zero_par = CliArgs {
        par: Some(0),
        ..args("a", &["true"])
    };
    let err = resolve_settings(&zero_par, RawConfigFile::default()).unwrap_err();
    assert!(err.to_string().contains("parallelism"), "{err}");

    let bad_timeout = CliArgs {
        timeout: Some("soon".to_string()),
        ..args("a", &["true"])
    };
    assert!(resolve_settings(&bad_timeout, RawConfigFile::default()).is_err());
}

#[test]
fn config_file_fills_in_and_cli_wins() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let hosts = dir.path().join("hosts");
    fs::write(&hosts, "web1\nweb2\n")?;
    let config = dir.path().join("pssh.toml");
    fs::write(
        &config,
        format!(
            r#"
[defaults]
user = "deploy"
par = 4
timeout = "2m"
print = true
ssh_options = ["StrictHostKeyChecking=no"]
hosts_files = [{:?}]
"#,
            hosts.display().to_string()
        ),
    )?;

    let raw = load_from_path(&config)?;
    let cli = CliArgs {
        par: Some(8),
        ssh_options: vec!["ConnectTimeout=5".to_string()],
        command: vec!["uptime".to_string()],
        ..CliArgs::default()
    };
    let settings = resolve_settings(&cli, raw)?;

    assert_eq!(settings.targets.len(), 2);
    assert_eq!(settings.parallelism, 8);
    assert_eq!(settings.timeout, Some(Duration::from_secs(120)));
    assert!(settings.task_options.print_out);
    assert_eq!(settings.task_options.default_user.as_deref(), Some("deploy"));
    assert_eq!(settings.transport.default_user.as_deref(), Some("deploy"));
    assert_eq!(
        settings.transport.ssh_options,
        vec!["StrictHostKeyChecking=no", "ConnectTimeout=5"]
    );
    Ok(())
}

#[test]
fn negative_flags_override_file_defaults() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("pssh.toml");
    fs::write(&config, "[defaults]\nannotate_lines = true\nbuffer_lines = false\n")?;

    let cli = CliArgs {
        no_annotate_lines: true,
        ..args("a", &["true"])
    };
    let settings = resolve_settings(&cli, load_from_path(&config)?)?;
    assert!(!settings.task_options.annotate_lines);
    assert!(!settings.task_options.buffer_lines);
    Ok(())
}

#[test]
fn extra_args_are_split_on_whitespace() -> TestResult {
    init_tracing();
    let cli = CliArgs {
        extra_args: vec!["-A  -q".to_string()],
        extra_arg: vec!["-o Foo=bar".to_string()],
        ..args("a", &["true"])
    };
    let settings = resolve_settings(&cli, RawConfigFile::default())?;
    assert_eq!(settings.transport.extra_args, vec!["-A", "-q", "-o Foo=bar"]);
    Ok(())
}

#[test]
fn unknown_config_keys_are_rejected() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let config = dir.path().join("pssh.toml");
    fs::write(&config, "[defaults]\nparallel = 3\n")?;

    let err = load_from_path(&config).unwrap_err();
    assert!(matches!(err, PsshError::TomlError(_)), "{err}");
    Ok(())
}

#[test]
fn explicit_config_path_must_exist() {
    init_tracing();
    let missing = PathBuf::from("/nonexistent/pssh.toml");
    assert!(load_optional(Some(missing.as_path())).is_err());
}

#[test]
fn timeouts_parse_with_units() {
    init_tracing();
    assert_eq!(parse_timeout("0"), Ok(None));
    assert_eq!(parse_timeout("30"), Ok(Some(Duration::from_secs(30))));
    assert_eq!(parse_timeout("500ms"), Ok(Some(Duration::from_millis(500))));
    assert_eq!(parse_timeout("2m"), Ok(Some(Duration::from_secs(120))));
    assert_eq!(parse_timeout("1h"), Ok(Some(Duration::from_secs(3600))));
    assert_eq!(parse_timeout(" 5s "), Ok(Some(Duration::from_secs(5))));

    for bad in ["", "abc", "5d", "-1"] {
        assert!(parse_timeout(bad).is_err(), "accepted {bad:?}");
    }
}

#[test]
fn oversized_timeouts_are_errors_not_panics() {
    init_tracing();
    for huge in ["9999999999999999999h", "9999999999999999999m"] {
        let err = parse_timeout(huge).unwrap_err();
        assert!(err.contains("too large"), "{err}");
    }
    assert!(parse_timeout("99999999999999999999").is_err());

    let cli = CliArgs {
        timeout: Some("9999999999999999999h".to_string()),
        ..args("a", &["true"])
    };
    let err = resolve_settings(&cli, RawConfigFile::default()).unwrap_err();
    assert!(matches!(err, PsshError::ConfigError(_)), "{err}");
}
