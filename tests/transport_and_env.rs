// tests/transport_and_env.rs

mod common;
use crate::common::init_tracing;

use pssh::task::{ChildEnv, DISPLAY_FALLBACK};
use pssh::transport::Transport;
use pssh::types::Target;

fn strs(v: &[String]) -> Vec<&str> {
    v.iter().map(String::as_str).collect()
}

#[test]
fn plain_target_gets_base_options_and_command() {
    init_tracing();
    let argv = Transport::default().command_for(&Target::new("web1"), "uptime");
    assert_eq!(
        strs(&argv),
        [
            "ssh",
            "web1",
            "-o",
            "NumberOfPasswordPrompts=1",
            "-o",
            "SendEnv=PSSH_NODENUM PSSH_HOST",
            "uptime",
        ]
    );
}

#[test]
fn options_user_port_and_extra_args_are_placed_before_command() {
    init_tracing();
    let transport = Transport {
        program: "/usr/bin/ssh".to_string(),
        ssh_options: vec!["StrictHostKeyChecking=no".to_string()],
        extra_args: vec!["-A".to_string()],
        default_user: Some("deploy".to_string()),
    };

    let argv = transport.command_for(&Target::new("web1").with_port(2222), "ls /");
    assert_eq!(
        strs(&argv),
        [
            "/usr/bin/ssh",
            "web1",
            "-o",
            "NumberOfPasswordPrompts=1",
            "-o",
            "SendEnv=PSSH_NODENUM PSSH_HOST",
            "-o",
            "StrictHostKeyChecking=no",
            "-l",
            "deploy",
            "-p",
            "2222",
            "-A",
            "ls /",
        ]
    );

    // A user named in the host entry wins over the default.
    let argv = transport.command_for(&Target::new("web2").with_user("root"), "true");
    let pos = argv.iter().position(|a| a == "-l").unwrap();
    assert_eq!(argv[pos + 1], "root");
}

#[test]
fn empty_command_is_not_appended() {
    init_tracing();
    let argv = Transport::default().command_for(&Target::new("web1"), "");
    assert_eq!(argv.last().map(String::as_str), Some("SendEnv=PSSH_NODENUM PSSH_HOST"));
}

#[test]
fn child_env_carries_node_identity_and_askpass() {
    init_tracing();
    let env = ChildEnv {
        nodenum: 3,
        host: "web1",
        askpass_path: "/usr/libexec/pssh-askpass",
        askpass_socket: None,
        verbose: false,
        display_is_set: true,
    }
    .build();

    assert_eq!(env["PSSH_NODENUM"], "3");
    assert_eq!(env["PSSH_HOST"], "web1");
    assert_eq!(env["SSH_ASKPASS"], "/usr/libexec/pssh-askpass");
    assert!(!env.contains_key("PSSH_ASKPASS_SOCKET"));
    assert!(!env.contains_key("PSSH_ASKPASS_VERBOSE"));
    assert!(!env.contains_key("DISPLAY"));
}

#[test]
fn child_env_sets_socket_verbosity_and_display_fallback() {
    init_tracing();
    let env = ChildEnv {
        nodenum: 0,
        host: "web1",
        askpass_path: "pssh-askpass",
        askpass_socket: Some("/tmp/pssh.sock"),
        verbose: true,
        display_is_set: false,
    }
    .build();

    assert_eq!(env["PSSH_ASKPASS_SOCKET"], "/tmp/pssh.sock");
    assert_eq!(env["PSSH_ASKPASS_VERBOSE"], "1");
    assert_eq!(env["DISPLAY"], DISPLAY_FALLBACK);
}
