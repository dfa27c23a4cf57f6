// src/transport.rs

//! Builds the local command line that reaches one target.

use crate::types::Target;

pub const DEFAULT_SSH: &str = "ssh";

/// How to invoke the remote-execution transport.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transport {
    /// Transport binary, `ssh` unless configured otherwise.
    pub program: String,
    /// Extra `-o` options, passed through verbatim.
    pub ssh_options: Vec<String>,
    /// Extra arguments inserted before the remote command.
    pub extra_args: Vec<String>,
    /// Login user for targets that do not name one.
    pub default_user: Option<String>,
}

impl Default for Transport {
    fn default() -> Self {
        Self {
            program: DEFAULT_SSH.to_string(),
            ssh_options: Vec::new(),
            extra_args: Vec::new(),
            default_user: None,
        }
    }
}

impl Transport {
    /// `ssh host -o NumberOfPasswordPrompts=1 -o SendEnv=... [-o opt]...
    /// [-l user] [-p port] [extra]... command`
    pub fn command_for(&self, target: &Target, command: &str) -> Vec<String> {
        let mut argv = vec![
            self.program.clone(),
            target.host.clone(),
            "-o".to_string(),
            "NumberOfPasswordPrompts=1".to_string(),
            "-o".to_string(),
            "SendEnv=PSSH_NODENUM PSSH_HOST".to_string(),
        ];
        for opt in &self.ssh_options {
            argv.push("-o".to_string());
            argv.push(opt.clone());
        }
        if let Some(user) = target.user.as_ref().or(self.default_user.as_ref()) {
            argv.push("-l".to_string());
            argv.push(user.clone());
        }
        if let Some(port) = target.port {
            argv.push("-p".to_string());
            argv.push(port.to_string());
        }
        argv.extend(self.extra_args.iter().cloned());
        if !command.is_empty() {
            argv.push(command.to_string());
        }
        argv
    }
}
