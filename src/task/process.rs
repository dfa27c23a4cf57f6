// src/task/process.rs

//! OS process plumbing for a task: environment, detached spawn, group kill.

use std::collections::BTreeMap;
use std::io;
use std::os::unix::io::RawFd;
use std::os::unix::process::{CommandExt, ExitStatusExt};
use std::process::{Child, Command, ExitStatus, Stdio};

use crate::errors::{PsshError, Result};

/// Value forced into `DISPLAY` when unset: ssh skips `SSH_ASKPASS` otherwise.
pub const DISPLAY_FALLBACK: &str = "pssh-gibberish";

/// Inputs for the variables a child sees on top of the inherited environment.
#[derive(Debug, Clone)]
pub struct ChildEnv<'a> {
    pub nodenum: usize,
    pub host: &'a str,
    pub askpass_path: &'a str,
    pub askpass_socket: Option<&'a str>,
    pub verbose: bool,
    pub display_is_set: bool,
}

impl ChildEnv<'_> {
    pub fn build(&self) -> BTreeMap<String, String> {
        let mut env = BTreeMap::new();
        env.insert("PSSH_NODENUM".to_string(), self.nodenum.to_string());
        env.insert("PSSH_HOST".to_string(), self.host.to_string());
        env.insert("SSH_ASKPASS".to_string(), self.askpass_path.to_string());
        if let Some(socket) = self.askpass_socket {
            env.insert("PSSH_ASKPASS_SOCKET".to_string(), socket.to_string());
        }
        if self.verbose {
            env.insert("PSSH_ASKPASS_VERBOSE".to_string(), "1".to_string());
        }
        if !self.display_is_set {
            env.insert("DISPLAY".to_string(), DISPLAY_FALLBACK.to_string());
        }
        env
    }
}

/// Spawn `argv` with piped stdio in a new session, so it has no controlling
/// terminal and leads its own process group.
pub fn spawn_detached(argv: &[String], env: &BTreeMap<String, String>) -> Result<Child> {
    let (program, args) = argv
        .split_first()
        .ok_or_else(|| PsshError::ConfigError("empty command line".to_string()))?;

    let mut cmd = Command::new(program);
    cmd.args(args)
        .envs(env)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // SAFETY: only calls the async-signal-safe `setsid` between fork and exec.
    unsafe {
        cmd.pre_exec(|| {
            if libc::setsid() == -1 {
                return Err(io::Error::last_os_error());
            }
            Ok(())
        });
    }

    cmd.spawn().map_err(|source| PsshError::Spawn {
        program: program.clone(),
        source,
    })
}

pub fn set_nonblocking(fd: RawFd) -> io::Result<()> {
    let flags = unsafe { libc::fcntl(fd, libc::F_GETFL) };
    if flags < 0 {
        return Err(io::Error::last_os_error());
    }
    let ret = unsafe { libc::fcntl(fd, libc::F_SETFL, flags | libc::O_NONBLOCK) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// SIGKILL every process in the group led by `pid`.
pub fn kill_group(pid: u32) -> io::Result<()> {
    let pgid = pid as libc::pid_t;
    let ret = unsafe { libc::kill(-pgid, libc::SIGKILL) };
    if ret < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}

/// Exit code with signal deaths reported as the negated signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    match status.code() {
        Some(code) => code,
        None => -status.signal().unwrap_or(libc::SIGKILL),
    }
}
