// src/task/mod.rs

//! Per-target task supervisor.
//!
//! A [`Task`] owns one child process and its three pipes. It is driven
//! entirely from outside:
//! - the driver calls [`Task::start`], then feeds it readiness events through
//!   [`Task::handle`] until [`Task::running`] returns false;
//! - timeouts and Ctrl-C arrive as [`Task::timedout`] / [`Task::interrupted`];
//! - [`Task::report`] prints the outcome at the end.
//!
//! Nothing in here blocks: each event results in at most one read or write.
//! Every problem is appended to the task's failure list instead of being
//! returned.
//!
//! - [`framer`] turns output chunks into annotated lines.
//! - [`streams`] holds the single-attempt I/O helpers and the stdin feeder.
//! - [`process`] spawns the child and kills its process group.
//! - [`report`] renders the final status line.

pub mod console;
pub mod framer;
pub mod options;
pub mod process;
pub mod report;
pub mod streams;

use std::os::unix::io::{AsRawFd, RawFd};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, error, info, trace, warn};

use crate::askpass::AskpassProvider;
use crate::color::Palette;
use crate::errors::Result;
use crate::reactor::{Reactor, Readiness, Token};
use crate::types::{Slot, StreamKind, Target};
use crate::writer::{FileHandle, OutputWriter};

pub use console::Console;
pub use framer::{FramerKey, LineFramer};
pub use options::TaskOptions;
pub use process::{ChildEnv, DISPLAY_FALLBACK};
pub use streams::{CHUNK_SIZE, InputFeeder, StreamError};

pub const TIMED_OUT: &str = "Timed out";
pub const INTERRUPTED: &str = "Interrupted";
pub const CANCELLED: &str = "Cancelled";

/// Everything `start` needs from the outside world besides the reactor.
#[derive(Clone, Copy)]
pub struct StartContext<'a> {
    pub writer: Option<&'a Arc<dyn OutputWriter>>,
    pub askpass: &'a dyn AskpassProvider,
    pub askpass_socket: Option<&'a str>,
}

#[derive(Debug)]
pub struct Task {
    target: Target,
    name: String,
    argv: Vec<String>,
    options: TaskOptions,
    palette: Palette,
    console: Console,
    framer: LineFramer,

    nodenum: usize,
    child: Option<Child>,
    pid: Option<u32>,
    stdin: Option<ChildStdin>,
    stdout: Option<ChildStdout>,
    stderr: Option<ChildStderr>,
    input: Option<InputFeeder>,
    scratch: Vec<u8>,

    writer: Option<Arc<dyn OutputWriter>>,
    out_file: Option<FileHandle>,
    err_file: Option<FileHandle>,

    output_buffer: Vec<u8>,
    error_buffer: Vec<u8>,
    failures: Vec<String>,
    killed: bool,
    exit_status: Option<i32>,
    started_at: Option<Instant>,
}

impl Task {
    /// `argv` is the full local command line (usually the ssh invocation).
    /// `input`, if non-empty, is fed to the child's stdin.
    pub fn new(target: Target, argv: Vec<String>, options: TaskOptions, input: Option<Arc<[u8]>>) -> Self {
        let name = target.display_name(options.default_user.as_deref());
        let framer = LineFramer::new(name.clone(), options.annotate_lines, options.buffer_lines);
        Self {
            target,
            name,
            argv,
            options,
            palette: Palette::Plain,
            console: Console::stdio(),
            framer,
            nodenum: 0,
            child: None,
            pid: None,
            stdin: None,
            stdout: None,
            stderr: None,
            input: input.filter(|data| !data.is_empty()).map(InputFeeder::new),
            scratch: Vec::new(),
            writer: None,
            out_file: None,
            err_file: None,
            output_buffer: Vec::new(),
            error_buffer: Vec::new(),
            failures: Vec::new(),
            killed: false,
            exit_status: None,
            started_at: None,
        }
    }

    pub fn with_console(mut self, console: Console) -> Self {
        self.console = console;
        self
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self.framer = LineFramer::new(
            self.name.clone(),
            self.options.annotate_lines,
            self.options.buffer_lines,
        )
        .with_palette(palette);
        self
    }

    pub fn target(&self) -> &Target {
        &self.target
    }

    pub fn display_name(&self) -> &str {
        &self.name
    }

    pub fn argv(&self) -> &[String] {
        &self.argv
    }

    pub fn nodenum(&self) -> usize {
        self.nodenum
    }

    pub fn pid(&self) -> Option<u32> {
        self.pid
    }

    pub fn failures(&self) -> &[String] {
        &self.failures
    }

    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn is_killed(&self) -> bool {
        self.killed
    }

    pub fn is_started(&self) -> bool {
        self.started_at.is_some()
    }

    pub fn exit_status(&self) -> Option<i32> {
        self.exit_status
    }

    pub fn bytes_written(&self) -> usize {
        self.input.as_ref().map_or(0, InputFeeder::written)
    }

    pub fn output_buffer(&self) -> &[u8] {
        &self.output_buffer
    }

    pub fn error_buffer(&self) -> &[u8] {
        &self.error_buffer
    }

    /// Whether `slot` still has an open, registered descriptor.
    pub fn is_open(&self, slot: Slot) -> bool {
        match slot {
            Slot::Stdin => self.stdin.is_some(),
            Slot::Stdout => self.stdout.is_some(),
            Slot::Stderr => self.stderr.is_some(),
        }
    }

    /// Wall-clock time since `start`; `None` if the task never started.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at.map(|t| t.elapsed())
    }

    /// Spawn the child and register its pipes with `reactor`.
    ///
    /// `nodenum` is exported to the child and is also the task id carried in
    /// every [`Token`] this task registers. Failures are recorded, not
    /// returned; a task that failed to start is simply not running.
    pub fn start(&mut self, nodenum: usize, reactor: &mut dyn Reactor, ctx: StartContext<'_>) {
        if self.started_at.is_some() {
            warn!(host = %self.name, nodenum, "task already started; ignoring");
            return;
        }
        self.nodenum = nodenum;
        self.started_at = Some(Instant::now());

        if let Err(err) = self.start_inner(reactor, ctx) {
            error!(host = %self.name, nodenum, error = %err, "task failed to start");
            self.failures.push(err.to_string());
            self.abort(reactor);
        }
    }

    fn start_inner(&mut self, reactor: &mut dyn Reactor, ctx: StartContext<'_>) -> Result<()> {
        if let Some(writer) = ctx.writer {
            let (out_file, err_file) = writer.open_files(&self.name);
            self.out_file = out_file;
            self.err_file = err_file;
            self.writer = Some(Arc::clone(writer));
        }

        let askpass_path = ctx.askpass.executable_path();
        let env = ChildEnv {
            nodenum: self.nodenum,
            host: &self.target.host,
            askpass_path: &askpass_path,
            askpass_socket: ctx.askpass_socket,
            verbose: self.options.verbose,
            display_is_set: std::env::var_os("DISPLAY").is_some(),
        }
        .build();

        info!(host = %self.name, nodenum = self.nodenum, argv = ?self.argv, "starting task process");
        let mut child = process::spawn_detached(&self.argv, &env)?;
        self.pid = Some(child.id());
        let stdin = child.stdin.take();
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        self.child = Some(child);
        self.scratch = vec![0u8; CHUNK_SIZE];

        if let Some(stdin) = stdin {
            if self.input.is_some() {
                let fd = stdin.as_raw_fd();
                self.stdin = Some(stdin);
                process::set_nonblocking(fd)?;
                reactor.register_write(fd, Token::new(self.nodenum, Slot::Stdin))?;
            }
            // Without input the pipe is dropped here, closing the child's stdin.
        }
        if let Some(stdout) = stdout {
            let fd = stdout.as_raw_fd();
            self.stdout = Some(stdout);
            process::set_nonblocking(fd)?;
            reactor.register_read(fd, Token::new(self.nodenum, Slot::Stdout))?;
        }
        if let Some(stderr) = stderr {
            let fd = stderr.as_raw_fd();
            self.stderr = Some(stderr);
            process::set_nonblocking(fd)?;
            reactor.register_read(fd, Token::new(self.nodenum, Slot::Stderr))?;
        }

        Ok(())
    }

    /// Tear down after a failed start: close every slot and make sure a
    /// half-started child does not linger.
    fn abort(&mut self, reactor: &mut dyn Reactor) {
        self.close_stdin(reactor);
        self.close_stdout(reactor);
        self.close_stderr(reactor);
        if self.child.is_some() {
            self.kill();
        }
    }

    /// Dispatch one readiness event. Stale events (slot already closed, or a
    /// descriptor that no longer matches) are ignored.
    pub fn handle(&mut self, event: Readiness, reactor: &mut dyn Reactor) {
        match event.token.slot {
            Slot::Stdin => self.handle_stdin(event.fd, reactor),
            Slot::Stdout => self.handle_output(StreamKind::Out, event.fd, reactor),
            Slot::Stderr => self.handle_output(StreamKind::Err, event.fd, reactor),
        }
    }

    fn handle_stdin(&mut self, fd: RawFd, reactor: &mut dyn Reactor) {
        let Some(stdin) = self.stdin.as_mut() else {
            return;
        };
        if stdin.as_raw_fd() != fd {
            return;
        }
        let Some(feeder) = self.input.as_mut() else {
            self.close_stdin(reactor);
            return;
        };

        match feeder.feed(stdin) {
            Ok(n) => {
                trace!(host = %self.name, fd, bytes = n, total = feeder.written(), "wrote stdin chunk");
                if feeder.is_finished() {
                    self.close_stdin(reactor);
                }
            }
            Err(StreamError::Recoverable) => {}
            Err(StreamError::Fatal(err)) => {
                self.close_stdin(reactor);
                self.record_io_failure(Slot::Stdin, &err);
            }
        }
    }

    fn handle_output(&mut self, kind: StreamKind, fd: RawFd, reactor: &mut dyn Reactor) {
        let mut scratch = std::mem::take(&mut self.scratch);
        if scratch.len() < CHUNK_SIZE {
            scratch.resize(CHUNK_SIZE, 0);
        }

        let result = match kind {
            StreamKind::Out => match self.stdout.as_mut() {
                Some(pipe) if pipe.as_raw_fd() == fd => Some(streams::read_chunk(pipe, &mut scratch)),
                _ => None,
            },
            StreamKind::Err => match self.stderr.as_mut() {
                Some(pipe) if pipe.as_raw_fd() == fd => Some(streams::read_chunk(pipe, &mut scratch)),
                _ => None,
            },
        };

        match result {
            None => {}
            Some(Ok(0)) => {
                self.print_lines(FramerKey::new(fd, kind), &[], true);
                self.close_output(kind, reactor);
            }
            Some(Ok(n)) => self.consume(kind, fd, &scratch[..n]),
            Some(Err(StreamError::Recoverable)) => {}
            Some(Err(StreamError::Fatal(err))) => {
                self.print_lines(FramerKey::new(fd, kind), &[], true);
                self.close_output(kind, reactor);
                let slot = match kind {
                    StreamKind::Out => Slot::Stdout,
                    StreamKind::Err => Slot::Stderr,
                };
                self.record_io_failure(slot, &err);
            }
        }

        self.scratch = scratch;
    }

    fn consume(&mut self, kind: StreamKind, fd: RawFd, chunk: &[u8]) {
        trace!(host = %self.name, fd, ?kind, bytes = chunk.len(), "read output chunk");
        let (capture, file) = match kind {
            StreamKind::Out => (self.options.captures_stdout(), self.out_file),
            StreamKind::Err => (self.options.captures_stderr(), self.err_file),
        };
        if capture {
            match kind {
                StreamKind::Out => self.output_buffer.extend_from_slice(chunk),
                StreamKind::Err => self.error_buffer.extend_from_slice(chunk),
            }
        }
        if let (Some(writer), Some(handle)) = (self.writer.as_ref(), file) {
            writer.write(handle, chunk);
        }
        self.print_lines(FramerKey::new(fd, kind), chunk, false);
    }

    fn print_lines(&mut self, key: FramerKey, chunk: &[u8], force_finish: bool) {
        if !self.options.print_out {
            return;
        }
        let sink = self.console.for_kind(key.kind);
        if let Err(err) = self.framer.emit(key, chunk, force_finish, sink) {
            warn!(host = %self.name, error = %err, "failed to print output lines");
        }
    }

    fn close_output(&mut self, kind: StreamKind, reactor: &mut dyn Reactor) {
        match kind {
            StreamKind::Out => self.close_stdout(reactor),
            StreamKind::Err => self.close_stderr(reactor),
        }
    }

    fn close_stdin(&mut self, reactor: &mut dyn Reactor) {
        if let Some(stdin) = self.stdin.take() {
            reactor.unregister(stdin.as_raw_fd());
            debug!(
                host = %self.name,
                written = self.bytes_written(),
                total = self.input.as_ref().map_or(0, InputFeeder::len),
                "closed stdin"
            );
        }
    }

    fn close_stdout(&mut self, reactor: &mut dyn Reactor) {
        if let Some(stdout) = self.stdout.take() {
            reactor.unregister(stdout.as_raw_fd());
            debug!(host = %self.name, "closed stdout");
        }
        if let Some(handle) = self.out_file.take() {
            if let Some(writer) = self.writer.as_ref() {
                writer.close(handle);
            }
        }
    }

    fn close_stderr(&mut self, reactor: &mut dyn Reactor) {
        if let Some(stderr) = self.stderr.take() {
            reactor.unregister(stderr.as_raw_fd());
            debug!(host = %self.name, "closed stderr");
        }
        if let Some(handle) = self.err_file.take() {
            if let Some(writer) = self.writer.as_ref() {
                writer.close(handle);
            }
        }
    }

    fn record_io_failure(&mut self, slot: Slot, err: &std::io::Error) {
        warn!(host = %self.name, %slot, error = %err, "I/O error on task pipe");
        self.failures
            .push(streams::describe_io_error(err, self.options.verbose));
    }

    /// Poll for completion.
    ///
    /// True while any pipe is still open. Once all are closed the exit
    /// status is collected; non-zero exits add a failure entry.
    pub fn running(&mut self) -> bool {
        if self.stdin.is_some() || self.stdout.is_some() || self.stderr.is_some() {
            return true;
        }
        let Some(child) = self.child.as_mut() else {
            return false;
        };

        match child.try_wait() {
            Ok(None) => {
                if self.killed {
                    // What waiting would report for a SIGKILLed child.
                    self.exit_status = Some(-libc::SIGKILL);
                    self.child = None;
                    false
                } else {
                    true
                }
            }
            Ok(Some(status)) => {
                let code = process::exit_code(status);
                self.exit_status = Some(code);
                // A kill we sent already recorded its reason; no extra signal entry.
                if code < 0 && !self.killed {
                    self.failures.push(format!("Killed by signal {}", -code));
                } else if code > 0 {
                    self.failures.push(format!("Exited with error code {code}"));
                }
                debug!(host = %self.name, exit_status = code, "task process finished");
                self.child = None;
                false
            }
            Err(err) => {
                warn!(host = %self.name, error = %err, "cannot collect exit status");
                self.failures
                    .push(streams::describe_io_error(&err, self.options.verbose));
                self.child = None;
                false
            }
        }
    }

    /// Kill the process group and record a timeout. No-op once killed.
    pub fn timedout(&mut self) {
        self.kill_with_reason(TIMED_OUT);
    }

    /// Kill the process group and record an interrupt. No-op once killed.
    pub fn interrupted(&mut self) {
        self.kill_with_reason(INTERRUPTED);
    }

    /// Mark a task that never started as cancelled.
    pub fn cancel(&mut self) {
        self.failures.push(CANCELLED.to_string());
    }

    fn kill_with_reason(&mut self, reason: &str) {
        if self.killed {
            return;
        }
        self.kill();
        self.failures.push(reason.to_string());
    }

    fn kill(&mut self) {
        if let (Some(pid), Some(_)) = (self.pid, self.child.as_ref()) {
            info!(host = %self.name, pid, "killing task process group");
            if let Err(err) = process::kill_group(pid) {
                // Already gone.
                debug!(host = %self.name, pid, error = %err, "kill failed");
            }
        }
        self.killed = true;
    }

    /// Print the status line and any captured output. `sequence` is the
    /// position of this task in completion order.
    pub fn report(&mut self, sequence: usize) {
        let timestamp = report::local_timestamp();
        self.report_at(sequence, &timestamp);
    }

    pub fn report_at(&mut self, sequence: usize, timestamp: &str) {
        let input = report::ReportInput {
            sequence,
            timestamp,
            name: &self.name,
            failures: &self.failures,
            output: &self.output_buffer,
            errors: &self.error_buffer,
        };
        if let Err(err) = report::write_report(&mut self.console, &input, self.palette) {
            warn!(host = %self.name, error = %err, "failed to print report");
        }
    }
}
