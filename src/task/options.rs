// src/task/options.rs

/// Read-only flags a task consults while it runs.
///
/// Defaults: annotate and buffer lines, print nothing, capture nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOptions {
    /// Record full debug renderings of I/O errors and tell the askpass helper
    /// to be chatty.
    pub verbose: bool,
    /// Print each target's output as annotated lines while it arrives.
    pub print_out: bool,
    /// Capture stdout and stderr and print them after the status line.
    pub inline: bool,
    /// Capture stdout only and print it after the status line.
    pub inline_stdout: bool,
    /// Prefix printed lines with `<name> -> ` / `<name> => `.
    pub annotate_lines: bool,
    /// Hold back a trailing partial line until its newline arrives.
    pub buffer_lines: bool,
    /// Login user the transport uses when a host entry names none.
    pub default_user: Option<String>,
}

impl Default for TaskOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            print_out: false,
            inline: false,
            inline_stdout: false,
            annotate_lines: true,
            buffer_lines: true,
            default_user: None,
        }
    }
}

impl TaskOptions {
    pub(crate) fn captures_stdout(&self) -> bool {
        self.inline || self.inline_stdout
    }

    pub(crate) fn captures_stderr(&self) -> bool {
        self.inline
    }
}
