// src/task/report.rs

//! Final per-target report.
//!
//! Order matters here: the status line goes to stderr, then captured stdout,
//! then the `Stderr: ` marker and captured stderr, both on stdout. Every write
//! is followed by a flush so the two independently buffered sinks cannot
//! reorder each other when they share a terminal.

use std::io::{self, Write};

use chrono::Local;

use crate::color::Palette;
use crate::task::console::Console;

/// Everything the reporter needs to know about one finished task.
#[derive(Debug, Clone, Copy)]
pub struct ReportInput<'a> {
    pub sequence: usize,
    pub timestamp: &'a str,
    pub name: &'a str,
    pub failures: &'a [String],
    pub output: &'a [u8],
    pub errors: &'a [u8],
}

/// `[n] HH:MM:SS [SUCCESS] name` or `[n] HH:MM:SS [FAILURE] name reasons`.
pub fn status_line(input: &ReportInput<'_>, palette: Palette) -> String {
    let progress = palette.progress(input.sequence);
    if input.failures.is_empty() {
        format!(
            "{progress} {} {} {}",
            input.timestamp,
            palette.success(),
            input.name
        )
    } else {
        let error = palette.error_text(&input.failures.join(", "));
        format!(
            "{progress} {} {} {} {error}",
            input.timestamp,
            palette.failure(),
            input.name
        )
    }
}

pub fn write_report(console: &mut Console, input: &ReportInput<'_>, palette: Palette) -> io::Result<()> {
    let line = status_line(input, palette);
    {
        let err = console.err();
        err.write_all(line.as_bytes())?;
        err.write_all(b"\n")?;
        err.flush()?;
    }

    let out = console.out();
    if !input.output.is_empty() {
        out.flush()?;
        out.write_all(input.output)?;
        out.flush()?;
    }
    if !input.errors.is_empty() {
        out.write_all(palette.stderr_marker().as_bytes())?;
        out.flush()?;
        out.write_all(input.errors)?;
        out.flush()?;
    }
    Ok(())
}

/// Local wall-clock time as `HH:MM:SS`.
pub fn local_timestamp() -> String {
    Local::now().format("%H:%M:%S").to_string()
}
