// src/color.rs

//! Output decorations used by the line framer and the reporter.
//!
//! The palette is chosen once by the caller (terminal or not); the task code
//! only asks it to decorate fixed tokens.

use std::io::IsTerminal;

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const RED: &str = "\x1b[31m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Palette {
    #[default]
    Plain,
    Ansi,
}

impl Palette {
    /// Colour when stdout is a terminal, plain text otherwise.
    pub fn detect() -> Self {
        if std::io::stdout().is_terminal() {
            Palette::Ansi
        } else {
            Palette::Plain
        }
    }

    fn paint(self, codes: &[&str], text: &str) -> String {
        match self {
            Palette::Plain => text.to_string(),
            Palette::Ansi => format!("{}{}{}", codes.concat(), text, RESET),
        }
    }

    /// Arrow between host and line for stdout.
    pub fn out_arrow(self) -> String {
        self.paint(&[BOLD, GREEN], "->")
    }

    /// Arrow between host and line for stderr.
    pub fn err_arrow(self) -> String {
        self.paint(&[BOLD, RED], "=>")
    }

    /// Appended to a line that ended without a newline.
    pub fn unterminated_mark(self) -> String {
        self.paint(&[YELLOW], "\\")
    }

    pub fn progress(self, n: usize) -> String {
        match self {
            Palette::Plain => format!("[{n}]"),
            Palette::Ansi => format!("{CYAN}[{BOLD}{n}{RESET}{CYAN}]{RESET}"),
        }
    }

    pub fn success(self) -> String {
        self.paint(&[BOLD, GREEN], "[SUCCESS]")
    }

    pub fn failure(self) -> String {
        self.paint(&[BOLD, RED], "[FAILURE]")
    }

    pub fn error_text(self, text: &str) -> String {
        self.paint(&[BOLD, RED], text)
    }

    pub fn stderr_marker(self) -> String {
        self.paint(&[RED], "Stderr: ")
    }
}
