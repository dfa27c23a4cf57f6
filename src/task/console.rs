// src/task/console.rs

use std::fmt;
use std::io::{self, Write};

use crate::types::StreamKind;

/// The pair of sinks a task prints to.
///
/// Production code uses the process's stdout/stderr; tests hand in capture
/// buffers.
pub struct Console {
    out: Box<dyn Write + Send>,
    err: Box<dyn Write + Send>,
}

impl Console {
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>) -> Self {
        Self { out, err }
    }

    pub fn stdio() -> Self {
        Self::new(Box::new(io::stdout()), Box::new(io::stderr()))
    }

    pub fn out(&mut self) -> &mut (dyn Write + Send) {
        self.out.as_mut()
    }

    pub fn err(&mut self) -> &mut (dyn Write + Send) {
        self.err.as_mut()
    }

    /// Sink that annotated lines of `kind` are printed to.
    pub fn for_kind(&mut self, kind: StreamKind) -> &mut (dyn Write + Send) {
        match kind {
            StreamKind::Out => self.out(),
            StreamKind::Err => self.err(),
        }
    }
}

impl Default for Console {
    fn default() -> Self {
        Self::stdio()
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console").finish_non_exhaustive()
    }
}
