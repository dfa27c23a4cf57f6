// src/task/streams.rs

//! Single-attempt, non-blocking I/O on a task's pipes.
//!
//! Every function here performs at most one `read`/`write` and classifies
//! the result. An interrupted or would-block attempt is `Recoverable` and is
//! simply tried again on the next readiness event; anything else is `Fatal`
//! and ends that slot.

use std::fmt;
use std::io::{self, Read, Write};
use std::sync::Arc;

/// Upper bound on bytes moved per readiness event.
pub const CHUNK_SIZE: usize = 1 << 16;

#[derive(Debug)]
pub enum StreamError {
    Recoverable,
    Fatal(io::Error),
}

impl From<io::Error> for StreamError {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::Interrupted | io::ErrorKind::WouldBlock => StreamError::Recoverable,
            _ => StreamError::Fatal(err),
        }
    }
}

impl fmt::Display for StreamError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StreamError::Recoverable => f.write_str("interrupted"),
            StreamError::Fatal(err) => write!(f, "{err}"),
        }
    }
}

pub type StreamResult<T> = std::result::Result<T, StreamError>;

/// Feeds a fixed input buffer into a child's stdin, one chunk per call.
#[derive(Debug, Clone)]
pub struct InputFeeder {
    data: Arc<[u8]>,
    written: usize,
}

impl InputFeeder {
    pub fn new(data: Arc<[u8]>) -> Self {
        Self { data, written: 0 }
    }

    pub fn written(&self) -> usize {
        self.written
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn is_finished(&self) -> bool {
        self.written >= self.data.len()
    }

    /// Write the next unsent slice (at most [`CHUNK_SIZE`] bytes).
    ///
    /// Short writes are normal; the offset advances by what was accepted.
    pub fn feed<W: Write + ?Sized>(&mut self, sink: &mut W) -> StreamResult<usize> {
        if self.is_finished() {
            return Ok(0);
        }
        let end = (self.written + CHUNK_SIZE).min(self.data.len());
        let n = sink.write(&self.data[self.written..end])?;
        if n == 0 {
            return Err(StreamError::Fatal(io::Error::new(
                io::ErrorKind::WriteZero,
                "pipe accepted no bytes",
            )));
        }
        self.written += n;
        Ok(n)
    }
}

/// One read into `buf`; `Ok(0)` means end of stream.
pub fn read_chunk<R: Read + ?Sized>(source: &mut R, buf: &mut [u8]) -> StreamResult<usize> {
    Ok(source.read(buf)?)
}

/// Failure-list text for an I/O error.
pub fn describe_io_error(err: &io::Error, verbose: bool) -> String {
    if verbose {
        format!("Exception: {err:?}")
    } else {
        err.to_string()
    }
}
