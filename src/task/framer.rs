// src/task/framer.rs

//! Reassembles raw output chunks into whole, annotated lines.
//!
//! A child writes whatever it likes, whenever it likes; a single read can end
//! in the middle of a line. The framer keeps that unterminated tail per
//! `(descriptor, stream)` pair and glues it onto the next chunk, so lines
//! from different targets never get spliced together on the shared terminal.
//!
//! Every call produces at most one block of text, which the caller writes and
//! flushes in one go.

use std::collections::BTreeMap;
use std::io::{self, Write};
use std::os::unix::io::RawFd;

use crate::color::Palette;
use crate::types::StreamKind;

/// Identifies one pending-fragment buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FramerKey {
    pub fd: RawFd,
    pub kind: StreamKind,
}

impl FramerKey {
    pub fn new(fd: RawFd, kind: StreamKind) -> Self {
        Self { fd, kind }
    }
}

#[derive(Debug, Clone)]
pub struct LineFramer {
    name: String,
    annotate: bool,
    buffer_lines: bool,
    palette: Palette,
    pending: BTreeMap<FramerKey, Vec<u8>>,
}

impl LineFramer {
    pub fn new(name: impl Into<String>, annotate: bool, buffer_lines: bool) -> Self {
        Self {
            name: name.into(),
            annotate,
            buffer_lines,
            palette: Palette::Plain,
            pending: BTreeMap::new(),
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.palette = palette;
        self
    }

    /// Fragment currently held back for `key` (empty if none).
    pub fn pending(&self, key: FramerKey) -> &[u8] {
        self.pending.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Turn `chunk` (plus any held-back fragment) into printable text.
    ///
    /// Returns `None` when there is nothing to print yet. With
    /// `force_finish` the trailing fragment is always released, decorated
    /// with the unterminated mark if it had no newline.
    pub fn frame(&mut self, key: FramerKey, chunk: &[u8], force_finish: bool) -> Option<Vec<u8>> {
        let mut buf = self.pending.remove(&key).unwrap_or_default();
        buf.extend_from_slice(chunk);
        if buf.is_empty() {
            return None;
        }

        let mut unfinished = buf.last() != Some(&b'\n');
        let body = if unfinished {
            &buf[..]
        } else {
            &buf[..buf.len() - 1]
        };
        let mut lines: Vec<&[u8]> = body.split(|&b| b == b'\n').collect();

        if unfinished && self.buffer_lines && !force_finish {
            if let Some(tail) = lines.pop() {
                self.pending.insert(key, tail.to_vec());
            }
            unfinished = false;
        }

        if lines.is_empty() {
            return None;
        }

        let arrow = match key.kind {
            StreamKind::Out => self.palette.out_arrow(),
            StreamKind::Err => self.palette.err_arrow(),
        };

        let last = lines.len() - 1;
        let mut out = Vec::with_capacity(buf.len() + lines.len() * (self.name.len() + 8));
        for (idx, line) in lines.iter().enumerate() {
            if self.annotate {
                out.extend_from_slice(self.name.as_bytes());
                out.push(b' ');
                out.extend_from_slice(arrow.as_bytes());
                out.push(b' ');
            }
            out.extend_from_slice(line);
            if idx == last && unfinished && self.annotate {
                out.extend_from_slice(self.palette.unterminated_mark().as_bytes());
            }
            out.push(b'\n');
        }
        Some(out)
    }

    /// Frame `chunk` and, if anything came out, write it to `sink` and flush.
    pub fn emit<W: Write + ?Sized>(
        &mut self,
        key: FramerKey,
        chunk: &[u8],
        force_finish: bool,
        sink: &mut W,
    ) -> io::Result<()> {
        if let Some(text) = self.frame(key, chunk, force_finish) {
            sink.write_all(&text)?;
            sink.flush()?;
        }
        Ok(())
    }
}
