// src/writer/mod.rs

//! Per-target output files.
//!
//! Tasks see only the [`OutputWriter`] trait: open a pair of files for a
//! target, append bytes, close. The production [`FileWriter`] does the actual
//! disk I/O on a background thread so the reactor thread never waits on it.

use std::fmt::Debug;

pub mod file;

pub use file::FileWriter;

/// Opaque reference to one open output file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FileHandle(pub u64);

pub trait OutputWriter: Send + Sync + Debug {
    /// Open the stdout and stderr files for `name`. Either side is `None`
    /// when that kind of output is not being saved.
    fn open_files(&self, name: &str) -> (Option<FileHandle>, Option<FileHandle>);
    fn write(&self, handle: FileHandle, data: &[u8]);
    fn close(&self, handle: FileHandle);
}
