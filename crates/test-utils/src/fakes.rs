use std::collections::BTreeMap;
use std::io;
use std::os::unix::io::RawFd;
use std::sync::Mutex;

use pssh::reactor::{Interest, Reactor, Token};
use pssh::writer::{FileHandle, OutputWriter};

/// Reactor that only remembers what was registered.
#[derive(Debug, Default)]
pub struct RecordingReactor {
    pub registered: BTreeMap<RawFd, (Interest, Token)>,
    pub unregistered: Vec<RawFd>,
}

impl RecordingReactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fd_for(&self, token: Token) -> Option<RawFd> {
        self.registered
            .iter()
            .find(|(_, (_, t))| *t == token)
            .map(|(&fd, _)| fd)
    }
}

impl Reactor for RecordingReactor {
    fn register_read(&mut self, fd: RawFd, token: Token) -> io::Result<()> {
        self.registered.insert(fd, (Interest::Read, token));
        Ok(())
    }

    fn register_write(&mut self, fd: RawFd, token: Token) -> io::Result<()> {
        self.registered.insert(fd, (Interest::Write, token));
        Ok(())
    }

    fn unregister(&mut self, fd: RawFd) {
        self.registered.remove(&fd);
        self.unregistered.push(fd);
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WriterCall {
    Open(String),
    Write(FileHandle, Vec<u8>),
    Close(FileHandle),
}

/// In-memory output writer: handle 1 is always stdout, handle 2 stderr.
#[derive(Debug, Default)]
pub struct RecordingWriter {
    pub calls: Mutex<Vec<WriterCall>>,
}

impl RecordingWriter {
    pub const OUT: FileHandle = FileHandle(1);
    pub const ERR: FileHandle = FileHandle(2);

    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> Vec<WriterCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Everything written to `handle`, concatenated.
    pub fn written(&self, handle: FileHandle) -> Vec<u8> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                WriterCall::Write(h, data) if h == handle => Some(data),
                _ => None,
            })
            .flatten()
            .collect()
    }

    pub fn closed(&self, handle: FileHandle) -> bool {
        self.calls().contains(&WriterCall::Close(handle))
    }
}

impl OutputWriter for RecordingWriter {
    fn open_files(&self, name: &str) -> (Option<FileHandle>, Option<FileHandle>) {
        self.calls
            .lock()
            .unwrap()
            .push(WriterCall::Open(name.to_string()));
        (Some(Self::OUT), Some(Self::ERR))
    }

    fn write(&self, handle: FileHandle, data: &[u8]) {
        self.calls
            .lock()
            .unwrap()
            .push(WriterCall::Write(handle, data.to_vec()));
    }

    fn close(&self, handle: FileHandle) {
        self.calls.lock().unwrap().push(WriterCall::Close(handle));
    }
}
