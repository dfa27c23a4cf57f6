// src/reactor/mod.rs

//! Readiness multiplexing seam between tasks and the driver.
//!
//! Tasks only ever *register* and *unregister* descriptors. Readiness comes
//! back to the driver as plain [`Readiness`] values, and the driver hands each
//! one to the owning task via `Task::handle`. No callbacks are stored and no
//! task state is reachable from the reactor.
//!
//! - [`poll`] is the production implementation on top of `poll(2)`.

use std::io;
use std::os::unix::io::RawFd;

use crate::types::Slot;

pub mod poll;

pub use poll::PollReactor;

/// Routes a readiness event back to the task and slot that registered it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Token {
    pub task: usize,
    pub slot: Slot,
}

impl Token {
    pub fn new(task: usize, slot: Slot) -> Self {
        Self { task, slot }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interest {
    Read,
    Write,
}

/// One "this descriptor is ready" notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Readiness {
    pub fd: RawFd,
    pub token: Token,
}

/// Registration side of a reactor, as seen by a task.
pub trait Reactor {
    fn register_read(&mut self, fd: RawFd, token: Token) -> io::Result<()>;
    fn register_write(&mut self, fd: RawFd, token: Token) -> io::Result<()>;
    /// Forget `fd`. Unknown descriptors are ignored.
    fn unregister(&mut self, fd: RawFd);
}
