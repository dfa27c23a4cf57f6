// src/reactor/poll.rs

//! `poll(2)`-backed reactor.
//!
//! Level-triggered: a descriptor that is still ready after its handler ran
//! is reported again on the next call, so handlers only ever need to make a
//! single attempt.

use std::collections::BTreeMap;
use std::io;
use std::os::unix::io::RawFd;
use std::time::Duration;

use tracing::trace;

use super::{Interest, Reactor, Readiness, Token};

#[derive(Debug, Default)]
pub struct PollReactor {
    registrations: BTreeMap<RawFd, (Interest, Token)>,
}

impl PollReactor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.registrations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    pub fn is_registered(&self, fd: RawFd) -> bool {
        self.registrations.contains_key(&fd)
    }

    /// Wait up to `timeout` for registered descriptors to become ready.
    ///
    /// Hang-ups and errors count as ready so the handler gets to observe the
    /// EOF or the error itself. A signal interrupting the wait yields an
    /// empty list. With nothing registered this just sleeps for `timeout`.
    pub fn poll(&mut self, timeout: Duration) -> io::Result<Vec<Readiness>> {
        if self.registrations.is_empty() {
            std::thread::sleep(timeout);
            return Ok(Vec::new());
        }

        let mut fds: Vec<libc::pollfd> = self
            .registrations
            .iter()
            .map(|(&fd, &(interest, _))| libc::pollfd {
                fd,
                events: match interest {
                    Interest::Read => libc::POLLIN,
                    Interest::Write => libc::POLLOUT,
                },
                revents: 0,
            })
            .collect();

        let timeout_ms = timeout.as_millis().min(i32::MAX as u128) as libc::c_int;
        let n = unsafe { libc::poll(fds.as_mut_ptr(), fds.len() as libc::nfds_t, timeout_ms) };
        if n < 0 {
            let err = io::Error::last_os_error();
            if err.kind() == io::ErrorKind::Interrupted {
                return Ok(Vec::new());
            }
            return Err(err);
        }

        let ready: Vec<Readiness> = fds
            .iter()
            .filter(|pfd| pfd.revents != 0)
            .filter_map(|pfd| {
                self.registrations
                    .get(&pfd.fd)
                    .map(|&(_, token)| Readiness { fd: pfd.fd, token })
            })
            .collect();

        trace!(registered = fds.len(), ready = ready.len(), "poll cycle");
        Ok(ready)
    }
}

impl Reactor for PollReactor {
    fn register_read(&mut self, fd: RawFd, token: Token) -> io::Result<()> {
        if fd < 0 {
            return Err(io::Error::from_raw_os_error(libc::EBADF));
        }
        self.registrations.insert(fd, (Interest::Read, token));
        Ok(())
    }

    fn register_write(&mut self, fd: RawFd, token: Token) -> io::Result<()> {
        if fd < 0 {
            return Err(io::Error::from_raw_os_error(libc::EBADF));
        }
        self.registrations.insert(fd, (Interest::Write, token));
        Ok(())
    }

    fn unregister(&mut self, fd: RawFd) {
        self.registrations.remove(&fd);
    }
}
