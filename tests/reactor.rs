// tests/reactor.rs

mod common;
use crate::common::init_tracing;

use std::error::Error;
use std::io::Write;
use std::os::unix::io::AsRawFd;
use std::os::unix::net::UnixStream;
use std::time::{Duration, Instant};

use pssh::reactor::{PollReactor, Reactor, Readiness, Token};
use pssh::types::Slot;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn readable_descriptor_is_reported_with_its_token() -> TestResult {
    init_tracing();
    let (reader, mut writer) = UnixStream::pair()?;
    let mut reactor = PollReactor::new();
    let token = Token::new(2, Slot::Stdout);
    reactor.register_read(reader.as_raw_fd(), token)?;

    assert!(reactor.poll(Duration::from_millis(10))?.is_empty());

    writer.write_all(b"x")?;
    let ready = reactor.poll(Duration::from_secs(1))?;
    assert_eq!(
        ready,
        vec![Readiness {
            fd: reader.as_raw_fd(),
            token
        }]
    );
    Ok(())
}

#[test]
fn writable_descriptor_is_ready_at_once() -> TestResult {
    init_tracing();
    let (_reader, writer) = UnixStream::pair()?;
    let mut reactor = PollReactor::new();
    reactor.register_write(writer.as_raw_fd(), Token::new(0, Slot::Stdin))?;

    let ready = reactor.poll(Duration::from_secs(1))?;
    assert_eq!(ready.len(), 1);
    assert_eq!(ready[0].token.slot, Slot::Stdin);
    Ok(())
}

#[test]
fn hang_up_counts_as_readiness() -> TestResult {
    init_tracing();
    let (reader, writer) = UnixStream::pair()?;
    let mut reactor = PollReactor::new();
    reactor.register_read(reader.as_raw_fd(), Token::new(0, Slot::Stderr))?;
    drop(writer);

    assert_eq!(reactor.poll(Duration::from_secs(1))?.len(), 1);
    Ok(())
}

#[test]
fn unregister_forgets_descriptor() -> TestResult {
    init_tracing();
    let (reader, _writer) = UnixStream::pair()?;
    let fd = reader.as_raw_fd();
    let mut reactor = PollReactor::new();
    reactor.register_read(fd, Token::new(0, Slot::Stdout))?;
    assert!(reactor.is_registered(fd));
    assert_eq!(reactor.len(), 1);

    reactor.unregister(fd);
    reactor.unregister(fd);
    assert!(!reactor.is_registered(fd));
    assert!(reactor.is_empty());
    Ok(())
}

#[test]
fn invalid_descriptor_is_refused() {
    init_tracing();
    let mut reactor = PollReactor::new();
    assert!(reactor.register_read(-1, Token::new(0, Slot::Stdout)).is_err());
    assert!(reactor.register_write(-1, Token::new(0, Slot::Stdin)).is_err());
    assert!(reactor.is_empty());
}

#[test]
fn empty_reactor_waits_out_the_timeout() -> TestResult {
    init_tracing();
    let mut reactor = PollReactor::new();
    let started = Instant::now();
    assert!(reactor.poll(Duration::from_millis(30))?.is_empty());
    assert!(started.elapsed() >= Duration::from_millis(30));
    Ok(())
}
