pub mod builders;
pub mod capture;
pub mod fakes;

use std::sync::Once;
use std::time::{Duration, Instant};

use pssh::reactor::PollReactor;
use pssh::task::Task;
use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 10-second timeout.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(10), f)
        .await
        .expect("Test timed out after 10 seconds")
}

/// Pump readiness events into a single started task until it stops running.
///
/// Returns false if `limit` elapsed first.
pub fn drive(task: &mut Task, reactor: &mut PollReactor, limit: Duration) -> bool {
    let deadline = Instant::now() + limit;
    while task.running() {
        if Instant::now() >= deadline {
            return false;
        }
        let events = reactor
            .poll(Duration::from_millis(20))
            .expect("poll failed");
        for event in events {
            task.handle(event, reactor);
        }
    }
    true
}
