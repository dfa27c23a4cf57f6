// src/engine/mod.rs

//! Batch driver for per-host tasks.
//!
//! This module ties together:
//! - the poll reactor every task registers its pipes with
//! - the parallelism limit and the per-task timeout
//! - Ctrl-C handling (kill running tasks, cancel the queue)
//! - the run summary that decides the process exit code
//!
//! The blocking loop lives in [`runtime`]; exit-code aggregation is the pure
//! part in [`summary`].

use std::time::Duration;

use crate::config::model::DEFAULT_PARALLELISM;

pub mod runtime;
pub mod summary;

pub use runtime::{DEFAULT_TICK, Engine};
pub use summary::{RunSummary, TRANSPORT_ERROR_STATUS, TaskOutcome};

/// Knobs for one [`Engine`] run.
#[derive(Debug, Clone)]
pub struct EngineOptions {
    /// Maximum number of tasks running at once. Must be at least 1.
    pub parallelism: usize,
    /// Kill a task once it has been running this long.
    pub timeout: Option<Duration>,
    /// Passed to children as `PSSH_ASKPASS_SOCKET` when set.
    pub askpass_socket: Option<String>,
    /// Upper bound on a single reactor wait.
    pub tick: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            parallelism: DEFAULT_PARALLELISM,
            timeout: None,
            askpass_socket: None,
            tick: DEFAULT_TICK,
        }
    }
}
