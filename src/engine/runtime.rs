// src/engine/runtime.rs

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::askpass::AskpassProvider;
use crate::errors::Result;
use crate::reactor::{PollReactor, Reactor};
use crate::task::{StartContext, Task};
use crate::writer::OutputWriter;

use super::EngineOptions;
use super::summary::{RunSummary, TaskOutcome};

/// Drives a batch of tasks to completion on the current thread.
///
/// Each loop iteration:
/// 1. reacts to a pending interrupt (kill running, cancel queued);
/// 2. starts queued tasks up to the parallelism limit;
/// 3. polls the reactor for one tick and dispatches readiness to tasks;
/// 4. times out tasks that ran too long;
/// 5. reports tasks that are no longer running.
pub struct Engine {
    options: EngineOptions,
    reactor: PollReactor,
    writer: Option<Arc<dyn OutputWriter>>,
    askpass: Box<dyn AskpassProvider>,
    interrupt: Arc<AtomicBool>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("options", &self.options)
            .field("reactor", &self.reactor)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(
        options: EngineOptions,
        writer: Option<Arc<dyn OutputWriter>>,
        askpass: Box<dyn AskpassProvider>,
    ) -> Self {
        Self {
            options,
            reactor: PollReactor::new(),
            writer,
            askpass,
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Flag that, once set, makes the run kill running tasks and cancel the
    /// rest at the next tick.
    pub fn interrupt_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.interrupt)
    }

    /// Run `tasks` until every one of them has been reported.
    ///
    /// Only a failing `poll` aborts the run; running tasks are killed first.
    pub fn run(&mut self, mut tasks: Vec<Task>) -> Result<RunSummary> {
        info!(tasks = tasks.len(), par = self.options.parallelism, "engine started");

        let mut queued: VecDeque<usize> = (0..tasks.len()).collect();
        let mut running: Vec<usize> = Vec::new();
        let mut summary = RunSummary::default();
        let mut interrupted = false;

        loop {
            if !interrupted && self.interrupt.load(Ordering::SeqCst) {
                interrupted = true;
                warn!(running = running.len(), queued = queued.len(), "interrupted");
                for &idx in &running {
                    tasks[idx].interrupted();
                }
                while let Some(idx) = queued.pop_front() {
                    tasks[idx].cancel();
                    self.finish(&mut tasks[idx], &mut summary);
                }
            }

            while running.len() < self.options.parallelism.max(1) {
                let Some(idx) = queued.pop_front() else {
                    break;
                };
                let ctx = StartContext {
                    writer: self.writer.as_ref(),
                    askpass: self.askpass.as_ref(),
                    askpass_socket: self.options.askpass_socket.as_deref(),
                };
                tasks[idx].start(idx, &mut self.reactor, ctx);
                running.push(idx);
            }

            if running.is_empty() && queued.is_empty() {
                break;
            }

            let events = match self.reactor.poll(self.options.tick) {
                Ok(events) => events,
                Err(err) => {
                    error!(error = %err, "reactor poll failed; killing running tasks");
                    for &idx in &running {
                        tasks[idx].interrupted();
                    }
                    return Err(err.into());
                }
            };
            for event in events {
                match tasks.get_mut(event.token.task) {
                    Some(task) => task.handle(event, &mut self.reactor),
                    None => {
                        debug!(fd = event.fd, "readiness for unknown task; dropping registration");
                        self.reactor.unregister(event.fd);
                    }
                }
            }

            if let Some(limit) = self.options.timeout {
                for &idx in &running {
                    if tasks[idx].elapsed().is_some_and(|e| e >= limit) {
                        tasks[idx].timedout();
                    }
                }
            }

            let mut still_running = Vec::with_capacity(running.len());
            for idx in running.drain(..) {
                if tasks[idx].running() {
                    still_running.push(idx);
                } else {
                    self.finish(&mut tasks[idx], &mut summary);
                }
            }
            running = still_running;
        }

        info!(
            succeeded = summary.succeeded(),
            failed = summary.failed(),
            "engine finished"
        );
        Ok(summary)
    }

    fn finish(&self, task: &mut Task, summary: &mut RunSummary) {
        let sequence = summary.outcomes.len() + 1;
        task.report(sequence);
        debug!(
            host = %task.display_name(),
            sequence,
            exit_status = ?task.exit_status(),
            "task reported"
        );
        summary.push(TaskOutcome::from_task(task));
    }
}

/// Default polling tick; bounds how late a timeout or Ctrl-C is noticed.
pub const DEFAULT_TICK: Duration = Duration::from_millis(100);
