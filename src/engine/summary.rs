// src/engine/summary.rs

//! Pure aggregation of task outcomes into the process exit code.

use crate::task::Task;

/// ssh's own exit status for connection / transport errors.
pub const TRANSPORT_ERROR_STATUS: i32 = 255;

/// What the driver keeps about one finished task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskOutcome {
    pub nodenum: usize,
    pub name: String,
    pub exit_status: Option<i32>,
    pub failures: Vec<String>,
}

impl TaskOutcome {
    pub fn from_task(task: &Task) -> Self {
        Self {
            nodenum: task.nodenum(),
            name: task.display_name().to_string(),
            exit_status: task.exit_status(),
            failures: task.failures().to_vec(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.failures.is_empty()
    }

    /// Killed by a signal, or never produced an exit status at all
    /// (cancelled, failed to start).
    fn was_killed(&self) -> bool {
        match self.exit_status {
            Some(code) => code < 0,
            None => !self.succeeded(),
        }
    }
}

/// Outcomes in completion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub outcomes: Vec<TaskOutcome>,
}

impl RunSummary {
    pub fn push(&mut self, outcome: TaskOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn failed(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.succeeded()).count()
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.len() - self.failed()
    }

    /// Process exit code for the whole run.
    ///
    /// - `3`: some task was killed (timeout, interrupt, signal, cancel).
    /// - `4`: some transport reported a connection error (255).
    /// - `5`: some task failed otherwise.
    /// - `0`: everything succeeded.
    pub fn exit_code(&self) -> i32 {
        if self.outcomes.iter().any(TaskOutcome::was_killed) {
            3
        } else if self
            .outcomes
            .iter()
            .any(|o| o.exit_status == Some(TRANSPORT_ERROR_STATUS))
        {
            4
        } else if self.failed() > 0 {
            5
        } else {
            0
        }
    }
}
