#![allow(dead_code)]

use std::sync::Arc;

use pssh::task::{Console, TaskOptions, Task};
use pssh::types::Target;

/// Builder for `Task` running a local `sh -c` script instead of ssh.
pub struct TaskBuilder {
    target: Target,
    script: String,
    options: TaskOptions,
    input: Option<Arc<[u8]>>,
    console: Option<Console>,
}

impl TaskBuilder {
    pub fn new(host: &str, script: &str) -> Self {
        Self {
            target: Target::new(host),
            script: script.to_string(),
            options: TaskOptions::default(),
            input: None,
            console: None,
        }
    }

    pub fn target(mut self, target: Target) -> Self {
        self.target = target;
        self
    }

    pub fn print(mut self, val: bool) -> Self {
        self.options.print_out = val;
        self
    }

    pub fn inline(mut self, val: bool) -> Self {
        self.options.inline = val;
        self
    }

    pub fn inline_stdout(mut self, val: bool) -> Self {
        self.options.inline_stdout = val;
        self
    }

    pub fn annotate(mut self, val: bool) -> Self {
        self.options.annotate_lines = val;
        self
    }

    pub fn buffer_lines(mut self, val: bool) -> Self {
        self.options.buffer_lines = val;
        self
    }

    pub fn verbose(mut self, val: bool) -> Self {
        self.options.verbose = val;
        self
    }

    pub fn input(mut self, data: &[u8]) -> Self {
        self.input = Some(Arc::from(data));
        self
    }

    pub fn console(mut self, console: Console) -> Self {
        self.console = Some(console);
        self
    }

    pub fn argv(&self) -> Vec<String> {
        vec!["sh".to_string(), "-c".to_string(), self.script.clone()]
    }

    pub fn build(self) -> Task {
        let argv = self.argv();
        let task = Task::new(self.target, argv, self.options, self.input);
        match self.console {
            Some(console) => task.with_console(console),
            None => task,
        }
    }
}
