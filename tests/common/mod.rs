#![allow(dead_code)]

pub use pssh_test_utils::builders::TaskBuilder;
pub use pssh_test_utils::capture::{SharedBuffer, capture_console};
pub use pssh_test_utils::fakes::{RecordingReactor, RecordingWriter, WriterCall};
pub use pssh_test_utils::{drive, init_tracing};

use pssh::askpass::DefaultAskpass;
use pssh::reactor::Reactor;
use pssh::task::{StartContext, Task};

/// Askpass helper that is never actually run by the local test commands.
pub fn test_askpass() -> DefaultAskpass {
    DefaultAskpass::new("/bin/false")
}

/// Start `task` with no output writer.
pub fn start(task: &mut Task, nodenum: usize, reactor: &mut dyn Reactor) {
    let askpass = test_askpass();
    task.start(
        nodenum,
        reactor,
        StartContext {
            writer: None,
            askpass: &askpass,
            askpass_socket: None,
        },
    );
}
