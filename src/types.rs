// src/types.rs

use std::fmt;

/// Which of a child's output streams a chunk of bytes came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StreamKind {
    Out,
    Err,
}

/// One of the three descriptors a task owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    Stdin,
    Stdout,
    Stderr,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::Stdin => "stdin",
            Slot::Stdout => "stdout",
            Slot::Stderr => "stderr",
        };
        f.write_str(name)
    }
}

/// A remote endpoint the command runs against.
///
/// `user` is only set when the host entry named one explicitly; otherwise the
/// transport falls back to the default login user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub host: String,
    pub port: Option<u16>,
    pub user: Option<String>,
}

impl Target {
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: None,
            user: None,
        }
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }

    /// Name used in annotations, reports and output file names.
    ///
    /// - `user@` is only prefixed when the user differs from `default_user`.
    /// - `:port` is only appended when a port was given.
    pub fn display_name(&self, default_user: Option<&str>) -> String {
        let mut name = String::new();
        if let Some(user) = self.user.as_deref() {
            if Some(user) != default_user {
                name.push_str(user);
                name.push('@');
            }
        }
        if self.host.contains(':') && self.port.is_some() {
            name.push('[');
            name.push_str(&self.host);
            name.push(']');
        } else {
            name.push_str(&self.host);
        }
        if let Some(port) = self.port {
            name.push(':');
            name.push_str(&port.to_string());
        }
        name
    }
}
