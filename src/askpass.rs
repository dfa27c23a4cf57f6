// src/askpass.rs

//! Location of the password-prompt helper handed to ssh via `SSH_ASKPASS`.

use std::path::PathBuf;

/// Environment variable that overrides the helper location.
pub const ASKPASS_ENV: &str = "PSSH_ASKPASS";

/// Name of the helper binary looked up next to the running executable.
pub const ASKPASS_BINARY: &str = "pssh-askpass";

pub trait AskpassProvider: Send + Sync {
    fn executable_path(&self) -> String;
}

/// Fixed helper path, resolved once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultAskpass {
    path: String,
}

impl DefaultAskpass {
    pub fn new(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    /// `PSSH_ASKPASS` if set, else `pssh-askpass` beside the current binary,
    /// else the bare name (left to `PATH`).
    pub fn locate() -> Self {
        if let Some(path) = std::env::var_os(ASKPASS_ENV).filter(|p| !p.is_empty()) {
            return Self::new(path.to_string_lossy());
        }
        let sibling = std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(ASKPASS_BINARY)))
            .unwrap_or_else(|| PathBuf::from(ASKPASS_BINARY));
        Self::new(sibling.to_string_lossy())
    }
}

impl AskpassProvider for DefaultAskpass {
    fn executable_path(&self) -> String {
        self.path.clone()
    }
}
