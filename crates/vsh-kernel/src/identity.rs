//! Who is running the shell and where.

use std::env;
use std::fs;

const FALLBACK_USER: &str = "user";
const FALLBACK_HOST: &str = "localhost";
const HOSTNAME_FILE: &str = "/proc/sys/kernel/hostname";

/// User and host names shown in the prompt and written to the audit log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user: String,
    pub host: String,
}

impl Identity {
    pub fn new(user: impl Into<String>, host: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            host: host.into(),
        }
    }

    /// Read identity from the environment.
    ///
    /// User: `$USER`, then `$USERNAME`, then `"user"`.
    /// Host: the kernel hostname file, then `$HOSTNAME`, then `"localhost"`.
    pub fn discover() -> Self {
        Self {
            user: discover_user(),
            host: discover_host(),
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn discover_user() -> String {
    env::var("USER")
        .ok()
        .and_then(non_empty)
        .or_else(|| env::var("USERNAME").ok().and_then(non_empty))
        .unwrap_or_else(|| FALLBACK_USER.to_string())
}

fn discover_host() -> String {
    fs::read_to_string(HOSTNAME_FILE)
        .ok()
        .and_then(non_empty)
        .or_else(|| env::var("HOSTNAME").ok().and_then(non_empty))
        .unwrap_or_else(|| FALLBACK_HOST.to_string())
}
