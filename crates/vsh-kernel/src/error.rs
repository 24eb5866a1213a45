//! Errors a single command can report.
//!
//! None of these end the session. Each converts into a failed
//! [`ExecResult`] whose `err` is the line shown to the user.

use thiserror::Error;
use vsh_types::ExecResult;

/// A recoverable command failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ShellError {
    /// Wrong number of arguments.
    #[error("Err: Illegal args for '{command}' ({expected} required)")]
    IllegalArguments { command: String, expected: usize },
    /// Command used incorrectly; carries the usage synopsis.
    #[error("Usage: {0}")]
    UsageError(String),
    /// Command accepts no arguments but got some.
    #[error("Err: '{0}' takes no arguments")]
    UnsupportedArguments(String),
    #[error("Err: No such directory '{0}'")]
    NoSuchDirectory(String),
    #[error("Err: No such file '{0}'")]
    NoSuchFile(String),
    /// The working directory no longer resolves to a directory.
    #[error("Err: Current directory is not valid")]
    InvalidCwd,
    #[error("Unknown cmd '{0}'")]
    UnknownCommand(String),
}

impl ShellError {
    /// Exit code carried by the failed result.
    pub fn exit_code(&self) -> i64 {
        match self {
            ShellError::IllegalArguments { .. }
            | ShellError::UsageError(_)
            | ShellError::UnsupportedArguments(_) => 2,
            ShellError::UnknownCommand(_) => 127,
            ShellError::NoSuchDirectory(_)
            | ShellError::NoSuchFile(_)
            | ShellError::InvalidCwd => 1,
        }
    }
}

impl From<ShellError> for ExecResult {
    fn from(err: ShellError) -> Self {
        ExecResult::failure(err.exit_code(), err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        let err = ShellError::IllegalArguments {
            command: "cd".into(),
            expected: 1,
        };
        assert_eq!(err.to_string(), "Err: Illegal args for 'cd' (1 required)");
        assert_eq!(ShellError::UnknownCommand("frob".into()).to_string(), "Unknown cmd 'frob'");
        assert_eq!(ShellError::UsageError("cat <file>".into()).to_string(), "Usage: cat <file>");
    }

    #[test]
    fn converts_to_failed_result() {
        let result: ExecResult = ShellError::NoSuchFile("x".into()).into();
        assert!(!result.ok());
        assert_eq!(result.code, 1);
        assert_eq!(result.err, "Err: No such file 'x'");

        let result: ExecResult = ShellError::UnknownCommand("frob".into()).into();
        assert_eq!(result.code, 127);
    }
}
