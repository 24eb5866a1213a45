//! Audit records: one per executed command.

use crate::source::CommandSource;

/// Everything the audit sink needs to know about one command.
///
/// Built before the command runs, so `cwd` is the directory the command was
/// submitted from.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AuditRecord {
    pub user: String,
    pub host: String,
    /// Local time, ISO-8601 to the second.
    pub timestamp: String,
    pub command: String,
    pub args: Vec<String>,
    pub cwd: String,
    pub source: CommandSource,
}

impl AuditRecord {
    /// Arguments as they appear in the log: joined by single spaces.
    pub fn joined_args(&self) -> String {
        self.args.join(" ")
    }
}
