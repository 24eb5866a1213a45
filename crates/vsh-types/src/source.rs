//! Where a command line came from.

use std::fmt;

/// Origin of a command, recorded in the audit log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandSource {
    /// Typed at the prompt.
    #[default]
    Interactive,
    /// Replayed from the startup script.
    Script,
}

impl CommandSource {
    /// The string written to the audit log.
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandSource::Interactive => "interactive",
            CommandSource::Script => "script",
        }
    }
}

impl fmt::Display for CommandSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
