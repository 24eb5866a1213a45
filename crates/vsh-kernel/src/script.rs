//! Startup scripts: one command per line, `#` lines echoed as comments.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use vsh_types::ExecResult;

/// Prefix the front end prints before a script failure.
pub const SCRIPT_ERROR_PREFIX: &str = "[SCRIPT ERROR]";

#[derive(Debug, Error)]
#[error("cannot read script {}: {source}", path.display())]
pub struct ScriptReadError {
    pub path: PathBuf,
    #[source]
    pub source: io::Error,
}

/// One non-blank line of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptLine {
    /// Raw line starting with `#`, echoed verbatim.
    Comment(String),
    /// Trimmed command line.
    Command(String),
}

/// What happened when a script line was replayed.
#[derive(Debug, Clone)]
pub enum ScriptEvent<'a> {
    Comment(&'a str),
    Command {
        /// Prompt as it stood before the command ran.
        prompt: String,
        line: &'a str,
        result: ExecResult,
    },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Script {
    lines: Vec<ScriptLine>,
}

impl Script {
    pub fn read(path: &Path) -> Result<Self, ScriptReadError> {
        let text = fs::read_to_string(path).map_err(|source| ScriptReadError {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Self::parse(&text))
    }

    pub fn parse(text: &str) -> Self {
        let lines = text
            .lines()
            .filter_map(|raw| {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else if raw.starts_with('#') {
                    Some(ScriptLine::Comment(raw.to_string()))
                } else {
                    Some(ScriptLine::Command(trimmed.to_string()))
                }
            })
            .collect();
        Self { lines }
    }

    pub fn lines(&self) -> &[ScriptLine] {
        &self.lines
    }

    pub fn commands(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().filter_map(|line| match line {
            ScriptLine::Command(cmd) => Some(cmd.as_str()),
            ScriptLine::Comment(_) => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
