//! Core tool traits and types.

use async_trait::async_trait;
use vsh_types::ExecResult;

use super::context::ExecContext;

/// Schema describing a tool's interface, for help text.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    /// Tool name.
    pub name: String,
    /// Short description.
    pub description: String,
    /// Usage synopsis, e.g. `cat <file>`.
    pub usage: String,
}

impl ToolSchema {
    /// Create a new tool schema. Usage defaults to the bare name.
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            usage: name.clone(),
            name,
            description: description.into(),
        }
    }

    /// Set the usage synopsis.
    pub fn usage(mut self, usage: impl Into<String>) -> Self {
        self.usage = usage.into();
        self
    }
}

/// Whitespace-split arguments following the command name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolArgs {
    /// Positional arguments in order.
    pub positional: Vec<String>,
}

impl ToolArgs {
    /// Create empty args.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a positional argument by index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.positional.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.positional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ToolArgs {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            positional: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// A command that can be executed.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The tool's name (used for lookup).
    fn name(&self) -> &str;

    /// Get the tool's schema.
    fn schema(&self) -> ToolSchema;

    /// Execute the tool with the given arguments and context.
    ///
    /// Failures are reported through the returned result, never by panicking.
    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult;
}
