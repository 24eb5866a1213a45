//! cat: Print a file from the working directory.

use async_trait::async_trait;
use vsh_types::ExecResult;

use crate::error::ShellError;
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};
use crate::vfs::{FileData, Node};

const USAGE: &str = "cat <file>";

/// Cat tool: print a text file, or the size of a binary one.
pub struct Cat;

#[async_trait]
impl Tool for Cat {
    fn name(&self) -> &str {
        "cat"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("cat", "Print a file in the current directory").usage(USAGE)
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        let [name] = args.positional.as_slice() else {
            return ShellError::UsageError(USAGE.into()).into();
        };

        let dir = match ctx.cwd_dir() {
            Ok(dir) => dir,
            Err(e) => return e.into(),
        };

        // Direct children only: a name containing '/' never matches.
        match dir.get(name).and_then(Node::as_file) {
            Some(FileData::Text(text)) => ExecResult::success(format!("{text}\n")),
            Some(FileData::Binary(bytes)) => {
                ExecResult::success(format!("<binary file: {} bytes>\n", bytes.len()))
            }
            None => ShellError::NoSuchFile(name.clone()).into(),
        }
    }
}
