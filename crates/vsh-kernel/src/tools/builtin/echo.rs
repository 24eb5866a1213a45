//! echo: Print arguments.

use async_trait::async_trait;
use vsh_types::ExecResult;

use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Echo tool: prints its arguments joined by single spaces.
pub struct Echo;

#[async_trait]
impl Tool for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("echo", "Print arguments").usage("echo [args...]")
    }

    async fn execute(&self, args: ToolArgs, _ctx: &mut ExecContext) -> ExecResult {
        // Always one line, even with no arguments.
        ExecResult::success(format!("{}\n", args.positional.join(" ")))
    }
}
