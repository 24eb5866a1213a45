//! exit: Say goodbye and end the session.

use std::time::Duration;

use async_trait::async_trait;
use vsh_types::ExecResult;

use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Line printed by `exit`.
pub const FAREWELL: &str = "Exiting";

/// How long termination waits so the farewell can be rendered.
pub const EXIT_DELAY: Duration = Duration::from_millis(100);

/// Exit tool: prints the farewell and schedules termination.
pub struct Exit;

#[async_trait]
impl Tool for Exit {
    fn name(&self) -> &str {
        "exit"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("exit", "End the session")
    }

    async fn execute(&self, _args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        ctx.schedule_exit(EXIT_DELAY);
        ExecResult::success(format!("{FAREWELL}\n"))
    }
}
