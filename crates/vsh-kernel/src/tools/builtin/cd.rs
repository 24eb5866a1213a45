//! cd: Change working directory.

use async_trait::async_trait;
use vsh_types::ExecResult;

use crate::error::ShellError;
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};
use crate::vfs::path::HOME;
use crate::vfs::{Cwd, Node};

/// Cd tool: change current working directory.
pub struct Cd;

#[async_trait]
impl Tool for Cd {
    fn name(&self) -> &str {
        "cd"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("cd", "Change current working directory").usage("cd [dir | .. | . | ~ | /]")
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        if args.len() > 1 {
            return ShellError::IllegalArguments {
                command: "cd".into(),
                expected: 1,
            }
            .into();
        }

        match args.get(0).unwrap_or(HOME) {
            "~" | "/" => ctx.set_cwd(Cwd::root()),
            "." => {}
            ".." => {
                if !ctx.cwd.is_root() {
                    let parent = ctx.cwd.parent();
                    ctx.set_cwd(parent);
                }
            }
            name => {
                let candidate = ctx.cwd.join(name);
                let is_dir = candidate.resolve(&ctx.vfs).is_ok_and(Node::is_dir);
                if !is_dir {
                    return ShellError::NoSuchDirectory(name.to_string()).into();
                }
                ctx.set_cwd(candidate);
            }
        }

        ExecResult::success("")
    }
}
