//! ls: List the working directory.

use async_trait::async_trait;
use vsh_types::ExecResult;

use crate::error::ShellError;
use crate::tools::{ExecContext, Tool, ToolArgs, ToolSchema};

/// Printed instead of a blank line for an empty directory.
pub const EMPTY_LISTING: &str = "(empty)";

/// Ls tool: list the children of the working directory.
pub struct Ls;

#[async_trait]
impl Tool for Ls {
    fn name(&self) -> &str {
        "ls"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new("ls", "List the current directory")
    }

    async fn execute(&self, args: ToolArgs, ctx: &mut ExecContext) -> ExecResult {
        if !args.is_empty() {
            return ShellError::UnsupportedArguments("ls".into()).into();
        }

        let dir = match ctx.cwd_dir() {
            Ok(dir) => dir,
            Err(e) => return e.into(),
        };

        if dir.is_empty() {
            return ExecResult::success(format!("{EMPTY_LISTING}\n"));
        }
        ExecResult::with_listing(dir.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::builtin::test_ctx;
    use crate::vfs::Cwd;

    #[tokio::test]
    async fn test_ls_sorted_with_dir_suffix() {
        let mut ctx = test_ctx(
            r#"<vfs><file name="zeta">z</file><dir name="beta"/><file name="alpha">a</file></vfs>"#,
        );
        let result = Ls.execute(ToolArgs::new(), &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "alpha  beta/  zeta\n");
        let listing = result.listing.expect("structured listing");
        assert!(listing[1].is_dir());
    }

    #[tokio::test]
    async fn test_ls_empty_dir_sentinel() {
        let mut ctx = test_ctx("<vfs/>");
        let result = Ls.execute(ToolArgs::new(), &mut ctx).await;
        assert!(result.ok());
        assert_eq!(result.out, "(empty)\n");
        assert!(result.listing.is_none());
    }

    #[tokio::test]
    async fn test_ls_in_subdir() {
        let mut ctx = test_ctx(r#"<vfs><dir name="d"><file name="x">1</file></dir></vfs>"#);
        ctx.set_cwd(Cwd::parse("~/d"));
        let result = Ls.execute(ToolArgs::new(), &mut ctx).await;
        assert_eq!(result.out, "x\n");
    }

    #[tokio::test]
    async fn test_ls_rejects_arguments() {
        let mut ctx = test_ctx(r#"<vfs><file name="x">1</file></vfs>"#);
        let result = Ls.execute(["x"].into_iter().collect(), &mut ctx).await;
        assert!(!result.ok());
        assert_eq!(result.err, "Err: 'ls' takes no arguments");
        assert!(result.out.is_empty());
    }

    #[tokio::test]
    async fn test_ls_invalid_cwd() {
        let mut ctx = test_ctx("<vfs/>");
        ctx.set_cwd(Cwd::parse("~/vanished"));
        let result = Ls.execute(ToolArgs::new(), &mut ctx).await;
        assert!(!result.ok());
        assert_eq!(result.err, "Err: Current directory is not valid");
    }
}
