//! Execution context for tools.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;

use crate::error::ShellError;
use crate::vfs::{Cwd, Directory, Node};

/// Session state shared by every command: the VFS and the working directory.
pub struct ExecContext {
    /// Root of the VFS. Always a directory.
    pub vfs: Arc<Node>,
    /// Current working directory.
    pub cwd: Cwd,
    /// Pending deferred termination, set by `exit`.
    exit_task: Option<JoinHandle<()>>,
}

impl ExecContext {
    /// Create a context rooted at `~` over the given tree.
    pub fn new(root: Directory) -> Self {
        Self::with_shared(Arc::new(Node::Directory(root)))
    }

    /// Create a context over an already shared root.
    pub fn with_shared(vfs: Arc<Node>) -> Self {
        Self {
            vfs,
            cwd: Cwd::root(),
            exit_task: None,
        }
    }

    /// Resolve the working directory to the directory it names.
    pub fn cwd_dir(&self) -> Result<&Directory, ShellError> {
        self.cwd
            .resolve(&self.vfs)
            .ok()
            .and_then(Node::as_dir)
            .ok_or(ShellError::InvalidCwd)
    }

    /// Change the current working directory.
    pub fn set_cwd(&mut self, cwd: Cwd) {
        tracing::debug!(from = %self.cwd, to = %cwd, "cwd changed");
        self.cwd = cwd;
    }

    /// Schedule session termination after `delay`.
    ///
    /// Must be called from within a tokio runtime. Scheduling again replaces
    /// the pending task.
    pub fn schedule_exit(&mut self, delay: Duration) {
        if let Some(previous) = self.exit_task.take() {
            previous.abort();
        }
        self.exit_task = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
        }));
    }

    /// True once `exit` has run and the termination was not cancelled.
    pub fn exit_scheduled(&self) -> bool {
        self.exit_task.is_some()
    }

    /// Take the pending termination task, if any.
    pub fn take_exit_task(&mut self) -> Option<JoinHandle<()>> {
        self.exit_task.take()
    }

    /// Cancel a pending termination. Returns true if one was pending.
    pub fn cancel_exit(&mut self) -> bool {
        match self.exit_task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }
}
