//! vsh-kernel: the core of vsh, a read-only shell over an XML-described
//! virtual filesystem.
//!
//! This crate provides:
//!
//! - **VFS**: tree model, XML loader, `~`-rooted paths
//! - **Tools**: Tool trait, registry, and the builtin commands
//! - **Kernel**: session state, dispatch, startup diagnostics
//! - **Audit**: XML log of every executed command
//! - **Script**: startup scripts replayed before the interactive loop

pub mod audit;
pub mod error;
pub mod identity;
pub mod kernel;
pub mod script;
pub mod tools;
pub mod vfs;

pub use audit::{AuditError, AuditLog};
pub use error::ShellError;
pub use identity::Identity;
pub use kernel::{Kernel, KernelConfig, MOTD_FILE};
pub use script::{SCRIPT_ERROR_PREFIX, Script, ScriptEvent, ScriptLine, ScriptReadError};
pub use tools::{EMPTY_LISTING, EXIT_DELAY, FAREWELL, ToolSchema};

pub use vsh_types::{AuditRecord, CommandSource, DirEntry, DirEntryKind, ExecResult};
