//! Command system for vsh.
//!
//! Every command is a tool: a type implementing [`Tool`], registered by name
//! in a [`ToolRegistry`] and run against an [`ExecContext`].
//!
//! # Architecture
//!
//! ```text
//! ToolRegistry
//! └── Builtins (cd, ls, cat, echo, exit)
//! ```

mod builtin;
mod context;
mod registry;
mod traits;

pub use builtin::{EMPTY_LISTING, EXIT_DELAY, FAREWELL, register_builtins};
pub use context::ExecContext;
pub use registry::ToolRegistry;
pub use traits::{Tool, ToolArgs, ToolSchema};
