//! Built-in commands for vsh.
//!
//! The command set is fixed: anything not registered here is reported as an
//! unknown command by the kernel.

mod cat;
mod cd;
mod echo;
mod exit;
mod ls;

pub use exit::{EXIT_DELAY, FAREWELL};
pub use ls::EMPTY_LISTING;

use super::ToolRegistry;

/// Register all built-in tools with the registry.
pub fn register_builtins(registry: &mut ToolRegistry) {
    registry.register(cat::Cat);
    registry.register(cd::Cd);
    registry.register(echo::Echo);
    registry.register(exit::Exit);
    registry.register(ls::Ls);
}

/// Shared fixture for builtin tests.
#[cfg(test)]
pub(crate) fn test_ctx(xml: &str) -> crate::tools::ExecContext {
    let report = crate::vfs::parse_str(xml).expect("test xml");
    crate::tools::ExecContext::new(report.root)
}
