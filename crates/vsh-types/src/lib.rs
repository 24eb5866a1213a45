//! Pure data types for vsh: command results, directory entries, audit records.
//!
//! This crate is a leaf dependency with no async runtime, no XML, no I/O.
//! Front ends and log sinks can depend on it without pulling in the kernel.

pub mod audit;
pub mod dir_entry;
pub mod result;
pub mod source;

// Flat re-exports for convenience
pub use audit::*;
pub use dir_entry::*;
pub use result::*;
pub use source::*;
