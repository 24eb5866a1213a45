//! Virtual Filesystem (VFS) for vsh.
//!
//! The VFS is a read-only tree built once at startup from an XML document:
//!
//! - **node**: the tree itself. [`Node`] is either a [`Directory`] or a file
//!   holding [`FileData`]
//! - **loader**: XML → tree, including base64 payloads
//! - **path**: `~`-rooted paths, segment splitting and traversal
//!
//! # Design
//!
//! ```text
//! ~                      # root directory (outermost XML element)
//! ├── motd               # <file name="motd">…</file>
//! └── docs/              # <dir name="docs">
//!     └── readme         #   <file name="readme">…</file>
//! ```
//!
//! No command mutates the tree, so the kernel shares it behind an `Arc`.

mod loader;
mod node;
pub mod path;

pub use loader::{
    BASE64_ATTR, Base64DecodeError, DIR_TAG, FILE_TAG, LoadReport, NAME_ATTR, VfsLoadError,
    WRAPPED_ROOT_NAME, XmlSyntaxError, load, parse_str,
};
pub use node::{Directory, FileData, Node};
pub use path::{Cwd, NotFound};
