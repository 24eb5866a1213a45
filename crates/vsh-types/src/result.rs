//! ExecResult: the structured result of every command execution.

use crate::dir_entry::DirEntry;

/// The result of executing a single command line.
///
/// Every command produces one of these on both the success and the failure
/// path, so the front end always has a line to render.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ExecResult {
    /// Exit code. 0 means success.
    pub code: i64,
    /// Text to display on success, newline-terminated per line.
    ///
    /// Empty means the command printed nothing (e.g. `cd`); a bare `"\n"` is
    /// one blank line (e.g. `echo`).
    pub out: String,
    /// Error message to display on failure, without a trailing newline.
    pub err: String,
    /// Structured directory listing, set by `ls`.
    ///
    /// `out` always carries the plain rendering; front ends may use this to
    /// colour directories.
    pub listing: Option<Vec<DirEntry>>,
}

impl ExecResult {
    /// Create a successful result with output.
    pub fn success(out: impl Into<String>) -> Self {
        Self {
            code: 0,
            out: out.into(),
            err: String::new(),
            listing: None,
        }
    }

    /// Create a successful result from a directory listing.
    ///
    /// The canonical text is one line: every entry's display name joined by
    /// two spaces, in the order given.
    pub fn with_listing(entries: Vec<DirEntry>) -> Self {
        let mut out = entries
            .iter()
            .map(DirEntry::display_name)
            .collect::<Vec<_>>()
            .join("  ");
        out.push('\n');
        Self {
            code: 0,
            out,
            err: String::new(),
            listing: Some(entries),
        }
    }

    /// Create a failed result with an error message.
    pub fn failure(code: i64, err: impl Into<String>) -> Self {
        Self {
            code,
            out: String::new(),
            err: err.into(),
            listing: None,
        }
    }

    /// True if the command succeeded (exit code 0).
    pub fn ok(&self) -> bool {
        self.code == 0
    }

    /// Everything a front end should print for this result.
    ///
    /// `out` as-is on success; `err` plus a newline on failure.
    pub fn display(&self) -> String {
        if self.ok() {
            self.out.clone()
        } else {
            format!("{}\n", self.err)
        }
    }
}

impl Default for ExecResult {
    fn default() -> Self {
        Self::success("")
    }
}
