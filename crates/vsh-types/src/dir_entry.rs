//! Directory entry types returned by listings.

/// Separator appended to directory names in listings.
pub const DIR_SEPARATOR: char = '/';

/// Kind of directory entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DirEntryKind {
    File,
    Directory,
}

/// A single child of a VFS directory, as seen by `ls`.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct DirEntry {
    /// Name of the entry (not full path).
    pub name: String,
    /// Kind of entry.
    pub kind: DirEntryKind,
    /// Payload size in bytes (0 for directories).
    pub size: u64,
}

impl DirEntry {
    /// Create a new directory entry.
    pub fn directory(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: DirEntryKind::Directory,
            size: 0,
        }
    }

    /// Create a new file entry.
    pub fn file(name: impl Into<String>, size: u64) -> Self {
        Self {
            name: name.into(),
            kind: DirEntryKind::File,
            size,
        }
    }

    /// Returns true if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.kind == DirEntryKind::Directory
    }

    /// Returns true if this entry is a file.
    pub fn is_file(&self) -> bool {
        self.kind == DirEntryKind::File
    }

    /// Name as shown by `ls`: directories carry a trailing separator.
    pub fn display_name(&self) -> String {
        match self.kind {
            DirEntryKind::Directory => format!("{}{}", self.name, DIR_SEPARATOR),
            DirEntryKind::File => self.name.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_display_has_trailing_separator() {
        let entry = DirEntry::directory("src");
        assert!(entry.is_dir());
        assert!(!entry.is_file());
        assert_eq!(entry.display_name(), "src/");
    }

    #[test]
    fn file_display_is_bare_name() {
        let entry = DirEntry::file("notes.txt", 12);
        assert!(entry.is_file());
        assert_eq!(entry.size, 12);
        assert_eq!(entry.display_name(), "notes.txt");
    }
}
