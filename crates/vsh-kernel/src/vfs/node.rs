//! VFS tree nodes.

use std::collections::HashMap;

use vsh_types::DirEntry;

/// File payload. The variant is the `binary` flag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileData {
    /// UTF-8 text, stored verbatim.
    Text(String),
    /// Raw bytes decoded from a base64 element.
    Binary(Vec<u8>),
}

impl FileData {
    /// True for byte payloads.
    pub fn is_binary(&self) -> bool {
        matches!(self, FileData::Binary(_))
    }

    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        match self {
            FileData::Text(text) => text.len(),
            FileData::Binary(bytes) => bytes.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Text payload, or `None` for binary files.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileData::Text(text) => Some(text),
            FileData::Binary(_) => None,
        }
    }
}

/// A directory: child name to child node.
///
/// Names are unique; inserting an existing name replaces the old child.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Directory {
    children: HashMap<String, Node>,
}

impl Directory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a child, returning the node it replaced if the name was taken.
    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        self.children.insert(name.into(), node)
    }

    /// Look up a direct child by name.
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.children.get(name)
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Iterate over `(name, node)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.children.iter().map(|(name, node)| (name.as_str(), node))
    }

    /// Directory entries sorted lexicographically by name.
    pub fn entries(&self) -> Vec<DirEntry> {
        let mut entries: Vec<DirEntry> = self
            .iter()
            .map(|(name, node)| match node {
                Node::Directory(_) => DirEntry::directory(name),
                Node::File(data) => DirEntry::file(name, data.len() as u64),
            })
            .collect();
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        entries
    }
}

/// A node in the VFS tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Directory(Directory),
    File(FileData),
}

impl Node {
    /// Create a text file node.
    pub fn text(content: impl Into<String>) -> Self {
        Node::File(FileData::Text(content.into()))
    }

    /// Create a binary file node.
    pub fn binary(bytes: impl Into<Vec<u8>>) -> Self {
        Node::File(FileData::Binary(bytes.into()))
    }

    pub fn is_dir(&self) -> bool {
        matches!(self, Node::Directory(_))
    }

    pub fn is_file(&self) -> bool {
        matches!(self, Node::File(_))
    }

    pub fn as_dir(&self) -> Option<&Directory> {
        match self {
            Node::Directory(dir) => Some(dir),
            Node::File(_) => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileData> {
        match self {
            Node::File(data) => Some(data),
            Node::Directory(_) => None,
        }
    }
}

impl From<Directory> for Node {
    fn from(dir: Directory) -> Self {
        Node::Directory(dir)
    }
}
