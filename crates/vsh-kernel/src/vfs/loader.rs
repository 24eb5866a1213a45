//! VFS loader: XML document → in-memory tree.
//!
//! ```xml
//! <vfs>
//!   <file name="motd">Welcome!</file>
//!   <dir name="docs">
//!     <file name="readme">hello</file>
//!     <file name="logo.bin" base64="true">aGk=</file>
//!   </dir>
//! </vfs>
//! ```
//!
//! The outermost element is the root directory whatever its tag, unless it
//! is a `<file>`, in which case it is wrapped in a directory as `root`.
//! Parsing happens in two passes: quick-xml events are folded into a small
//! element tree, then the element tree is converted into [`Node`]s.

use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use quick_xml::Reader;
use quick_xml::events::attributes::AttrError;
use quick_xml::events::{BytesStart, Event};
use thiserror::Error;

use super::node::{Directory, Node};
use super::path::SEPARATOR;

/// Tag of a directory element.
pub const DIR_TAG: &str = "dir";
/// Tag of a file element.
pub const FILE_TAG: &str = "file";
/// Attribute carrying a child's name.
pub const NAME_ATTR: &str = "name";
/// Attribute marking a file's text as base64; only the value `true` counts.
pub const BASE64_ATTR: &str = "base64";
/// Child name used when the document's outermost element is a file.
pub const WRAPPED_ROOT_NAME: &str = "root";

/// Failure to turn a VFS source into a tree.
///
/// The session still starts with an empty root; this is surfaced as a
/// startup diagnostic.
#[derive(Debug, Error)]
pub enum VfsLoadError {
    #[error("cannot read VFS file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed VFS XML in {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: XmlSyntaxError,
    },
}

impl VfsLoadError {
    /// The source path that failed.
    pub fn path(&self) -> &Path {
        match self {
            VfsLoadError::Read { path, .. } | VfsLoadError::Parse { path, .. } => path,
        }
    }
}

/// Why an XML document could not be parsed.
#[derive(Debug, Error)]
pub enum XmlSyntaxError {
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),
    #[error(transparent)]
    Attribute(#[from] AttrError),
    #[error("document has no root element")]
    NoRoot,
    #[error("element <{0}> is never closed")]
    Unclosed(String),
    #[error("unexpected closing tag </{0}>")]
    UnexpectedClose(String),
    #[error("more than one root element")]
    MultipleRoots,
}

/// A file whose base64 payload could not be decoded.
///
/// The file is still created, with an empty byte payload.
#[derive(Debug, Clone, Error)]
#[error("{path}: invalid base64 payload: {source}")]
pub struct Base64DecodeError {
    /// Logical path of the file (`~/dir/name`).
    pub path: String,
    #[source]
    pub source: base64::DecodeError,
}

/// The loaded tree plus everything that was tolerated along the way.
#[derive(Debug, Clone, Default)]
pub struct LoadReport {
    /// Root directory of the VFS.
    pub root: Directory,
    /// Files that fell back to an empty payload.
    pub decode_errors: Vec<Base64DecodeError>,
    /// Paths whose name appeared more than once; the last element won.
    pub duplicates: Vec<String>,
    /// `dir`/`file` elements skipped because they carry no `name`.
    pub unnamed: usize,
    /// Paths whose name contains the separator. They are listed but cannot
    /// be entered with `cd`, which splits its argument on `/`.
    pub slashed: Vec<String>,
}

impl LoadReport {
    /// A report holding an empty root and no issues.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Load a VFS from an optional XML file.
///
/// `None` yields an empty root directory.
pub fn load(source: Option<&Path>) -> Result<LoadReport, VfsLoadError> {
    let Some(path) = source else {
        return Ok(LoadReport::empty());
    };

    let xml = std::fs::read_to_string(path).map_err(|source| VfsLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let report = parse_str(&xml).map_err(|source| VfsLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!(
        path = %path.display(),
        entries = report.root.len(),
        decode_errors = report.decode_errors.len(),
        "loaded VFS"
    );
    Ok(report)
}

/// Build a VFS from an XML string.
pub fn parse_str(xml: &str) -> Result<LoadReport, XmlSyntaxError> {
    let document = parse_elements(xml)?;
    let mut report = LoadReport::empty();
    report.root = build_root(&document, &mut report);
    Ok(report)
}

/// Minimal element tree, only what the VFS needs.
#[derive(Debug, Default)]
struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    /// Text before the first child element, unescaped.
    text: String,
    children: Vec<Element>,
}

impl Element {
    fn open(start: &BytesStart<'_>) -> Result<Self, XmlSyntaxError> {
        let mut attrs = Vec::new();
        for attr in start.attributes() {
            let attr = attr?;
            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
            let value = attr.unescape_value()?.into_owned();
            attrs.push((key, value));
        }
        Ok(Self {
            tag: String::from_utf8_lossy(start.name().as_ref()).into_owned(),
            attrs,
            ..Self::default()
        })
    }

    fn attr(&self, key: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    fn push_text(&mut self, text: &str) {
        if self.children.is_empty() {
            self.text.push_str(text);
        }
    }
}

fn parse_elements(xml: &str) -> Result<Element, XmlSyntaxError> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlSyntaxError::MultipleRoots);
                }
                stack.push(Element::open(&start)?);
            }
            Event::Empty(start) => {
                if root.is_some() && stack.is_empty() {
                    return Err(XmlSyntaxError::MultipleRoots);
                }
                let element = Element::open(&start)?;
                attach(&mut stack, &mut root, element);
            }
            Event::End(end) => {
                let element = stack.pop().ok_or_else(|| {
                    XmlSyntaxError::UnexpectedClose(
                        String::from_utf8_lossy(end.name().as_ref()).into_owned(),
                    )
                })?;
                attach(&mut stack, &mut root, element);
            }
            Event::Text(text) => {
                if let Some(open) = stack.last_mut() {
                    open.push_text(&text.unescape()?);
                }
            }
            Event::CData(cdata) => {
                if let Some(open) = stack.last_mut() {
                    open.push_text(&String::from_utf8_lossy(&cdata));
                }
            }
            Event::Eof => break,
            // Declarations, comments, processing instructions, doctype.
            _ => {}
        }
    }

    if let Some(open) = stack.pop() {
        return Err(XmlSyntaxError::Unclosed(open.tag));
    }
    root.ok_or(XmlSyntaxError::NoRoot)
}

fn attach(stack: &mut [Element], root: &mut Option<Element>, element: Element) {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None => *root = Some(element),
    }
}

fn build_root(document: &Element, report: &mut LoadReport) -> Directory {
    if document.tag == FILE_TAG {
        let mut root = Directory::new();
        let path = child_path("~", WRAPPED_ROOT_NAME);
        root.insert(WRAPPED_ROOT_NAME, build_file(document, &path, report));
        return root;
    }
    build_dir(document, "~", report)
}

/// Children other than `dir` and `file` are ignored.
fn build_dir(element: &Element, path: &str, report: &mut LoadReport) -> Directory {
    let mut dir = Directory::new();

    for child in element
        .children
        .iter()
        .filter(|c| c.tag == DIR_TAG || c.tag == FILE_TAG)
    {
        let Some(name) = child.attr(NAME_ATTR) else {
            tracing::warn!(parent = %path, tag = %child.tag, "skipping VFS element without a name");
            report.unnamed += 1;
            continue;
        };

        let path = child_path(path, name);
        if name.contains(SEPARATOR) {
            tracing::warn!(path = %path, "VFS name contains '/', cd cannot reach it");
            report.slashed.push(path.clone());
        }

        let node = if child.tag == DIR_TAG {
            Node::Directory(build_dir(child, &path, report))
        } else {
            build_file(child, &path, report)
        };
        if dir.insert(name, node).is_some() {
            tracing::warn!(path = %path, "duplicate VFS name, last element wins");
            report.duplicates.push(path);
        }
    }

    dir
}

fn build_file(element: &Element, path: &str, report: &mut LoadReport) -> Node {
    if element.attr(BASE64_ATTR) != Some("true") {
        return Node::text(element.text.clone());
    }

    let encoded: String = element
        .text
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    match STANDARD.decode(encoded) {
        Ok(bytes) => Node::binary(bytes),
        Err(source) => {
            let err = Base64DecodeError {
                path: path.to_string(),
                source,
            };
            tracing::warn!("{}", err);
            report.decode_errors.push(err);
            Node::binary(Vec::new())
        }
    }
}

fn child_path(parent: &str, name: &str) -> String {
    format!("{parent}/{name}")
}
