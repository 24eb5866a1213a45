//! `~`-rooted logical paths and tree traversal.
//!
//! The working directory is kept as a list of segments and only rendered to
//! a string (`~`, `~/docs`, `~/docs/api`) for display. Nothing here ever
//! trims or splices path strings.

use std::fmt;

use thiserror::Error;

use super::node::Node;

/// The root of every logical path.
pub const HOME: &str = "~";
/// Segment separator.
pub const SEPARATOR: char = '/';

/// A path that does not resolve in the tree.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("not found: {path}")]
pub struct NotFound {
    /// The prefix of the requested path that failed to resolve.
    pub path: String,
}

/// Split a `~`-rooted path string into its non-empty segments.
///
/// `~` alone (or an empty string) is the root and yields no segments.
pub fn segments(cwd: &str) -> Vec<String> {
    let rest = if cwd == HOME {
        ""
    } else {
        cwd.strip_prefix("~/").unwrap_or(cwd)
    };
    rest.split(SEPARATOR)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

/// Render segments as a `~`-rooted path string.
pub fn render<S: AsRef<str>>(segments: &[S]) -> String {
    let mut out = String::from(HOME);
    for segment in segments {
        out.push(SEPARATOR);
        out.push_str(segment.as_ref());
    }
    out
}

/// Walk from `root` through a chain of directories.
///
/// Fails if a name is missing, or if a file is reached while segments
/// remain. An empty segment list returns `root` itself.
pub fn walk<'a, S: AsRef<str>>(root: &'a Node, segments: &[S]) -> Result<&'a Node, NotFound> {
    let mut node = root;
    for (depth, segment) in segments.iter().enumerate() {
        node = node
            .as_dir()
            .and_then(|dir| dir.get(segment.as_ref()))
            .ok_or_else(|| NotFound {
                path: render(&segments[..=depth]),
            })?;
    }
    Ok(node)
}

/// The shell's working directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Cwd {
    segments: Vec<String>,
}

impl Cwd {
    /// The root, `~`.
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse a `~`-rooted path string.
    pub fn parse(path: &str) -> Self {
        Self {
            segments: segments(path),
        }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// This path with `relative` appended.
    ///
    /// `relative` is split on the separator, so `a/b` descends two levels;
    /// empty pieces are dropped.
    pub fn join(&self, relative: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(
            relative
                .split(SEPARATOR)
                .filter(|s| !s.is_empty())
                .map(String::from),
        );
        Self { segments }
    }

    /// The parent directory. The root is its own parent.
    pub fn parent(&self) -> Self {
        let mut segments = self.segments.clone();
        segments.pop();
        Self { segments }
    }

    /// Resolve this path in a tree.
    pub fn resolve<'a>(&self, root: &'a Node) -> Result<&'a Node, NotFound> {
        walk(root, &self.segments)
    }
}

impl fmt::Display for Cwd {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(&self.segments))
    }
}

impl From<&str> for Cwd {
    fn from(path: &str) -> Self {
        Self::parse(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vfs::Directory;
    use rstest::rstest;

    fn tree() -> Node {
        let mut api = Directory::new();
        api.insert("spec.txt", Node::text("spec"));
        let mut docs = Directory::new();
        docs.insert("api", api.into());
        docs.insert("readme", Node::text("hello"));
        let mut root = Directory::new();
        root.insert("docs", docs.into());
        root.into()
    }

    #[rstest]
    #[case::root("~", &[])]
    #[case::empty("", &[])]
    #[case::root_slash("~/", &[])]
    #[case::one("~/docs", &["docs"])]
    #[case::two("~/docs/api", &["docs", "api"])]
    #[case::doubled_separators("~//docs///api/", &["docs", "api"])]
    #[case::tilde_prefixed_name("~tmp", &["~tmp"])]
    #[case::name_ending_in_tilde("~/back~", &["back~"])]
    fn splits_segments(#[case] input: &str, #[case] expected: &[&str]) {
        assert_eq!(segments(input), expected);
    }

    #[rstest]
    #[case::root("~")]
    #[case::one("~/docs")]
    #[case::deep("~/a/b/c")]
    #[case::odd_names("~/~/x~")]
    fn render_round_trips(#[case] path: &str) {
        assert_eq!(Cwd::parse(path).to_string(), path);
    }

    #[test]
    fn walk_empty_returns_root() {
        let root = tree();
        let empty: [&str; 0] = [];
        assert!(std::ptr::eq(walk(&root, &empty).unwrap(), &root));
    }

    #[test]
    fn walk_descends_directories() {
        let root = tree();
        let node = walk(&root, &["docs", "api", "spec.txt"]).unwrap();
        assert_eq!(node, &Node::text("spec"));
    }

    #[test]
    fn walk_missing_name_fails() {
        let root = tree();
        let err = walk(&root, &["docs", "nope"]).unwrap_err();
        assert_eq!(err.path, "~/docs/nope");
    }

    #[test]
    fn walk_through_file_fails() {
        let root = tree();
        let err = walk(&root, &["docs", "readme", "deeper"]).unwrap_err();
        assert_eq!(err.path, "~/docs/readme/deeper");
    }

    #[test]
    fn parent_of_root_is_root() {
        assert_eq!(Cwd::root().parent(), Cwd::root());
        assert_eq!(Cwd::parse("~/a/b").parent().to_string(), "~/a");
        assert!(Cwd::parse("~/a").parent().is_root());
    }

    #[test]
    fn join_splits_relative_paths() {
        let cwd = Cwd::parse("~/docs");
        assert_eq!(cwd.join("api").to_string(), "~/docs/api");
        assert_eq!(cwd.join("api/v1/").to_string(), "~/docs/api/v1");
        assert_eq!(cwd.join("").depth(), 1);
    }

    #[test]
    fn resolve_uses_segments() {
        let root = tree();
        assert!(Cwd::parse("~/docs/api").resolve(&root).unwrap().is_dir());
        assert!(Cwd::parse("~/docs/missing").resolve(&root).is_err());
    }
}
