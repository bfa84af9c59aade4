//! Paths anchored to a root directory
//!
//! A `Path` is an absolute location plus the root it is expressed against.
//! The relative offset (everything after the root and one separator) is what
//! survives a rebase, so the same file can be mapped from a source tree into
//! a build tree without string surgery at the call site.

use crate::error::{FilesError, Result};
use globset::GlobBuilder;
use std::fmt;
use std::ops::{Add, Div};
use tracing::debug;

/// Path component separator
pub const SEPARATOR: char = '/';

/// An immutable path with an explicit root
///
/// Identity is the `(full_path, root)` pair: two paths naming the same file
/// under different roots are not equal, because they rebase differently.
/// Ordering is by full path first.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path {
    full_path: String,
    root: String,
}

impl Path {
    /// Create a path whose root is its dirname
    pub fn new(full_path: impl Into<String>) -> Self {
        let full_path = full_path.into();
        let root = match full_path.rfind(SEPARATOR) {
            Some(index) => full_path[..index].to_string(),
            None => String::new(),
        };

        Self { full_path, root }
    }

    /// Create a path with an explicit root
    ///
    /// `full_path` is expected to begin with `root`.
    pub fn with_root(full_path: impl Into<String>, root: impl Into<String>) -> Self {
        Self {
            full_path: full_path.into(),
            root: root.into(),
        }
    }

    /// Join `relative_path` beneath `root`, keeping `root` as the root
    pub fn join(root: impl AsRef<str>, relative_path: impl AsRef<str>) -> Self {
        let root = root.as_ref();
        Self {
            full_path: join_str(root, relative_path.as_ref()),
            root: root.to_string(),
        }
    }

    /// Resolve `path` against `root` unless it is already absolute
    ///
    /// `.` and `..` components are collapsed lexically; nothing is looked up
    /// on disk.
    pub fn expand(path: impl AsRef<str>, root: impl AsRef<str>) -> Self {
        let path = path.as_ref();
        let joined = if path.starts_with(SEPARATOR) {
            path.to_string()
        } else {
            join_str(root.as_ref(), path)
        };

        Self::new(normalize(&joined))
    }

    /// The current working directory
    pub fn current() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(|e| FilesError::io(".", e))?;
        Ok(Self::from(cwd.as_path()))
    }

    /// The absolute path
    pub fn full_path(&self) -> &str {
        &self.full_path
    }

    /// The root this path is expressed against
    pub fn root(&self) -> &str {
        &self.root
    }

    /// The full path with the root and one separator removed
    pub fn relative_path(&self) -> &str {
        relative_slice(&self.root, &self.full_path)
    }

    /// Length of the full path in bytes
    pub fn len(&self) -> usize {
        self.full_path.len()
    }

    pub fn is_empty(&self) -> bool {
        self.full_path.is_empty()
    }

    /// Components of the full path (`/a/b` gives `["", "a", "b"]`)
    pub fn components(&self) -> Vec<&str> {
        components(&self.full_path)
    }

    /// Alias of `components`
    pub fn parts(&self) -> Vec<&str> {
        self.components()
    }

    /// Dirname and filename of the relative path
    pub fn relative_parts(&self) -> (&str, &str) {
        split_last(self.relative_path())
    }

    /// Last component of the full path
    pub fn basename(&self) -> &str {
        split_last(&self.full_path).1
    }

    /// True if the full path starts with `prefix` (plain string test)
    pub fn starts_with(&self, prefix: &str) -> bool {
        self.full_path.starts_with(prefix)
    }

    /// The enclosing directory
    ///
    /// The root is kept while it still contains the parent; past that point
    /// the root is clamped to the parent itself.
    pub fn parent(&self) -> Self {
        let parent = match self.full_path.rfind(SEPARATOR) {
            Some(0) => "/",
            Some(index) => &self.full_path[..index],
            None => ".",
        };

        let root = if parent.len() >= self.root.len() && parent.starts_with(self.root.as_str()) {
            self.root.clone()
        } else {
            parent.to_string()
        };

        Self::with_root(parent, root)
    }

    /// Move to `root`, keeping the relative offset
    pub fn rebase(&self, root: impl AsRef<str>) -> Self {
        Self::join(root, self.relative_path())
    }

    /// Rewrite the relative path and optionally the root
    pub fn with(&self, options: &WithOptions) -> Self {
        let (dirname, filename) = self.relative_parts();

        let mut relative = match &options.basename {
            Basename::Keep => self.relative_path().to_string(),
            Basename::StripExtension => join_relative(dirname, strip_extension(filename)),
            Basename::Replace(name) => join_relative(dirname, name),
        };

        if let Some(extension) = &options.extension {
            relative.push_str(extension);
        }

        let root = options.root.as_deref().unwrap_or(&self.root);
        Self::join(root, relative)
    }

    /// Concatenate `suffix` onto the full path, e.g. `main.c` to `main.c.o`
    pub fn append(&self, suffix: &str) -> Self {
        Self {
            full_path: format!("{}{}", self.full_path, suffix),
            root: self.root.clone(),
        }
    }

    /// Shortest relative path from `root` to this path
    ///
    /// Returns `.` when both name the same location.
    pub fn shortest_path(&self, root: impl AsRef<str>) -> String {
        shortest_path(&self.full_path, root.as_ref())
    }

    /// Shell-style match with the default options
    pub fn matches(&self, pattern: &str) -> bool {
        self.matches_with(pattern, MatchOptions::default())
    }

    /// Shell-style match
    ///
    /// Absolute patterns are matched against the full path, everything
    /// else against the relative path. An invalid pattern never matches.
    pub fn matches_with(&self, pattern: &str, options: MatchOptions) -> bool {
        let target = if pattern.starts_with(SEPARATOR) {
            self.full_path.as_str()
        } else {
            self.relative_path()
        };

        match GlobBuilder::new(pattern)
            .literal_separator(options.literal_separator)
            .case_insensitive(options.case_insensitive)
            .build()
        {
            Ok(glob) => glob.compile_matcher().is_match(target),
            Err(e) => {
                debug!("Ignoring invalid match pattern '{}': {}", pattern, e);
                false
            }
        }
    }
}

/// How `Path::with` treats the current file name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Basename {
    /// Leave the file name alone
    #[default]
    Keep,
    /// Drop the current extension (`bar.txt` becomes `bar`)
    StripExtension,
    /// Use a different file name
    Replace(String),
}

/// Options for `Path::with`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WithOptions {
    /// New root (default: keep the current one)
    pub root: Option<String>,
    /// Suffix appended after the basename rewrite
    pub extension: Option<String>,
    /// Basename rewrite
    pub basename: Basename,
}

impl WithOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn extension(mut self, extension: impl Into<String>) -> Self {
        self.extension = Some(extension.into());
        self
    }

    pub fn basename(mut self, basename: Basename) -> Self {
        self.basename = basename;
        self
    }
}

/// Flags for `Path::matches_with`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// `*` and `?` do not cross `/` (default: true)
    pub literal_separator: bool,
    /// Case-insensitive matching (default: false)
    pub case_insensitive: bool,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            literal_separator: true,
            case_insensitive: false,
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_path)
    }
}

impl fmt::Debug for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.root, self.relative_path())
    }
}

impl AsRef<str> for Path {
    fn as_ref(&self) -> &str {
        &self.full_path
    }
}

impl AsRef<std::path::Path> for Path {
    fn as_ref(&self) -> &std::path::Path {
        std::path::Path::new(&self.full_path)
    }
}

impl From<&str> for Path {
    fn from(full_path: &str) -> Self {
        Self::new(full_path)
    }
}

impl From<String> for Path {
    fn from(full_path: String) -> Self {
        Self::new(full_path)
    }
}

impl From<&std::path::Path> for Path {
    fn from(path: &std::path::Path) -> Self {
        Self::new(path.to_string_lossy().into_owned())
    }
}

impl From<std::path::PathBuf> for Path {
    fn from(path: std::path::PathBuf) -> Self {
        Self::from(path.as_path())
    }
}

/// Join beneath the full path, root unchanged
impl Add<&str> for &Path {
    type Output = Path;

    fn add(self, relative: &str) -> Path {
        if relative.is_empty() {
            return self.clone();
        }

        Path {
            full_path: join_str(&self.full_path, relative),
            root: self.root.clone(),
        }
    }
}

impl Add<&str> for Path {
    type Output = Path;

    fn add(self, relative: &str) -> Path {
        &self + relative
    }
}

/// Descend into the path, which becomes the new root
impl Div<&str> for &Path {
    type Output = Path;

    fn div(self, relative: &str) -> Path {
        if relative.is_empty() {
            return self.clone();
        }

        Path::join(&self.full_path, relative)
    }
}

impl Div<&str> for Path {
    type Output = Path;

    fn div(self, relative: &str) -> Path {
        &self / relative
    }
}

/// Join two path strings with exactly one separator between them
pub(crate) fn join_str(root: &str, relative: &str) -> String {
    if relative.is_empty() {
        return root.to_string();
    }

    format!(
        "{}{}{}",
        root.trim_end_matches(SEPARATOR),
        SEPARATOR,
        relative.trim_start_matches(SEPARATOR)
    )
}

/// The part of `full` below `root`, or `None` if `full` is not strictly inside it
pub(crate) fn descendant_of<'a>(root: &str, full: &'a str) -> Option<&'a str> {
    let rest = full.strip_prefix(root)?;
    let rest = if root.ends_with(SEPARATOR) {
        rest
    } else {
        rest.strip_prefix(SEPARATOR)?
    };

    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}

fn relative_slice<'a>(root: &str, full: &'a str) -> &'a str {
    if root.is_empty() {
        return full.strip_prefix(SEPARATOR).unwrap_or(full);
    }

    let mut offset = root.len();
    if !root.ends_with(SEPARATOR) {
        offset += 1;
    }

    full.get(offset..).unwrap_or("")
}

/// Split on the separator, dropping trailing empty components
fn components(path: &str) -> Vec<&str> {
    let mut parts: Vec<&str> = path.split(SEPARATOR).collect();
    while parts.last() == Some(&"") {
        parts.pop();
    }
    parts
}

fn shortest_path(path: &str, root: &str) -> String {
    let path_components = components(path);
    let root_components = components(root);

    let common = path_components
        .iter()
        .zip(root_components.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let up = root_components.len() - common;

    let parts: Vec<&str> = std::iter::repeat("..")
        .take(up)
        .chain(path_components[common..].iter().copied())
        .collect();

    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}

fn split_last(path: &str) -> (&str, &str) {
    match path.rfind(SEPARATOR) {
        Some(index) => (&path[..index], &path[index + 1..]),
        None => ("", path),
    }
}

fn join_relative(dirname: &str, filename: &str) -> String {
    if dirname.is_empty() {
        filename.to_string()
    } else {
        format!("{}{}{}", dirname, SEPARATOR, filename)
    }
}

/// `bar.txt` -> `bar`; dotfiles like `.profile` keep their name
fn strip_extension(filename: &str) -> &str {
    match filename.rfind('.') {
        Some(index) if index > 0 => &filename[..index],
        _ => filename,
    }
}

fn normalize(path: &str) -> String {
    let absolute = path.starts_with(SEPARATOR);
    let mut stack: Vec<&str> = Vec::new();

    for part in path.split(SEPARATOR) {
        match part {
            "" | "." => {}
            ".." => {
                if stack.last().map_or(false, |last| *last != "..") {
                    stack.pop();
                } else if !absolute {
                    stack.push("..");
                }
            }
            _ => stack.push(part),
        }
    }

    let joined = stack.join("/");
    if absolute {
        format!("/{}", joined)
    } else if joined.is_empty() {
        ".".to_string()
    } else {
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn subject() -> Path {
        Path::with_root("/foo/bar/baz", "/foo")
    }

    #[test]
    fn test_new_infers_dirname_root() {
        let path = Path::new("/a/b/c/file.cpp");
        assert_eq!(path.root(), "/a/b/c");
        assert_eq!(path.relative_path(), "file.cpp");

        let output = Path::new("/a/b/c/d/e/");
        assert_eq!(output.root(), "/a/b/c/d/e");
        assert_eq!(output.relative_path(), "");
    }

    #[test]
    fn test_parts_and_relative_parts() {
        let path = subject();
        assert_eq!(path.parts(), vec!["", "foo", "bar", "baz"]);
        assert_eq!(path.relative_path(), "bar/baz");
        assert_eq!(path.relative_parts(), ("bar", "baz"));
        assert_eq!(path.basename(), "baz");
        assert_eq!(path.len(), "/foo/bar/baz".len());
    }

    #[test]
    fn test_equality_includes_root() {
        let path = subject();
        let other_root = Path::join("/foo/bar", "baz");

        assert_eq!(path.full_path(), other_root.full_path());
        assert_ne!(path, other_root);
        assert_eq!(path, path.clone());
    }

    #[test]
    fn test_ordering_by_full_path() {
        let mut paths = vec![Path::new("/b"), Path::new("/a/z"), Path::new("/a")];
        paths.sort();
        let sorted: Vec<&str> = paths.iter().map(|p| p.full_path()).collect();
        assert_eq!(sorted, vec!["/a", "/a/z", "/b"]);
    }

    #[test]
    fn test_shortest_path_same() {
        let path = Path::new("/a/b/c/file.cpp");
        assert_eq!(path.shortest_path(&path), ".");
    }

    #[test]
    fn test_shortest_path_outer() {
        let input = Path::new("/a/b/c/file.cpp");
        let output = Path::new("/a/b/c/d/e/");
        assert_eq!(input.shortest_path(&output), "../../file.cpp");
    }

    #[test]
    fn test_shortest_path_inner() {
        let input = Path::new("/a/b/c/file.cpp");
        let output = Path::new("/a/");
        assert_eq!(input.shortest_path(&output), "b/c/file.cpp");
    }

    #[test]
    fn test_rebase_keeps_relative_path() {
        let path = subject();
        let rebased = path.rebase("/tmp/out");

        assert_eq!(rebased.root(), "/tmp/out");
        assert_eq!(rebased.full_path(), "/tmp/out/bar/baz");
        assert_eq!(rebased.relative_path(), path.relative_path());
    }

    #[test]
    fn test_with_extension_and_root() {
        let renamed = subject().with(&WithOptions::new().root("/tmp").extension(".txt"));
        assert_eq!(renamed.root(), "/tmp");
        assert_eq!(renamed.relative_path(), "bar/baz.txt");
    }

    #[test]
    fn test_with_basename_rewrites() {
        let path = Path::new("/foo/bar.txt");

        let replaced = path.with(&WithOptions::new().extension(".jpeg").basename(Basename::StripExtension));
        assert_eq!(replaced.full_path(), "/foo/bar.jpeg");

        let appended = path.with(&WithOptions::new().extension(".jpeg"));
        assert_eq!(appended.full_path(), "/foo/bar.txt.jpeg");

        let renamed = path.with(
            &WithOptions::new()
                .basename(Basename::Replace("baz".into()))
                .extension(".txt"),
        );
        assert_eq!(renamed.full_path(), "/foo/baz.txt");
    }

    #[test]
    fn test_append_keeps_root() {
        let object = subject().append(".o");
        assert_eq!(object.root(), "/foo");
        assert_eq!(object.relative_path(), "bar/baz.o");
    }

    #[test]
    fn test_add_joins_beneath() {
        let path = Path::new("/a/b/c");
        let joined = &path + "d/e/f";
        assert_eq!(joined.full_path(), "/a/b/c/d/e/f");
        assert_eq!(joined.root(), path.root());
        assert_eq!(&subject() + "", subject());
    }

    #[test]
    fn test_div_reroots() {
        let rerooted = subject() / "cat";
        assert_eq!(rerooted.root(), "/foo/bar/baz");
        assert_eq!(rerooted.relative_path(), "cat");
        assert_eq!(subject() / "", subject());
    }

    #[test]
    fn test_parent() {
        let parent = Path::new("/foo").parent();
        assert_eq!(parent.root(), "");
        assert_eq!(parent.relative_path(), "");
        assert_eq!(parent.full_path(), "/");

        let parent = subject().parent();
        assert_eq!(parent.root(), "/foo");
        assert_eq!(parent.relative_path(), "bar");
        assert_eq!(parent.full_path(), "/foo/bar");
    }

    #[test]
    fn test_expand() {
        assert_eq!(Path::expand("foo", "/bar").full_path(), "/bar/foo");
        assert_eq!(Path::expand("/abs/x", "/bar").full_path(), "/abs/x");
        assert_eq!(Path::expand("../x/./y", "/bar/baz").full_path(), "/bar/x/y");
    }

    #[test]
    fn test_match_relative() {
        let path = subject();
        assert!(path.matches(path.relative_path()));
        assert!(path.matches("*/baz"));
        assert!(!path.matches("/baz"));
    }

    #[test]
    fn test_match_absolute() {
        let path = subject();
        assert!(path.matches("/foo/bar/baz"));
        assert!(path.matches("/foo/**"));
        assert!(!path.matches("[invalid"));
    }

    #[test]
    fn test_debug_shows_root_and_relative() {
        let rendered = format!("{:?}", subject());
        assert!(rendered.contains("/foo"));
        assert!(rendered.contains("bar/baz"));
    }

    #[test]
    fn test_descendant_of_guards_separator() {
        assert_eq!(descendant_of("/foo/bar", "/foo/bar/x"), Some("x"));
        assert_eq!(descendant_of("/foo/bar", "/foo/barbaz"), None);
        assert_eq!(descendant_of("/foo/bar", "/foo/bar"), None);
        assert_eq!(descendant_of("/", "/etc"), Some("etc"));
    }
}
