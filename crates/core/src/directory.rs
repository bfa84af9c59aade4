//! Recursive directory listings

use crate::list::{FileList, List};
use crate::path::{descendant_of, Path};
use crate::system::walk;
use std::fmt;

/// Everything below a directory, dotfiles included
///
/// Members are rooted at the directory path's own root, so rebasing a
/// `Directory` moves the whole subtree while keeping its relative offset.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Directory {
    path: Path,
}

impl Directory {
    pub fn new(path: impl Into<Path>) -> Self {
        Self { path: path.into() }
    }

    /// `Directory::new(Path::join(root, relative_path))`
    pub fn join(root: impl AsRef<str>, relative_path: impl AsRef<str>) -> Self {
        Self::new(Path::join(root, relative_path))
    }

    /// The directory itself
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The root members are expressed against
    pub fn root(&self) -> &str {
        self.path.root()
    }
}

impl FileList for Directory {
    fn iter(&self) -> Box<dyn Iterator<Item = Path> + '_> {
        let root = self.path.root().to_string();
        Box::new(
            walk(self.path.full_path(), None).map(move |full_path| Path::with_root(full_path, root.clone())),
        )
    }

    /// Prefix test on the directory path, bounded by a separator so that
    /// `/foo/barbaz` is not inside `/foo/bar`
    fn contains(&self, path: &Path) -> bool {
        path.full_path() == self.path.full_path()
            || descendant_of(self.path.full_path(), path.full_path()).is_some()
    }

    fn rebase(&self, root: &str) -> List {
        List::Directory(Directory::new(self.path.rebase(root)))
    }

    fn roots(&self) -> Vec<String> {
        vec![self.path.full_path().to_string()]
    }
}

impl fmt::Debug for Directory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Directory {:?}>", self.path)
    }
}
