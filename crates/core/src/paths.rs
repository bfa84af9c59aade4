//! Explicit, materialized path lists

use crate::list::{FileList, List};
use crate::path::Path;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// A fixed list of paths, iterated in insertion order
///
/// Membership is frozen at construction, so the roots are computed at most
/// once (or supplied up front).
#[derive(Clone)]
pub struct Paths {
    list: Arc<[Path]>,
    roots: OnceLock<Vec<String>>,
}

impl Paths {
    pub fn new(paths: impl IntoIterator<Item = Path>) -> Self {
        Self {
            list: paths.into_iter().collect(),
            roots: OnceLock::new(),
        }
    }

    /// Create a list whose roots are known in advance
    pub fn with_roots(paths: impl IntoIterator<Item = Path>, roots: Vec<String>) -> Self {
        Self {
            list: paths.into_iter().collect(),
            roots: OnceLock::from(roots),
        }
    }

    /// Join each of `relative_paths` beneath `root`
    pub fn directory<I, S>(root: &str, relative_paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self::with_roots(
            relative_paths
                .into_iter()
                .map(|relative| Path::join(root, relative)),
            vec![root.to_string()],
        )
    }

    pub fn as_slice(&self) -> &[Path] {
        &self.list
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }
}

impl Path {
    /// Explicit list of children of this path
    pub fn list<I, S>(&self, relative_paths: I) -> Paths
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Paths::directory(self.full_path(), relative_paths)
    }
}

impl FileList for Paths {
    fn iter(&self) -> Box<dyn Iterator<Item = Path> + '_> {
        Box::new(self.list.iter().cloned())
    }

    fn contains(&self, path: &Path) -> bool {
        self.list.contains(path)
    }

    fn rebase(&self, root: &str) -> List {
        List::Paths(Paths::with_roots(
            self.list.iter().map(|path| path.rebase(root)),
            vec![root.to_string()],
        ))
    }

    fn roots(&self) -> Vec<String> {
        self.roots
            .get_or_init(|| {
                let mut roots: Vec<String> = self.list.iter().map(|p| p.root().to_string()).collect();
                roots.sort();
                roots.dedup();
                roots
            })
            .clone()
    }

    fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    fn count(&self) -> usize {
        self.list.len()
    }

    fn to_paths(&self) -> List {
        List::Paths(self.clone())
    }
}

impl Default for Paths {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PartialEq for Paths {
    fn eq(&self, other: &Self) -> bool {
        self.list == other.list
    }
}

impl Eq for Paths {}

impl Hash for Paths {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.list.hash(state);
    }
}

impl fmt::Debug for Paths {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Paths {:?}>", self.list)
    }
}

impl FromIterator<Path> for Paths {
    fn from_iter<T: IntoIterator<Item = Path>>(iter: T) -> Self {
        Self::new(iter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path() -> Path {
        Path::with_root("/foo/bar/baz", "/foo")
    }

    #[test]
    fn test_insertion_order() {
        let paths = Paths::new([Path::new("/z"), Path::new("/a"), Path::new("/m")]);
        let order: Vec<String> = paths.iter().map(|p| p.to_string()).collect();
        assert_eq!(order, vec!["/z", "/a", "/m"]);
    }

    #[test]
    fn test_count_and_contains() {
        let paths = Paths::new([path()]);
        assert_eq!(paths.count(), 1);
        assert!(paths.contains(&path()));
        assert!(!paths.contains(&Path::join("/foo/bar", "baz")));
    }

    #[test]
    fn test_to_paths_is_identity() {
        let paths = Paths::new([path()]);
        assert_eq!(paths.to_paths(), List::Paths(paths));
    }

    #[test]
    fn test_debug_includes_members() {
        let paths = Paths::new([path()]);
        assert!(format!("{:?}", paths).contains(&format!("{:?}", path())));
    }

    #[test]
    fn test_directory_constructor() {
        let paths = Paths::directory("/foo", ["bar", "baz", "bob"]);
        assert_eq!(paths.count(), 3);
        assert!(paths.contains(&Path::join("/foo", "bar")));
        assert_eq!(paths.roots(), vec!["/foo".to_string()]);
    }

    #[test]
    fn test_path_list_helper() {
        let paths = Path::new("/foo/bar").list(["baz", "qux"]);
        assert_eq!(paths.count(), 2);
        assert_eq!(paths.as_slice()[0].root(), "/foo/bar");
    }

    #[test]
    fn test_roots_deduplicated() {
        let paths = Paths::new([
            Path::join("/a", "x"),
            Path::join("/b", "y"),
            Path::join("/a", "z"),
        ]);
        assert_eq!(paths.roots(), vec!["/a".to_string(), "/b".to_string()]);
    }

    #[test]
    fn test_rebase_caches_new_root() {
        let paths = Paths::directory("/src", ["a.c", "b.c"]);
        let rebased = paths.rebase("/build");
        assert_eq!(rebased.roots(), vec!["/build".to_string()]);
        assert_eq!(rebased.first().unwrap().full_path(), "/build/a.c");
    }
}
