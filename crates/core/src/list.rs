//! The file list contract and its closed set of variants
//!
//! Every list kind produces a sequence of `Path` values. The traversal is
//! lazy and restartable: `iter()` builds a fresh iterator on each call, and
//! `for_each_path` drives the same iterator with a callback.
//!
//! `List` is the owned sum type used wherever lists are stored or combined.
//! `+` builds a `Composite`, `-` builds a `Difference`.

use crate::composite::Composite;
use crate::difference::Difference;
use crate::directory::Directory;
use crate::glob::Glob;
use crate::path::{Path, WithOptions};
use crate::paths::Paths;
use std::fmt;
use std::ops::{Add, Sub};
use std::sync::OnceLock;

/// Anything that produces a sequence of paths
pub trait FileList {
    /// Enumerate members from the start
    fn iter(&self) -> Box<dyn Iterator<Item = Path> + '_>;

    /// Membership test
    ///
    /// Pattern and prefix based for `Glob` and `Directory`; the path does
    /// not have to exist.
    fn contains(&self, path: &Path) -> bool;

    /// Move every member to `root`, keeping relative offsets
    fn rebase(&self, root: &str) -> List {
        List::Paths(Paths::with_roots(
            self.iter().map(|path| path.rebase(root)),
            vec![root.to_string()],
        ))
    }

    /// Unique directories the members are anchored to
    fn roots(&self) -> Vec<String> {
        let mut roots: Vec<String> = self.iter().map(|path| path.root().to_string()).collect();
        roots.sort();
        roots.dedup();
        roots
    }

    /// True if the sequence yields nothing; stops at the first member
    fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    fn count(&self) -> usize {
        self.iter().count()
    }

    fn first(&self) -> Option<Path> {
        self.iter().next()
    }

    /// True if any member of `other` is contained in this list
    fn intersects(&self, other: &dyn FileList) -> bool {
        other.iter().any(|path| self.contains(&path))
    }

    /// Materialize into an explicit list
    fn to_paths(&self) -> List {
        List::Paths(Paths::new(self.iter()))
    }

    /// Compare materialized, sorted contents
    fn same_contents(&self, other: &dyn FileList) -> bool {
        let mut ours: Vec<Path> = self.iter().collect();
        let mut theirs: Vec<Path> = other.iter().collect();
        ours.sort();
        theirs.sort();
        ours == theirs
    }

    /// Callback form of `iter`
    fn for_each_path<F>(&self, f: F)
    where
        Self: Sized,
        F: FnMut(Path),
    {
        self.iter().for_each(f);
    }

    /// Rewrite every member with `Path::with`
    fn with(&self, options: &WithOptions) -> Paths
    where
        Self: Sized,
    {
        self.with_each(options, |_, _| {})
    }

    /// Rewrite every member, passing each `(original, updated)` pair to `f`
    fn with_each<F>(&self, options: &WithOptions, mut f: F) -> Paths
    where
        Self: Sized,
        F: FnMut(&Path, &Path),
    {
        Paths::new(self.iter().map(|path| {
            let updated = path.with(options);
            f(&path, &updated);
            updated
        }))
    }

    /// Map members into a new explicit list
    fn map_paths<F>(&self, f: F) -> Paths
    where
        Self: Sized,
        F: FnMut(Path) -> Path,
    {
        Paths::new(self.iter().map(f))
    }
}

/// An owned, immutable file list
///
/// Equality and hashing are structural within a variant; lists of different
/// kinds are never equal (use `same_contents` to compare members).
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum List {
    Paths(Paths),
    Directory(Directory),
    Glob(Glob),
    Composite(Composite),
    Difference(Difference),
}

static NONE: OnceLock<List> = OnceLock::new();

impl List {
    /// The shared empty list
    pub fn none() -> &'static List {
        NONE.get_or_init(|| List::Composite(Composite::default()))
    }

    fn as_dyn(&self) -> &dyn FileList {
        match self {
            List::Paths(list) => list,
            List::Directory(list) => list,
            List::Glob(list) => list,
            List::Composite(list) => list,
            List::Difference(list) => list,
        }
    }
}

impl FileList for List {
    fn iter(&self) -> Box<dyn Iterator<Item = Path> + '_> {
        self.as_dyn().iter()
    }

    fn contains(&self, path: &Path) -> bool {
        self.as_dyn().contains(path)
    }

    fn rebase(&self, root: &str) -> List {
        self.as_dyn().rebase(root)
    }

    fn roots(&self) -> Vec<String> {
        self.as_dyn().roots()
    }

    fn is_empty(&self) -> bool {
        self.as_dyn().is_empty()
    }

    fn count(&self) -> usize {
        self.as_dyn().count()
    }

    fn to_paths(&self) -> List {
        self.as_dyn().to_paths()
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            List::Paths(list) => fmt::Debug::fmt(list, f),
            List::Directory(list) => fmt::Debug::fmt(list, f),
            List::Glob(list) => fmt::Debug::fmt(list, f),
            List::Composite(list) => fmt::Debug::fmt(list, f),
            List::Difference(list) => fmt::Debug::fmt(list, f),
        }
    }
}

impl From<Paths> for List {
    fn from(list: Paths) -> Self {
        List::Paths(list)
    }
}

impl From<Directory> for List {
    fn from(list: Directory) -> Self {
        List::Directory(list)
    }
}

impl From<Glob> for List {
    fn from(list: Glob) -> Self {
        List::Glob(list)
    }
}

impl From<Composite> for List {
    fn from(list: Composite) -> Self {
        List::Composite(list)
    }
}

impl From<Difference> for List {
    fn from(list: Difference) -> Self {
        List::Difference(list)
    }
}

impl From<&List> for List {
    fn from(list: &List) -> Self {
        list.clone()
    }
}

/// Bare paths become an explicit `Paths` list
impl From<Vec<Path>> for List {
    fn from(paths: Vec<Path>) -> Self {
        List::Paths(Paths::new(paths))
    }
}

impl From<Path> for List {
    fn from(path: Path) -> Self {
        List::Paths(Paths::new([path]))
    }
}

impl<T: Into<List>> Add<T> for List {
    type Output = List;

    fn add(self, other: T) -> List {
        List::Composite(Composite::new([self, other.into()]))
    }
}

impl<T: Into<List>> Sub<T> for List {
    type Output = List;

    fn sub(self, other: T) -> List {
        match self {
            List::Difference(difference) => List::Difference(difference.subtract(other)),
            list => List::Difference(Difference::new(list, other)),
        }
    }
}

/// `+` and `-` on the concrete list types, via `List`
macro_rules! list_operators {
    ($($kind:ty),*) => {
        $(
            impl<T: Into<List>> Add<T> for $kind {
                type Output = List;

                fn add(self, other: T) -> List {
                    List::from(self) + other
                }
            }

            impl<T: Into<List>> Sub<T> for $kind {
                type Output = List;

                fn sub(self, other: T) -> List {
                    List::from(self) - other
                }
            }
        )*
    };
}

list_operators!(Paths, Directory, Glob, Composite, Difference);
