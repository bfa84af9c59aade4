//! Ordered unions of lists

use crate::list::{FileList, List};
use crate::path::Path;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

/// Children iterated in order; duplicates across children are kept
///
/// Nested composites are spliced in at construction (one level), so
/// `Composite[Composite[x, y], z]` and `Composite[x, y, z]` are the same list.
#[derive(Clone)]
pub struct Composite {
    files: Arc<[List]>,
    roots: OnceLock<Vec<String>>,
}

impl Composite {
    pub fn new(lists: impl IntoIterator<Item = List>) -> Self {
        Self {
            files: flatten(lists),
            roots: OnceLock::new(),
        }
    }

    /// Create a composite whose roots are known in advance
    pub fn with_roots(lists: impl IntoIterator<Item = List>, roots: Vec<String>) -> Self {
        Self {
            files: flatten(lists),
            roots: OnceLock::from(roots),
        }
    }

    /// The child lists
    pub fn files(&self) -> &[List] {
        &self.files
    }

    /// Append a list; another composite is spliced in rather than nested
    pub fn join(&self, list: impl Into<List>) -> Self {
        Self::new(self.files.iter().cloned().chain(std::iter::once(list.into())))
    }
}

fn flatten(lists: impl IntoIterator<Item = List>) -> Arc<[List]> {
    let mut files = Vec::new();

    for list in lists {
        match list {
            List::Composite(composite) => files.extend(composite.files.iter().cloned()),
            list => files.push(list),
        }
    }

    files.into()
}

impl FileList for Composite {
    fn iter(&self) -> Box<dyn Iterator<Item = Path> + '_> {
        Box::new(self.files.iter().flat_map(|list| list.iter()))
    }

    fn contains(&self, path: &Path) -> bool {
        self.files.iter().any(|list| list.contains(path))
    }

    fn rebase(&self, root: &str) -> List {
        List::Composite(Composite::new(self.files.iter().map(|list| list.rebase(root))))
    }

    /// Union of the children's roots, first occurrence wins
    fn roots(&self) -> Vec<String> {
        self.roots
            .get_or_init(|| {
                let mut roots: Vec<String> = Vec::new();
                for root in self.files.iter().flat_map(|list| list.roots()) {
                    if !roots.contains(&root) {
                        roots.push(root);
                    }
                }
                roots
            })
            .clone()
    }

    fn is_empty(&self) -> bool {
        self.files.iter().all(|list| list.is_empty())
    }

    /// Materializes each child, keeping the composite shape
    fn to_paths(&self) -> List {
        let files = self.files.iter().map(|list| list.to_paths());
        match self.roots.get() {
            Some(roots) => List::Composite(Composite::with_roots(files, roots.clone())),
            None => List::Composite(Composite::new(files)),
        }
    }
}

impl Default for Composite {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl PartialEq for Composite {
    fn eq(&self, other: &Self) -> bool {
        self.files == other.files
    }
}

impl Eq for Composite {}

impl Hash for Composite {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.files.hash(state);
    }
}

impl fmt::Debug for Composite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Composite {:?}>", self.files)
    }
}
