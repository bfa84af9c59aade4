//! Lists with exclusions applied

use crate::composite::Composite;
use crate::list::{FileList, List};
use crate::path::Path;
use std::fmt;
use std::sync::Arc;

/// Members of `list` not contained in `excludes`
///
/// Subtracting from a `Difference` grows the exclusion set instead of
/// nesting another difference.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Difference {
    list: Arc<List>,
    excludes: Arc<List>,
}

impl Difference {
    pub fn new(list: impl Into<List>, excludes: impl Into<List>) -> Self {
        Self {
            list: Arc::new(list.into()),
            excludes: Arc::new(excludes.into()),
        }
    }

    /// The base list
    pub fn list(&self) -> &List {
        &self.list
    }

    pub fn excludes(&self) -> &List {
        &self.excludes
    }

    /// Same base, with `list` added to the exclusions
    pub fn subtract(&self, list: impl Into<List>) -> Self {
        let excludes = Composite::new([List::clone(&self.excludes), list.into()]);

        Self {
            list: Arc::clone(&self.list),
            excludes: Arc::new(List::Composite(excludes)),
        }
    }
}

impl FileList for Difference {
    fn iter(&self) -> Box<dyn Iterator<Item = Path> + '_> {
        Box::new(self.list.iter().filter(move |path| !self.excludes.contains(path)))
    }

    fn contains(&self, path: &Path) -> bool {
        self.list.contains(path) && !self.excludes.contains(path)
    }

    fn rebase(&self, root: &str) -> List {
        List::Difference(Difference::new(self.list.rebase(root), self.excludes.rebase(root)))
    }

    /// The base list's roots; exclusions never add watched locations
    fn roots(&self) -> Vec<String> {
        self.list.roots()
    }
}

impl fmt::Debug for Difference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Difference {:?} - {:?}>", self.list, self.excludes)
    }
}
