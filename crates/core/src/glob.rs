//! Wildcard matches below a root

use crate::error::{FilesError, Result};
use crate::list::{FileList, List};
use crate::path::{descendant_of, join_str, Path};
use crate::system::walk;
use globset::{GlobBuilder, GlobMatcher};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Files below `root` whose relative path matches a shell-style pattern
///
/// `*` and `?` stay within one path component, `**` spans directories, and
/// leading dots are matched like any other character.
#[derive(Clone)]
pub struct Glob {
    root: Path,
    pattern: String,
    matcher: GlobMatcher,
}

impl Glob {
    pub fn new(root: impl Into<Path>, pattern: &str) -> Result<Self> {
        let matcher = GlobBuilder::new(pattern)
            .literal_separator(true)
            .build()
            .map_err(|source| FilesError::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?
            .compile_matcher();

        Ok(Self {
            root: root.into(),
            pattern: pattern.to_string(),
            matcher,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Root and pattern joined
    pub fn full_pattern(&self) -> String {
        join_str(self.root.full_path(), &self.pattern)
    }

    /// How deep the walk has to go; unbounded when the pattern uses `**`
    fn max_depth(&self) -> Option<usize> {
        if self.pattern.contains("**") {
            None
        } else {
            Some(self.pattern.split('/').filter(|part| !part.is_empty()).count())
        }
    }
}

impl Path {
    /// Glob below this path
    pub fn glob(&self, pattern: &str) -> Result<Glob> {
        Glob::new(self.clone(), pattern)
    }
}

impl FileList for Glob {
    fn iter(&self) -> Box<dyn Iterator<Item = Path> + '_> {
        let root = self.root.full_path();
        Box::new(walk(root, self.max_depth()).filter_map(move |full_path| {
            let matched = descendant_of(root, &full_path).map_or(false, |relative| self.matcher.is_match(relative));
            matched.then(|| Path::with_root(full_path, root))
        }))
    }

    /// Pattern test only; the path need not exist
    fn contains(&self, path: &Path) -> bool {
        descendant_of(self.root.full_path(), path.full_path())
            .map_or(false, |relative| self.matcher.is_match(relative))
    }

    fn rebase(&self, root: &str) -> List {
        List::Glob(Glob {
            root: Path::new(root),
            pattern: self.pattern.clone(),
            matcher: self.matcher.clone(),
        })
    }

    fn roots(&self) -> Vec<String> {
        vec![self.root.full_path().to_string()]
    }
}

impl PartialEq for Glob {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.pattern == other.pattern
    }
}

impl Eq for Glob {}

impl Hash for Glob {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
        self.pattern.hash(state);
    }
}

impl fmt::Debug for Glob {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Glob {:?}/{:?}>", self.root.full_path(), self.pattern)
    }
}
