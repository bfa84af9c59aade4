//! Modification-time snapshots and the staleness decision
//!
//! A `State` records the mtime of every existing member of a list. Each
//! `update` takes a fresh snapshot and classifies members against the
//! previous one:
//! - added: exists now, absent from the previous snapshot
//! - removed: in the previous snapshot, not visited this time
//! - changed: in both, with a different mtime
//! - missing: listed, but not on disk
//!
//! `outputs.dirty(&inputs)` compares the newest input against the oldest
//! output. Directories are tracked but never take part in that comparison.

use crate::list::{FileList, List};
use crate::path::Path;
use crate::paths::Paths;
use crate::system::{FileSystem, LocalFileSystem};
use ahash::{AHashSet, RandomState};
use indexmap::IndexMap;
use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, trace};

/// A file and the mtime it had when the snapshot was taken
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileTime {
    pub path: Path,
    pub time: SystemTime,
}

type Times = IndexMap<Path, SystemTime, RandomState>;

/// A list of files captured at a point in time
#[derive(Clone)]
pub struct State {
    files: List,
    filesystem: Arc<dyn FileSystem>,
    times: Times,

    added: Vec<Path>,
    removed: Vec<Path>,
    changed: Vec<Path>,
    missing: Vec<Path>,

    oldest_time: Option<FileTime>,
    newest_time: Option<FileTime>,
}

impl State {
    /// Snapshot `files` from the local disk
    pub fn new(files: impl Into<List>) -> Self {
        Self::with_filesystem(files, Arc::new(LocalFileSystem))
    }

    /// Snapshot `files` through a specific filesystem
    ///
    /// The initial snapshot is taken immediately, so every existing member
    /// starts out as `added`.
    pub fn with_filesystem(files: impl Into<List>, filesystem: Arc<dyn FileSystem>) -> Self {
        let mut state = Self {
            files: files.into(),
            filesystem,
            times: Times::default(),
            added: Vec::new(),
            removed: Vec::new(),
            changed: Vec::new(),
            missing: Vec::new(),
            oldest_time: None,
            newest_time: None,
        };

        state.update();
        state
    }

    /// The list being tracked
    pub fn files(&self) -> &List {
        &self.files
    }

    /// Re-snapshot and recompute every delta from scratch
    ///
    /// Returns true if anything was added, changed, removed or is missing.
    pub fn update(&mut self) -> bool {
        let mut last_times = std::mem::take(&mut self.times);
        let mut times = Times::default();
        let mut visited: AHashSet<Path> = AHashSet::new();

        let mut added = Vec::new();
        let mut changed = Vec::new();
        let mut missing = Vec::new();
        let mut file_times: Vec<FileTime> = Vec::new();

        for path in self.files.iter() {
            // A list may yield the same path twice
            if !visited.insert(path.clone()) {
                continue;
            }

            let modified_time = if self.filesystem.exists(&path) {
                self.filesystem.modified_time(&path).ok()
            } else {
                None
            };

            let Some(modified_time) = modified_time else {
                trace!("Missing: {}", path);
                missing.push(path);
                continue;
            };

            match last_times.swap_remove(&path) {
                Some(last_time) if last_time != modified_time => changed.push(path.clone()),
                Some(_) => {}
                None => added.push(path.clone()),
            }

            if !self.filesystem.is_dir(&path) {
                file_times.push(FileTime {
                    path: path.clone(),
                    time: modified_time,
                });
            }

            times.insert(path, modified_time);
        }

        let mut removed: Vec<Path> = last_times.into_keys().collect();
        removed.sort();

        self.oldest_time = file_times.iter().min_by_key(|file_time| file_time.time).cloned();
        self.newest_time = file_times.into_iter().max_by_key(|file_time| file_time.time);

        self.times = times;
        self.added = added;
        self.removed = removed;
        self.changed = changed;
        self.missing = missing;

        let dirty = self.has_changes();
        if dirty {
            debug!(
                "State update: {} added, {} removed, {} changed, {} missing",
                self.added.len(),
                self.removed.len(),
                self.changed.len(),
                self.missing.len()
            );
        }

        dirty
    }

    /// True if the last update saw any delta
    pub fn has_changes(&self) -> bool {
        !(self.added.is_empty() && self.removed.is_empty() && self.changed.is_empty() && self.missing.is_empty())
    }

    pub fn added(&self) -> &[Path] {
        &self.added
    }

    pub fn removed(&self) -> &[Path] {
        &self.removed
    }

    pub fn changed(&self) -> &[Path] {
        &self.changed
    }

    pub fn missing(&self) -> &[Path] {
        &self.missing
    }

    pub fn has_missing(&self) -> bool {
        !self.missing.is_empty()
    }

    /// The snapshot, in list order
    pub fn times(&self) -> &IndexMap<Path, SystemTime, RandomState> {
        &self.times
    }

    /// Oldest existing non-directory member
    pub fn oldest_time(&self) -> Option<&FileTime> {
        self.oldest_time.as_ref()
    }

    /// Newest existing non-directory member
    pub fn newest_time(&self) -> Option<&FileTime> {
        self.newest_time.as_ref()
    }

    /// Are these outputs stale with respect to `inputs`?
    pub fn dirty(&self, inputs: &State) -> bool {
        Self::is_dirty(inputs, self)
    }

    /// Staleness of `outputs` given `inputs`
    ///
    /// - any output missing: dirty
    /// - no tracked inputs or outputs: clean
    /// - otherwise dirty iff the newest input is newer than the oldest output,
    ///   or either time is unknown
    pub fn is_dirty(inputs: &State, outputs: &State) -> bool {
        if outputs.has_missing() {
            return true;
        }

        if inputs.times.is_empty() || outputs.times.is_empty() {
            return false;
        }

        match (inputs.newest_time(), outputs.oldest_time()) {
            (Some(newest_input), Some(oldest_output)) => newest_input.time > oldest_output.time,
            _ => true,
        }
    }
}

impl FileList for State {
    fn iter(&self) -> Box<dyn Iterator<Item = Path> + '_> {
        Box::new(self.times.keys().cloned())
    }

    fn contains(&self, path: &Path) -> bool {
        self.times.contains_key(path)
    }

    fn rebase(&self, root: &str) -> List {
        List::Paths(Paths::with_roots(
            self.times.keys().map(|path| path.rebase(root)),
            vec![root.to_string()],
        ))
    }

    fn roots(&self) -> Vec<String> {
        self.files.roots()
    }

    fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    fn count(&self) -> usize {
        self.times.len()
    }

    /// The snapshot's members, keeping the tracked list's roots
    fn to_paths(&self) -> List {
        List::Paths(Paths::with_roots(self.times.keys().cloned(), self.roots()))
    }
}

impl From<&State> for List {
    fn from(state: &State) -> Self {
        state.to_paths()
    }
}

impl From<State> for List {
    fn from(state: State) -> Self {
        state.to_paths()
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "<State Added:{:?} Removed:{:?} Changed:{:?} Missing:{:?}>",
            self.added, self.removed, self.changed, self.missing
        )
    }
}
