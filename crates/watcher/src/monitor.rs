//! Change registrations keyed by watched root
//!
//! A root is watched while at least one handle is registered under it.
//! Both transitions (first handle added, last handle removed) raise the
//! `updated` flag so a running driver knows to rebuild its watch set.
//!
//! Handles removed while `update` is notifying are queued and purged once
//! the batch completes, so a callback may remove its own handle.
//!
//! No handle lock is held while a callback runs. A callback may commit or
//! inspect its own handle and may call `update` again; a handle reached
//! again from inside its own callback is re-checked once that callback
//! returns.

use crate::config::{Driver, MonitorConfig};
use crate::driver::{NativeDriver, PollingDriver, WatchDriver};
use crate::error::Result;
use buildfiles_core::{FileList, List, State};
use parking_lot::{Mutex, MutexGuard};
use std::collections::BTreeMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::ControlFlow;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};
use tracing::{debug, trace, warn};

/// Called with a copy of the handle's state whenever an update reports changes
pub type ChangeCallback = Box<dyn FnMut(&State) + Send>;

#[derive(Default)]
struct Registry {
    directories: BTreeMap<String, Vec<Handle>>,
    updated: bool,

    /// Nesting depth of `update` calls; deletions are deferred while non-zero
    batch_depth: usize,
    deferred: Vec<Handle>,
}

impl Registry {
    fn add(&mut self, handle: &Handle, roots: Vec<String>) {
        for root in roots {
            let handles = self.directories.entry(root).or_default();

            if handles.contains(handle) {
                continue;
            }

            handles.push(handle.clone());

            if handles.len() == 1 {
                self.updated = true;
            }
        }
    }

    fn delete(&mut self, handle: &Handle) {
        if self.batch_depth > 0 {
            if !self.deferred.contains(handle) {
                self.deferred.push(handle.clone());
            }
        } else {
            self.purge(handle);
        }
    }

    fn purge(&mut self, handle: &Handle) {
        let mut emptied = Vec::new();

        for (root, handles) in self.directories.iter_mut() {
            handles.retain(|other| other != handle);
            if handles.is_empty() {
                emptied.push(root.clone());
            }
        }

        for root in emptied {
            debug!("No handles left for {}", root);
            self.directories.remove(&root);
            self.updated = true;
        }
    }

    fn is_pending_deletion(&self, handle: &Handle) -> bool {
        self.deferred.contains(handle)
    }
}

struct HandleInner {
    id: u64,
    state: Mutex<State>,
    /// Locked for the duration of a callback
    on_changed: Mutex<ChangeCallback>,
    /// Set when `changed` is called while the callback is running
    recheck: AtomicBool,
    registry: Weak<Mutex<Registry>>,
}

/// A registered list and its change callback
///
/// Cloning yields another reference to the same registration.
#[derive(Clone)]
pub struct Handle {
    inner: Arc<HandleInner>,
}

impl Handle {
    /// Re-snapshot; invoke the callback if anything changed
    ///
    /// While the callback is running, further calls only flag the handle;
    /// the running call then re-checks before returning.
    pub fn changed(&self) -> bool {
        let mut fired = false;

        loop {
            let Some(mut on_changed) = self.inner.on_changed.try_lock() else {
                trace!("Handle {} is notifying, re-check queued", self.inner.id);
                self.inner.recheck.store(true, Ordering::SeqCst);
                return fired;
            };
            self.inner.recheck.store(false, Ordering::SeqCst);

            if let Some(snapshot) = self.snapshot_if_changed() {
                (*on_changed)(&snapshot);
                fired = true;
            }
            drop(on_changed);

            if !self.inner.recheck.load(Ordering::SeqCst) {
                return fired;
            }
        }
    }

    fn snapshot_if_changed(&self) -> Option<State> {
        let mut state = self.inner.state.lock();
        state.update().then(|| state.clone())
    }

    /// Re-snapshot without notifying, e.g. after the caller rebuilt outputs itself
    pub fn commit(&self) {
        self.inner.state.lock().update();
    }

    /// The roots this handle is registered under
    pub fn directories(&self) -> Vec<String> {
        self.inner.state.lock().files().roots()
    }

    /// Current snapshot
    ///
    /// Do not hold the guard across `changed` or `commit` on the same handle.
    pub fn state(&self) -> MutexGuard<'_, State> {
        self.inner.state.lock()
    }

    /// Unregister from the owning monitor
    pub fn remove(&self) {
        match self.inner.registry.upgrade() {
            Some(registry) => registry.lock().delete(self),
            None => debug!("Handle {} outlived its monitor", self.inner.id),
        }
    }
}

impl PartialEq for Handle {
    fn eq(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl Eq for Handle {}

impl Hash for Handle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.inner.id.hash(state);
    }
}

impl fmt::Debug for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<Handle {}>", self.inner.id)
    }
}

/// Tracks lists of files and notifies when the directories holding them change
#[derive(Clone, Default)]
pub struct Monitor {
    registry: Arc<Mutex<Registry>>,
    next_id: Arc<AtomicU64>,
}

impl Monitor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot `files` and call `on_changed` whenever a later update differs
    pub fn track_changes<F>(&self, files: impl Into<List>, on_changed: F) -> Handle
    where
        F: FnMut(&State) + Send + 'static,
    {
        let handle = Handle {
            inner: Arc::new(HandleInner {
                id: self.next_id.fetch_add(1, Ordering::Relaxed),
                state: Mutex::new(State::new(files)),
                on_changed: Mutex::new(Box::new(on_changed)),
                recheck: AtomicBool::new(false),
                registry: Arc::downgrade(&self.registry),
            }),
        };

        self.add(&handle);
        handle
    }

    /// Register `handle` under each of its roots
    pub fn add(&self, handle: &Handle) {
        let roots = handle.directories();
        self.registry.lock().add(handle, roots);
    }

    /// Unregister `handle`; deferred until the current `update` finishes
    pub fn delete(&self, handle: &Handle) {
        self.registry.lock().delete(handle);
    }

    /// Every watched root, sorted
    pub fn roots(&self) -> Vec<String> {
        self.registry.lock().directories.keys().cloned().collect()
    }

    /// Handles registered under `root`
    pub fn handles(&self, root: &str) -> Vec<Handle> {
        self.registry
            .lock()
            .directories
            .get(root)
            .cloned()
            .unwrap_or_default()
    }

    /// True if the set of roots changed since the flag was last taken
    pub fn updated(&self) -> bool {
        self.registry.lock().updated
    }

    /// Read and clear the `updated` flag
    pub fn take_updated(&self) -> bool {
        std::mem::take(&mut self.registry.lock().updated)
    }

    /// Notify every handle registered under `directories`
    ///
    /// Each handle is checked at most once per call, even when registered
    /// under several of the given roots.
    pub fn update<I>(&self, directories: I)
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let handles = {
            let mut registry = self.registry.lock();
            registry.batch_depth += 1;

            let mut handles: Vec<Handle> = Vec::new();
            for directory in directories {
                if let Some(registered) = registry.directories.get(directory.as_ref()) {
                    for handle in registered {
                        if !handles.contains(handle) {
                            handles.push(handle.clone());
                        }
                    }
                }
            }
            handles
        };

        for handle in &handles {
            // Removed by an earlier callback in this batch
            if self.registry.lock().is_pending_deletion(handle) {
                continue;
            }
            handle.changed();
        }

        let mut registry = self.registry.lock();
        registry.batch_depth -= 1;

        if registry.batch_depth == 0 {
            for handle in std::mem::take(&mut registry.deferred) {
                registry.purge(&handle);
            }
        }
    }

    /// Drive updates until `callback` breaks
    ///
    /// The driver comes from `config`. When the native watcher cannot start
    /// and `fallback_to_polling` is set, polling is used instead.
    pub fn run<F>(&self, config: &MonitorConfig, mut callback: F) -> Result<()>
    where
        F: FnMut() -> ControlFlow<()>,
    {
        let mut driver: Box<dyn WatchDriver> = match config.driver {
            Driver::Polling => Box::new(PollingDriver::new(config.latency())),
            Driver::Native => match NativeDriver::start(self, config.latency()) {
                Ok(driver) => Box::new(driver),
                Err(error) if config.fallback_to_polling => {
                    warn!("{}; falling back to polling", error);
                    Box::new(PollingDriver::new(config.latency()))
                }
                Err(error) => return Err(error),
            },
        };

        driver.run(self, &mut callback)
    }
}

impl fmt::Debug for Monitor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitor").field("roots", &self.roots()).finish()
    }
}
