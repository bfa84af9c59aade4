//! OS event notifications through `notify`

use super::WatchDriver;
use crate::error::Result;
use crate::monitor::Monitor;
use crossbeam_channel::{unbounded, Receiver, Sender};
use notify::{recommended_watcher, Event, EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use std::collections::BTreeSet;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, trace, warn};

/// A monitor root and the form the OS reports it in
struct WatchedRoot {
    root: String,
    canonical: PathBuf,
}

impl WatchedRoot {
    fn new(root: String) -> Self {
        let canonical = std::fs::canonicalize(&root).unwrap_or_else(|_| PathBuf::from(&root));
        Self { root, canonical }
    }

    fn contains(&self, path: &Path) -> bool {
        path.starts_with(&self.canonical) || path.starts_with(&self.root)
    }
}

/// Waits for native events on every root, coalescing bursts
///
/// Events arriving within `latency` of the first one are delivered as a
/// single batch of changed roots. The watch set is rebuilt whenever the
/// monitor's roots change.
pub struct NativeDriver {
    latency: Duration,
    _watcher: RecommendedWatcher,
    watched: Vec<WatchedRoot>,
    sender: Sender<notify::Result<Event>>,
    receiver: Receiver<notify::Result<Event>>,
}

impl NativeDriver {
    /// Create the OS watcher and attach it to the monitor's current roots
    pub fn start(monitor: &Monitor, latency: Duration) -> Result<Self> {
        let (sender, receiver) = unbounded();

        monitor.take_updated();
        let (watcher, watched) = watch(monitor, sender.clone())?;

        Ok(Self {
            latency,
            _watcher: watcher,
            watched,
            sender,
            receiver,
        })
    }

    fn restart(&mut self, monitor: &Monitor) -> Result<()> {
        info!("Watched roots changed, restarting native watcher");
        let (watcher, watched) = watch(monitor, self.sender.clone())?;
        self._watcher = watcher;
        self.watched = watched;
        Ok(())
    }

    /// Block for one event, then gather whatever follows within the latency
    fn next_batch(&self) -> Option<BTreeSet<String>> {
        let first = self.receiver.recv().ok()?;

        let mut changed = BTreeSet::new();
        self.collect(first, &mut changed);

        let deadline = Instant::now() + self.latency;
        while let Ok(result) = self.receiver.recv_deadline(deadline) {
            self.collect(result, &mut changed);
        }

        Some(changed)
    }

    fn collect(&self, result: notify::Result<Event>, changed: &mut BTreeSet<String>) {
        let event = match result {
            Ok(event) => event,
            Err(error) => {
                // Events may have been dropped; re-check everything
                warn!("Native watcher error: {}", error);
                changed.extend(self.watched.iter().map(|watched| watched.root.clone()));
                return;
            }
        };

        if matches!(event.kind, EventKind::Access(_)) {
            return;
        }

        trace!("Event {:?} on {:?}", event.kind, event.paths);

        if event.paths.is_empty() {
            changed.extend(self.watched.iter().map(|watched| watched.root.clone()));
            return;
        }

        for path in &event.paths {
            for watched in self.watched.iter().filter(|watched| watched.contains(path)) {
                changed.insert(watched.root.clone());
            }
        }
    }
}

fn watch(monitor: &Monitor, sender: Sender<notify::Result<Event>>) -> Result<(RecommendedWatcher, Vec<WatchedRoot>)> {
    let mut watcher = recommended_watcher(move |result: notify::Result<Event>| {
        let _ = sender.send(result);
    })?;

    let mut watched = Vec::new();

    for root in monitor.roots() {
        let path = Path::new(&root);

        if !path.is_dir() {
            debug!("Not watching missing root {}", root);
            continue;
        }

        watcher.watch(path, RecursiveMode::Recursive)?;
        watched.push(WatchedRoot::new(root));
    }

    debug!("Native watcher attached to {} roots", watched.len());
    Ok((watcher, watched))
}

impl WatchDriver for NativeDriver {
    fn run(&mut self, monitor: &Monitor, callback: &mut dyn FnMut() -> ControlFlow<()>) -> Result<()> {
        loop {
            // The driver holds a sender, so the channel never disconnects
            let Some(changed) = self.next_batch() else {
                return Ok(());
            };

            if !changed.is_empty() {
                debug!("Changed roots: {:?}", changed);
                monitor.update(&changed);
            }

            if callback().is_break() {
                return Ok(());
            }

            if monitor.take_updated() {
                self.restart(monitor)?;
            }
        }
    }
}
