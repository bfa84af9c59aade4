//! Watch directories and report changes

use super::resolve_root;
use anyhow::{Context, Result};
use buildfiles_core::{Directory, State};
use buildfiles_watcher::{Driver, Monitor, MonitorConfig};
use owo_colors::OwoColorize;
use std::ops::ControlFlow;
use std::path::Path;
use tracing::{info, warn};

pub fn run(
    directories: &[String],
    driver: Option<&str>,
    latency_ms: Option<u64>,
    config_path: Option<&Path>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => MonitorConfig::load(path)
            .with_context(|| format!("Failed to load monitor config from {}", path.display()))?,
        None => MonitorConfig::default(),
    };

    if let Some(driver) = driver {
        config.driver = driver.parse::<Driver>()?;
    }
    if let Some(latency_ms) = latency_ms {
        config.latency_ms = latency_ms;
    }

    let monitor = Monitor::new();

    for directory in directories {
        let root = resolve_root(directory)?;

        if !Path::new(root.full_path()).is_dir() {
            warn!("{} is not a directory, watching it anyway", root);
        }

        let label = root.full_path().to_string();
        monitor.track_changes(Directory::new(root), move |state| report(&label, state));
    }

    println!(
        "Watching {} {} with the {} driver (Ctrl-C to stop)",
        monitor.roots().len(),
        if monitor.roots().len() == 1 { "directory" } else { "directories" },
        config.driver
    );
    info!("Monitor config: {:?}", config);

    monitor
        .run(&config, || ControlFlow::Continue(()))
        .context("Watch driver failed")
}

fn report(root: &str, state: &State) {
    for path in state.added() {
        println!("{} {}", "+".green(), path.shortest_path(root));
    }
    for path in state.changed() {
        println!("{} {}", "~".yellow(), path.shortest_path(root));
    }
    for path in state.removed() {
        println!("{} {}", "-".red(), path.shortest_path(root));
    }
}
