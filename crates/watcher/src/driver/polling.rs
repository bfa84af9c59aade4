//! Fixed-interval polling

use super::WatchDriver;
use crate::error::Result;
use crate::monitor::Monitor;
use std::ops::ControlFlow;
use std::thread;
use std::time::Duration;
use tracing::{debug, info};

/// Re-checks every watched root, then sleeps for the latency
///
/// Works everywhere, at the cost of a stat per tracked file per tick.
pub struct PollingDriver {
    latency: Duration,
}

impl PollingDriver {
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }
}

impl WatchDriver for PollingDriver {
    fn run(&mut self, monitor: &Monitor, callback: &mut dyn FnMut() -> ControlFlow<()>) -> Result<()> {
        info!("Polling {} roots every {:?}", monitor.roots().len(), self.latency);

        loop {
            let roots = monitor.roots();
            debug!("Polling {:?}", roots);
            monitor.update(&roots);

            if callback().is_break() {
                return Ok(());
            }

            // Every tick re-reads the roots, so shape changes need no restart
            monitor.take_updated();

            thread::sleep(self.latency);
        }
    }
}
