//! Watch drivers
//!
//! A driver decides when the monitor's roots are re-checked. After each
//! batch of updates it hands control to the caller's callback, and returns
//! once the callback breaks.

mod native;
mod polling;

pub use native::NativeDriver;
pub use polling::PollingDriver;

use crate::error::Result;
use crate::monitor::Monitor;
use std::ops::ControlFlow;

/// A strategy for delivering changed-directory batches to a monitor
pub trait WatchDriver {
    /// Loop until `callback` returns `ControlFlow::Break`
    fn run(&mut self, monitor: &Monitor, callback: &mut dyn FnMut() -> ControlFlow<()>) -> Result<()>;
}
