//! Change monitoring for buildfiles
//!
//! This crate provides:
//! - `Monitor`: registrations of file lists keyed by the roots they live under
//! - `Handle`: one list's snapshot plus the callback fired when it changes
//! - Native (OS event) and polling drivers that feed changed roots to a monitor
//! - `MonitorConfig`: TOML-loadable driver selection and latency

pub mod config;
pub mod driver;
pub mod error;
pub mod monitor;

pub use config::{Driver, MonitorConfig};
pub use driver::{NativeDriver, PollingDriver, WatchDriver};
pub use error::{Result, WatchError};
pub use monitor::{ChangeCallback, Handle, Monitor};
