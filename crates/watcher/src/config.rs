//! Monitor configuration
//!
//! Loaded from TOML, every field optional:
//!
//! ```toml
//! driver = "polling"
//! latency_ms = 250
//! fallback_to_polling = false
//! ```

use crate::error::{Result, WatchError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

/// How the monitor learns that directories changed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    /// OS event notifications (inotify, FSEvents, ReadDirectoryChangesW)
    Native,
    /// Re-check every watched root at a fixed interval
    Polling,
}

impl Default for Driver {
    fn default() -> Self {
        if cfg!(any(target_os = "linux", target_os = "macos", target_os = "windows")) {
            Driver::Native
        } else {
            Driver::Polling
        }
    }
}

impl FromStr for Driver {
    type Err = WatchError;

    fn from_str(name: &str) -> Result<Self> {
        match name.to_ascii_lowercase().as_str() {
            "native" => Ok(Driver::Native),
            "polling" => Ok(Driver::Polling),
            _ => Err(WatchError::UnknownDriver(name.to_string())),
        }
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::Native => write!(f, "native"),
            Driver::Polling => write!(f, "polling"),
        }
    }
}

/// Driver selection and timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonitorConfig {
    /// Driver to run (default: per platform)
    #[serde(default)]
    pub driver: Driver,

    /// Poll interval, and the window native events are coalesced over (default: 1000)
    #[serde(default = "default_latency_ms")]
    pub latency_ms: u64,

    /// Use polling when the native watcher cannot start (default: true)
    #[serde(default = "default_true")]
    pub fallback_to_polling: bool,
}

fn default_latency_ms() -> u64 {
    1000
}

fn default_true() -> bool {
    true
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            driver: Driver::default(),
            latency_ms: default_latency_ms(),
            fallback_to_polling: true,
        }
    }
}

impl MonitorConfig {
    /// Read a TOML configuration file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| WatchError::Io {
            path: path.display().to_string(),
            source,
        })?;

        Self::parse(&contents, &path.display().to_string())
    }

    /// Parse configuration held in memory
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse(contents, "<string>")
    }

    fn parse(contents: &str, origin: &str) -> Result<Self> {
        toml::from_str(contents).map_err(|source| WatchError::Config {
            origin: origin.to_string(),
            source,
        })
    }

    pub fn latency(&self) -> Duration {
        Duration::from_millis(self.latency_ms)
    }

    pub fn with_driver(mut self, driver: Driver) -> Self {
        self.driver = driver;
        self
    }

    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency_ms = latency.as_millis() as u64;
        self
    }
}
