//! Error types for buildfiles-watcher

use thiserror::Error;

/// Errors raised while configuring or running a watch driver
#[derive(Debug, Error)]
pub enum WatchError {
    /// The native event watcher could not be created or attached.
    #[error("Native watcher unavailable: {0}")]
    Driver(#[from] notify::Error),

    /// A configuration file did not parse.
    #[error("Invalid monitor configuration in {origin}: {source}")]
    Config {
        /// Where the configuration came from.
        origin: String,
        #[source]
        source: toml::de::Error,
    },

    /// A configuration file could not be read.
    #[error("IO error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// An unknown driver name.
    #[error("Unknown driver '{0}' (expected 'native' or 'polling')")]
    UnknownDriver(String),
}

pub type Result<T> = std::result::Result<T, WatchError>;
