//! Buildfiles Core - composable file lists and mtime-based staleness
//!
//! This crate provides:
//! - `Path`: an absolute location split into a root and a relative offset
//! - Lazy file lists (`Paths`, `Directory`, `Glob`, `Composite`, `Difference`)
//!   behind the `FileList` contract, combined with `+` and `-`
//! - `State`: mtime snapshots with added/removed/changed/missing deltas and
//!   the dirty/clean decision between inputs and outputs
//! - `FileSystem`: the per-path operations the above rely on

pub mod error;
pub mod path;
pub mod list;
pub mod paths;
pub mod directory;
pub mod glob;
pub mod composite;
pub mod difference;
pub mod state;
pub mod system;

// Re-export main types for convenience
pub use error::{FilesError, Result};
pub use path::{Basename, MatchOptions, Path, WithOptions};
pub use list::{FileList, List};
pub use paths::Paths;
pub use directory::Directory;
pub use glob::Glob;
pub use composite::Composite;
pub use difference::Difference;
pub use state::{FileTime, State};
pub use system::{FileSystem, LocalFileSystem};
