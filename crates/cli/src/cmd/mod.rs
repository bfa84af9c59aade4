//! CLI command implementations

pub mod dirty;
pub mod list;
pub mod relative;
pub mod watch;

use anyhow::{Context, Result};
use buildfiles_core::Path;

/// Resolve a command-line path against the working directory
pub fn resolve(argument: &str) -> Result<Path> {
    let current = Path::current().context("Failed to determine the working directory")?;
    Ok(Path::expand(argument, current.full_path()))
}

/// Resolve a directory argument so that it is also the root of its members
pub fn resolve_root(argument: &str) -> Result<Path> {
    let path = resolve(argument)?;
    Ok(Path::with_root(path.full_path(), path.full_path()))
}
