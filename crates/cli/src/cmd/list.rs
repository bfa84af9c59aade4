//! List the members of a file set

use super::resolve_root;
use anyhow::{Context, Result};
use buildfiles_core::{Directory, FileList, Glob, List};
use tracing::debug;

pub fn run(root: &str, pattern: Option<&str>, excludes: &[String], absolute: bool) -> Result<()> {
    let root = resolve_root(root)?;

    let mut list: List = match pattern {
        Some(pattern) => Glob::new(root.clone(), pattern)
            .with_context(|| format!("Invalid --glob pattern '{}'", pattern))?
            .into(),
        None => Directory::new(root.clone()).into(),
    };

    for exclude in excludes {
        let glob = Glob::new(root.clone(), exclude)
            .with_context(|| format!("Invalid --exclude pattern '{}'", exclude))?;
        list = list - glob;
    }

    debug!("Listing {:?}", list);

    for path in list.iter() {
        if absolute {
            println!("{}", path);
        } else {
            println!("{}", path.relative_path());
        }
    }

    Ok(())
}
