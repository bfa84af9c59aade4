//! Shortest relative path between two locations

use super::resolve;
use anyhow::Result;

pub fn run(path: &str, from: &str) -> Result<()> {
    let path = resolve(path)?;
    let from = resolve(from)?;

    println!("{}", path.shortest_path(from.full_path()));
    Ok(())
}
