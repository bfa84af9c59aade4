//! Answer a staleness query

use super::{resolve, resolve_root};
use anyhow::{Context, Result};
use buildfiles_core::{Composite, Glob, List, Paths, State};
use owo_colors::OwoColorize;

/// Prints `dirty` or `clean`; returns true when dirty
pub fn run(inputs: &[String], outputs: &[String]) -> Result<bool> {
    let mut input_lists = Vec::with_capacity(inputs.len());
    for input in inputs {
        input_lists.push(parse_input(input)?);
    }

    let mut output_paths = Vec::with_capacity(outputs.len());
    for output in outputs {
        output_paths.push(resolve(output)?);
    }

    let inputs = State::new(Composite::new(input_lists));
    let outputs = State::new(Paths::new(output_paths));

    let dirty = outputs.dirty(&inputs);

    if dirty {
        println!("{}", "dirty".red());
        for missing in outputs.missing() {
            println!("  missing: {}", missing);
        }
        if let (Some(newest), Some(oldest)) = (inputs.newest_time(), outputs.oldest_time()) {
            if newest.time > oldest.time {
                println!("  {} is newer than {}", newest.path, oldest.path);
            }
        }
    } else {
        println!("{}", "clean".green());
    }

    Ok(dirty)
}

/// `ROOT:PATTERN` becomes a glob, anything else a single file
fn parse_input(input: &str) -> Result<List> {
    match input.rsplit_once(':') {
        Some((root, pattern)) if !root.is_empty() && !pattern.is_empty() => {
            let root = resolve_root(root)?;
            let glob = Glob::new(root, pattern).with_context(|| format!("Invalid input pattern '{}'", input))?;
            Ok(glob.into())
        }
        _ => Ok(List::from(resolve(input)?)),
    }
}
