//! Buildfiles CLI - bf command

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cmd;

/// Buildfiles - file lists, staleness checks and change watching
#[derive(Parser)]
#[command(name = "bf")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the files below a directory
    List {
        /// Directory to list
        root: String,

        /// Only include files matching this pattern (relative to the root)
        #[arg(long)]
        glob: Option<String>,

        /// Leave out files matching this pattern; may be repeated
        #[arg(long)]
        exclude: Vec<String>,

        /// Print absolute paths instead of paths relative to the root
        #[arg(long)]
        absolute: bool,
    },
    /// Check whether outputs are older than their inputs (exit 1 when dirty)
    Dirty {
        /// Inputs as ROOT:PATTERN globs or plain file paths
        #[arg(long, required = true, num_args = 1..)]
        inputs: Vec<String>,

        /// Output files that are expected to exist
        #[arg(long, required = true, num_args = 1..)]
        outputs: Vec<String>,
    },
    /// Watch directories and print changes as they happen
    Watch {
        /// Directories to watch
        #[arg(required = true)]
        directories: Vec<String>,

        /// Driver to use: native or polling
        #[arg(long)]
        driver: Option<String>,

        /// Poll interval / event coalescing window in milliseconds
        #[arg(long)]
        latency_ms: Option<u64>,

        /// TOML file with monitor settings
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the shortest relative path from one location to another
    Relative {
        /// Target path
        path: String,

        /// Location to express the path from
        from: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    match cli.command {
        Commands::List { root, glob, exclude, absolute } => {
            cmd::list::run(&root, glob.as_deref(), &exclude, absolute)
        }
        Commands::Dirty { inputs, outputs } => {
            if cmd::dirty::run(&inputs, &outputs)? {
                std::process::exit(1);
            }
            Ok(())
        }
        Commands::Watch { directories, driver, latency_ms, config } => {
            cmd::watch::run(&directories, driver.as_deref(), latency_ms, config.as_deref())
        }
        Commands::Relative { path, from } => cmd::relative::run(&path, &from),
    }
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
