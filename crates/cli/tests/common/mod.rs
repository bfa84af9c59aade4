//! Helpers for driving the `bf` binary

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// `bf` invocation in a fixed working directory
pub struct BfCommand {
    working_dir: PathBuf,
    args: Vec<String>,
}

impl BfCommand {
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
        }
    }

    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    pub fn execute(&self) -> Result<CommandResult> {
        let output = Command::new(env!("CARGO_BIN_EXE_bf"))
            .args(&self.args)
            .current_dir(&self.working_dir)
            .output()
            .context("Failed to execute bf")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    /// Execute, expecting exit code `expected`
    pub fn assert_exit(&self, expected: i32) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.exit_code != expected {
            anyhow::bail!(
                "Expected exit code {}, got {}:\nArgs: {:?}\nStdout: {}\nStderr: {}",
                expected,
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    pub fn assert_success(&self) -> Result<CommandResult> {
        self.assert_exit(0)
    }
}

#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    /// Non-empty stdout lines, sorted
    pub fn sorted_lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .stdout
            .lines()
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        lines.sort();
        lines
    }
}

/// `bf!(dir, "list", ".")`
#[macro_export]
macro_rules! bf {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::BfCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}
