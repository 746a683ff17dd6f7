//! CLI command execution helpers with automatic timing
//!
//! Wraps the `gtm-bridge` binary built for this test run, measures execution
//! time and parses the JSON notices it writes to stdout.

use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

/// CLI command builder with timing
pub struct BridgeCommand {
    binary_path: PathBuf,
    working_dir: PathBuf,
    args: Vec<String>,
    env: HashMap<String, String>,
    stdin_data: Option<Vec<u8>>,
    stdin_path: Option<PathBuf>,
}

impl BridgeCommand {
    /// Create a new command in the given working directory
    pub fn new(working_dir: impl AsRef<Path>) -> Self {
        Self {
            binary_path: PathBuf::from(env!("CARGO_BIN_EXE_gtm-bridge")),
            working_dir: working_dir.as_ref().to_path_buf(),
            args: Vec::new(),
            env: HashMap::new(),
            stdin_data: None,
            stdin_path: None,
        }
    }

    /// Add command arguments
    pub fn args(&mut self, args: &[&str]) -> &mut Self {
        self.args.extend(args.iter().map(|s| s.to_string()));
        self
    }

    /// Set environment variable
    pub fn env(&mut self, key: &str, value: &str) -> &mut Self {
        self.env.insert(key.to_string(), value.to_string());
        self
    }

    /// Provide stdin data; stdin is closed after it is written
    pub fn stdin(&mut self, data: &str) -> &mut Self {
        self.stdin_bytes(data.as_bytes())
    }

    /// Provide raw stdin bytes, which need not be valid UTF-8
    pub fn stdin_bytes(&mut self, data: &[u8]) -> &mut Self {
        self.stdin_data = Some(data.to_vec());
        self
    }

    /// Attach stdin to a file opened from `path` instead of a pipe
    pub fn stdin_from(&mut self, path: impl AsRef<Path>) -> &mut Self {
        self.stdin_path = Some(path.as_ref().to_path_buf());
        self
    }

    /// Execute command and return result with timing
    pub fn execute(&self) -> Result<CommandResult> {
        let start = Instant::now();

        let stdin = match &self.stdin_path {
            Some(path) => Stdio::from(
                File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
            ),
            None => Stdio::piped(),
        };

        let mut child = Command::new(&self.binary_path)
            .args(&self.args)
            .current_dir(&self.working_dir)
            .envs(&self.env)
            .stdin(stdin)
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .context("Failed to spawn gtm-bridge")?;

        if let Some(mut stdin) = child.stdin.take() {
            if let Some(data) = &self.stdin_data {
                stdin.write_all(data)?;
            }
            // Dropping closes the pipe, which ends a `run` session
        }

        let output = child
            .wait_with_output()
            .context("Failed to wait for gtm-bridge")?;

        Ok(CommandResult {
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            exit_code: output.status.code().unwrap_or(-1),
            duration: start.elapsed(),
        })
    }

    /// Execute and assert success
    pub fn assert_success(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if !result.success() {
            anyhow::bail!(
                "Command failed (exit code: {}):\nArgs: {:?}\nStdout: {}\nStderr: {}",
                result.exit_code,
                self.args,
                result.stdout,
                result.stderr
            );
        }

        Ok(result)
    }

    /// Execute and expect failure
    pub fn assert_failure(&self) -> Result<CommandResult> {
        let result = self.execute()?;

        if result.success() {
            anyhow::bail!(
                "Command should have failed but succeeded:\nArgs: {:?}\nStdout: {}",
                self.args,
                result.stdout
            );
        }

        Ok(result)
    }
}

/// Command execution result with timing
#[derive(Debug, Clone)]
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub duration: Duration,
}

/// One notice line from a `run` session
#[derive(Debug, Clone, PartialEq, Eq, serde::Deserialize)]
pub struct NoticeLine {
    pub kind: String,
    pub text: String,
}

impl CommandResult {
    /// Check if command succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Check if stdout contains text
    pub fn contains_stdout(&self, text: &str) -> bool {
        self.stdout.contains(text)
    }

    /// Check if stderr contains text
    pub fn contains_stderr(&self, text: &str) -> bool {
        self.stderr.contains(text)
    }

    /// Parse every stdout line as a notice
    pub fn notices(&self) -> Vec<NoticeLine> {
        self.stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).expect("stdout line is a JSON notice"))
            .collect()
    }

    /// Notices of one kind
    pub fn notices_of(&self, kind: &str) -> Vec<NoticeLine> {
        self.notices().into_iter().filter(|n| n.kind == kind).collect()
    }
}

/// Macro for convenient command construction
///
/// Usage:
/// ```ignore
/// bridge!(dir, "probe").assert_success()?;
/// bridge!(dir, "run").stdin(events).assert_success()?;
/// ```
#[macro_export]
macro_rules! bridge {
    ($dir:expr, $($arg:expr),*) => {{
        let mut cmd = $crate::common::cli::BridgeCommand::new($dir);
        cmd.args(&[$($arg),*]);
        cmd
    }};
}
