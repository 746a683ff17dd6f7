//! User-level configuration file
//!
//! Lives at `<config dir>/gtm-bridge/config.toml` unless `--config` points
//! elsewhere. A missing file means defaults, which match the behavior of an
//! unconfigured install exactly.

use activity::TrackerConfig;
use anyhow::{Context, Result};
use bridge_core::{Tool, Version, DEFAULT_MINIMUM_VERSION, DEFAULT_PROGRAM};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAX_INTERVAL_MS: u64 = 86_400_000;
const MAX_GRACE_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SystemConfig {
    pub tool: ToolConfig,
    pub throttle: ThrottleConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    /// Program name (looked up on PATH) or absolute path
    pub program: String,
    pub minimum_version: String,
}

impl Default for ToolConfig {
    fn default() -> Self {
        Self {
            program: DEFAULT_PROGRAM.to_string(),
            minimum_version: DEFAULT_MINIMUM_VERSION.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleConfig {
    pub min_interval_ms: u64,
    pub record_initial: bool,
}

impl Default for ThrottleConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: 30_000,
            record_initial: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// How long to wait for in-flight gtm calls once the editor disconnects
    pub shutdown_grace_ms: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            shutdown_grace_ms: 2_000,
        }
    }
}

impl SystemConfig {
    /// Check value ranges
    pub fn validate(&self) -> Result<()> {
        if self.tool.program.trim().is_empty() {
            anyhow::bail!("tool.program must not be empty");
        }
        self.tool
            .minimum_version
            .parse::<Version>()
            .with_context(|| {
                format!(
                    "tool.minimum_version '{}' is not a version",
                    self.tool.minimum_version
                )
            })?;

        if !(1..=MAX_INTERVAL_MS).contains(&self.throttle.min_interval_ms) {
            anyhow::bail!(
                "throttle.min_interval_ms must be between 1 and {}, got {}",
                MAX_INTERVAL_MS,
                self.throttle.min_interval_ms
            );
        }
        if self.session.shutdown_grace_ms > MAX_GRACE_MS {
            anyhow::bail!(
                "session.shutdown_grace_ms must be at most {}, got {}",
                MAX_GRACE_MS,
                self.session.shutdown_grace_ms
            );
        }
        Ok(())
    }

    pub fn tool(&self) -> Result<Tool> {
        Tool::new(self.tool.program.clone(), &self.tool.minimum_version)
            .context("Invalid tool.minimum_version")
    }

    pub fn tracker_config(&self) -> TrackerConfig {
        TrackerConfig {
            min_interval: Duration::from_millis(self.throttle.min_interval_ms),
            record_initial: self.throttle.record_initial,
        }
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_millis(self.session.shutdown_grace_ms)
    }
}

/// Default config file location
pub fn config_file_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("gtm-bridge").join("config.toml"))
}

/// Use the explicit path if given, else the default location
pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
    explicit.map(Path::to_path_buf).or_else(config_file_path)
}

/// Load config from `path`; a missing file (or no path) yields defaults
pub fn load(path: Option<&Path>) -> Result<SystemConfig> {
    let Some(path) = path else {
        return Ok(SystemConfig::default());
    };
    if !path.exists() {
        return Ok(SystemConfig::default());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config: SystemConfig = toml::from_str(&text)
        .with_context(|| format!("Failed to parse config file {}", path.display()))?;
    config
        .validate()
        .with_context(|| format!("Invalid configuration in {}", path.display()))?;

    Ok(config)
}

/// Write config to `path`, creating parent directories
pub fn save(config: &SystemConfig, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    let text = toml::to_string_pretty(config).context("Failed to serialize config")?;
    std::fs::write(path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Write the default config if `path` does not exist yet
///
/// Returns true if a file was created.
pub fn init_if_missing(path: &Path) -> Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    save(&SystemConfig::default(), path)?;
    Ok(true)
}

/// Commented example config
pub fn example_config() -> &'static str {
    r#"# gtm-bridge configuration

[tool]
# Program to run, resolved on PATH (or an absolute path)
program = "gtm"
# Warn at startup if `gtm -v` reports something older
minimum_version = "v1.0-beta.8"

[throttle]
# Minimum time between two record calls for the same file (1..=86400000)
min_interval_ms = 30000
# Record on the first event of a session, before any previous file is known
record_initial = true

[session]
# Time allowed for in-flight record calls after the editor disconnects (0..=60000)
shutdown_grace_ms = 2000
"#
}
