//! Configuration management command
//!
//! Provides CLI interface to view and edit the bridge configuration.

use crate::system_config::{self, SystemConfig};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use std::path::Path;

fn require_path(path: Option<&Path>) -> Result<&Path> {
    path.context("Could not determine config file path (no config directory; pass --config)")
}

/// List all configuration values
pub async fn run_list(path: Option<&Path>) -> Result<()> {
    let config = system_config::load(path)?;

    println!("{}", "gtm-bridge Configuration".bold());
    match path {
        Some(path) if path.exists() => {
            println!("{}: {}\n", "Location".dimmed(), path.display().dimmed());
        }
        Some(path) => {
            println!(
                "{}: {} {}\n",
                "Location".dimmed(),
                path.display().dimmed(),
                "(defaults)".dimmed()
            );
        }
        None => println!("{}\n", "(defaults)".dimmed()),
    }

    println!("{}", "[tool]".yellow());
    println!("  {} = {}", "program".cyan(), config.tool.program);
    println!("  {} = {}", "minimum_version".cyan(), config.tool.minimum_version);

    println!("\n{}", "[throttle]".yellow());
    println!(
        "  {} = {} {}",
        "min_interval_ms".cyan(),
        config.throttle.min_interval_ms,
        format!("({}s)", config.throttle.min_interval_ms / 1000).dimmed()
    );
    println!("  {} = {}", "record_initial".cyan(), config.throttle.record_initial);

    println!("\n{}", "[session]".yellow());
    println!("  {} = {}", "shutdown_grace_ms".cyan(), config.session.shutdown_grace_ms);

    println!("\n{}", "Valid Ranges:".bold());
    println!("  min_interval_ms: 1-86,400,000");
    println!("  shutdown_grace_ms: 0-60,000");

    Ok(())
}

/// Read a single key from a config
pub fn get_value(config: &SystemConfig, key: &str) -> Result<String> {
    let value = match key {
        "tool.program" => config.tool.program.clone(),
        "tool.minimum_version" => config.tool.minimum_version.clone(),
        "throttle.min_interval_ms" => config.throttle.min_interval_ms.to_string(),
        "throttle.record_initial" => config.throttle.record_initial.to_string(),
        "session.shutdown_grace_ms" => config.session.shutdown_grace_ms.to_string(),
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'gtm-bridge config list' to see available keys.",
            key
        ),
    };
    Ok(value)
}

/// Assign a single key, then validate the whole config
pub fn set_value(config: &mut SystemConfig, key: &str, value: &str) -> Result<()> {
    match key {
        "tool.program" => config.tool.program = value.to_string(),
        "tool.minimum_version" => config.tool.minimum_version = value.to_string(),
        "throttle.min_interval_ms" => {
            config.throttle.min_interval_ms = value
                .parse()
                .context("Invalid value: must be a positive integer")?;
        }
        "throttle.record_initial" => {
            config.throttle.record_initial = value
                .parse()
                .context("Invalid value: must be 'true' or 'false'")?;
        }
        "session.shutdown_grace_ms" => {
            config.session.shutdown_grace_ms = value
                .parse()
                .context("Invalid value: must be a non-negative integer")?;
        }
        _ => anyhow::bail!(
            "Unknown config key: {}. Use 'gtm-bridge config list' to see available keys.",
            key
        ),
    }

    config.validate().context("Invalid configuration value")
}

/// Get a single configuration value
pub async fn run_get(path: Option<&Path>, key: &str) -> Result<()> {
    let config = system_config::load(path)?;
    println!("{}", get_value(&config, key)?);
    Ok(())
}

/// Set a configuration value
pub async fn run_set(path: Option<&Path>, key: &str, value: &str) -> Result<()> {
    let path = require_path(path)?;
    let mut config = system_config::load(Some(path))?;

    set_value(&mut config, key, value)?;
    system_config::save(&config, path)?;

    println!("{} {} = {}", "✓".green(), key.cyan(), value);
    println!(
        "{}",
        "Note: takes effect the next time the editor starts a session".yellow()
    );

    Ok(())
}

/// Show the config file path and optionally create it
pub async fn run_path(path: Option<&Path>, create: bool) -> Result<()> {
    let path = require_path(path)?;

    if create && system_config::init_if_missing(path)? {
        println!("{} Created config file at: {}", "✓".green(), path.display());
    } else {
        println!("{}", path.display());
        if !path.exists() {
            println!("{}", "File does not exist. Use --create to create it.".yellow());
        }
    }

    Ok(())
}

/// Show example configuration
pub async fn run_example() -> Result<()> {
    println!("{}", system_config::example_config());
    Ok(())
}
