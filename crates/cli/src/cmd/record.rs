//! Run a single `gtm record --status` call

use crate::system_config::SystemConfig;
use anyhow::{Context, Result};
use std::io::Write;

/// Returns the tool's exit code for the process to exit with
pub async fn run(config: &SystemConfig, file: Option<&str>) -> Result<i32> {
    let tool = config.tool()?;

    let result = tool
        .record(file)
        .await
        .with_context(|| format!("Failed to run {}", tool.program()))?;

    print!("{}", result.output);
    std::io::stdout().flush().context("Failed to write output")?;

    Ok(result.exit_code)
}
