//! Check the installed gtm version

use crate::system_config::SystemConfig;
use anyhow::Result;
use bridge_core::ProbeError;
use owo_colors::OwoColorize;

pub async fn run(config: &SystemConfig) -> Result<()> {
    let tool = config.tool()?;

    match tool.probe().await {
        Ok(version) => {
            println!(
                "{} {} {} {}",
                "✓".green(),
                tool.program().cyan(),
                version,
                format!("(minimum {})", tool.minimum_version()).dimmed()
            );
            Ok(())
        }
        Err(e @ ProbeError::Unavailable { .. }) => {
            anyhow::bail!(e.user_message())
        }
        Err(e) => {
            println!("{} {}", "!".yellow(), e.user_message().yellow());
            if let ProbeError::Unrecognized { output, .. } = &e {
                println!("{}: {}", "Output".dimmed(), output.trim_end());
            }
            Ok(())
        }
    }
}
