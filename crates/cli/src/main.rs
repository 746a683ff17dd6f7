//! gtm-bridge CLI

use anyhow::Result;
use clap::{Parser, Subcommand};
use cli_lib::{cmd, logging, system_config};
use std::path::PathBuf;

/// gtm-bridge - Feed editor activity to gtm
#[derive(Parser)]
#[command(name = "gtm-bridge")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: <config dir>/gtm-bridge/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write logs to this file instead of stderr
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run an editor session (JSON events on stdin, notices on stdout)
    Run,
    /// Check that gtm is installed and recent enough
    Probe,
    /// Record activity once, as if leaving FILE
    Record {
        /// File whose time is being recorded
        file: Option<String>,
    },
    /// View or edit configuration
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// List all configuration values
    List,
    /// Print a single value
    Get {
        /// Key, e.g. throttle.min_interval_ms
        key: String,
    },
    /// Set a single value
    Set {
        /// Key, e.g. throttle.min_interval_ms
        key: String,
        /// New value
        value: String,
    },
    /// Show the config file path
    Path {
        /// Create the file with defaults if it is missing
        #[arg(long)]
        create: bool,
    },
    /// Print an example configuration
    Example,
}

// The editor delivers events serially; one thread is all the session needs.
#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_guard = logging::init(cli.log_file.as_deref())?;
    let config_path = system_config::resolve_path(cli.config.as_deref());
    let config_path = config_path.as_deref();

    let exit_code = match cli.command {
        Commands::Run => cmd::run::run(&system_config::load(config_path)?)
            .await
            .map(|()| 0),
        Commands::Probe => cmd::probe::run(&system_config::load(config_path)?)
            .await
            .map(|()| 0),
        Commands::Record { file } => {
            cmd::record::run(&system_config::load(config_path)?, file.as_deref()).await
        }
        Commands::Config(config_cmd) => match config_cmd {
            ConfigCommands::List => cmd::config::run_list(config_path).await,
            ConfigCommands::Get { key } => cmd::config::run_get(config_path, &key).await,
            ConfigCommands::Set { key, value } => {
                cmd::config::run_set(config_path, &key, &value).await
            }
            ConfigCommands::Path { create } => cmd::config::run_path(config_path, create).await,
            ConfigCommands::Example => cmd::config::run_example().await,
        }
        .map(|()| 0),
    }?;

    // Flush buffered log lines; process::exit skips destructors
    drop(log_guard);
    if exit_code != 0 {
        std::process::exit(exit_code);
    }
    Ok(())
}
