//! Signal watcher CLI application.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use sigwatch_config::{load_config, AppConfig, ConfigError};
use sigwatch_monitor::setup_logging;
use std::path::Path;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_config(&cli.config);

    // Setup logging; CLI flags win over the config file
    let logging = loaded
        .as_ref()
        .map(|c| c.logging.clone())
        .unwrap_or_default();
    let log_level = cli
        .log_level
        .as_ref()
        .map(cli::LogLevel::as_str)
        .unwrap_or(logging.level.as_str());
    let json = cli.json_logs || logging.format.eq_ignore_ascii_case("json");
    let _guard = setup_logging(log_level, json, logging.file.as_deref().map(Path::new));

    if !cli.config.exists() {
        tracing::warn!(path = %cli.config.display(), "config file not found, using defaults");
    }

    // Execute command
    match cli.command {
        Commands::Run(args) => {
            cli::commands::run::run(args, loaded_config(loaded, &cli.config)?).await
        }
        Commands::Once(args) => {
            cli::commands::once::run(args, loaded_config(loaded, &cli.config)?).await
        }
        Commands::Status(args) => {
            cli::commands::status::run(args, loaded_config(loaded, &cli.config)?).await
        }
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, loaded).await,
    }
}

fn loaded_config(
    loaded: Result<AppConfig, ConfigError>,
    path: &Path,
) -> Result<AppConfig> {
    loaded.with_context(|| format!("failed to load config from {}", path.display()))
}
