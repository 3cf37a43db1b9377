//! Volatility-gated futures trend CLI.

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use config::ConfigError;
use std::path::Path;
use trend_config::{load_config, AppConfig};
use trend_monitor::setup_logging_with_file;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loaded = load_config(&cli.config);

    // Setup logging; flags win over the config file
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_default();
    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or_else(|| logging.level.clone());
    let _log_guard = setup_logging_with_file(
        &log_level,
        cli.json_logs || logging.is_json(),
        logging.file.as_deref().map(Path::new),
    );

    // Execute command
    match cli.command {
        Commands::Run(args) => cli::commands::run::run(args, require(loaded, &cli.config)?).await,
        Commands::Signals(args) => {
            cli::commands::signals::run(args, require(loaded, &cli.config)?).await
        }
        Commands::Universe => cli::commands::universe::run(require(loaded, &cli.config)?).await,
        Commands::ValidateConfig { show } => {
            cli::commands::validate::run(&cli.config, loaded, show).await
        }
    }
}

fn require(loaded: Result<AppConfig, ConfigError>, path: &Path) -> Result<AppConfig> {
    loaded.with_context(|| format!("Failed to load configuration from {}", path.display()))
}
