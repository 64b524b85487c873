//! Moving-average crossover backtester CLI.

mod cli;
mod logging;

use algotrader_config::{load_config_or_env, LoggingConfig};
use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Commands};
use logging::setup_logging;
use std::path::Path;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // A missing file still picks up ALGOTRADER__* overrides; commands decide if it matters
    let loaded = load_config_or_env(&cli.config)
        .with_context(|| format!("Failed to load configuration from {}", cli.config.display()));

    // Setup logging: CLI flags win over the config file
    let logging = loaded
        .as_ref()
        .map(|config| config.logging.clone())
        .unwrap_or_else(|_| LoggingConfig::default());
    let log_level = cli
        .log_level
        .map(|level| level.as_str().to_string())
        .unwrap_or(logging.level);
    let json = cli.json_logs || logging.format.eq_ignore_ascii_case("json");
    let _guard = setup_logging(&log_level, json, logging.file.as_deref().map(Path::new))?;

    // Execute command
    match cli.command {
        Commands::Backtest(args) => cli::commands::backtest::run(args, &cli.config, loaded).await,
        Commands::ValidateConfig => cli::commands::validate::run(&cli.config, loaded),
        Commands::InitConfig(args) => cli::commands::init_config::run(args, &cli.config),
    }
}
