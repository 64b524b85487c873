//! Validate configuration command.

use algotrader_config::AppConfig;
use anyhow::{bail, Context, Result};
use std::path::Path;

pub fn run(config_path: &Path, loaded: Result<AppConfig>) -> Result<()> {
    println!("Validating configuration: {:?}", config_path);

    if !config_path.exists() {
        bail!("Configuration file {} not found", config_path.display());
    }

    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {:#}", e);
            return Err(e);
        }
    };
    config
        .validate()
        .context("Backtest parameters are invalid")?;

    println!("Configuration is valid!");
    println!();
    println!("App: {}", config.app.name);
    println!("Environment: {}", config.app.environment);
    println!("Log level: {}", config.logging.level);
    println!(
        "Moving averages: {} / {}",
        config.backtest.short_window, config.backtest.long_window
    );
    println!("Initial budget: {}", config.backtest.initial_budget);
    println!("Data source: {:?}", config.data.source);
    if let Some(dir) = &config.data.csv_dir {
        println!("CSV directory: {}", dir);
    }

    Ok(())
}
