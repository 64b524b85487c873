//! Backtest command implementation.

use algotrader_backtest::{trades_to_csv, BacktestEngine, BacktestReport};
use algotrader_config::{AppConfig, DataSettings, DataSourceKind};
use algotrader_core::traits::PriceSource;
use algotrader_data::{load_normalized, CsvPriceSource, YahooPriceSource};
use anyhow::{bail, Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

use crate::cli::{BacktestArgs, OutputFormat};

pub async fn run(args: BacktestArgs, config_path: &Path, loaded: Result<AppConfig>) -> Result<()> {
    let config = loaded?;
    if !config_path.exists() {
        warn!(
            path = %config_path.display(),
            "Configuration file not found, using defaults and environment"
        );
    }

    // Parameters are checked before any data is fetched
    let mut backtest_config = config.to_backtest_config();
    if let Some(short) = args.short_window {
        backtest_config.crossover.short_window = short;
    }
    if let Some(long) = args.long_window {
        backtest_config.crossover.long_window = long;
    }
    if let Some(budget) = args.budget {
        backtest_config.initial_budget = budget;
    }
    let engine = Arc::new(BacktestEngine::new(backtest_config).context("Invalid backtest parameters")?);

    if args.start > args.end {
        bail!("Start date {} is after end date {}", args.start, args.end);
    }

    let source = price_source(args.data.as_deref(), &config.data, &args.symbols)?;
    info!(
        symbols = ?args.symbols,
        source = source.name(),
        short_window = backtest_config.crossover.short_window,
        long_window = backtest_config.crossover.long_window,
        budget = %backtest_config.initial_budget,
        "Starting backtest"
    );

    let reports = run_symbols(&args, source, engine).await?;

    // Output results
    match args.output {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&reports)?),
        OutputFormat::Text => {
            for report in &reports {
                println!("{}", report.summary());
            }
        }
    }

    // Save if requested
    if let Some(save_path) = &args.save {
        let json = serde_json::to_string_pretty(&reports)?;
        std::fs::write(save_path, json)
            .with_context(|| format!("Failed to write {}", save_path.display()))?;
        info!("Results saved to {:?}", save_path);
    }

    if let Some(csv_path) = &args.trades_csv {
        let csv = trades_to_csv(&reports)?;
        std::fs::write(csv_path, csv)
            .with_context(|| format!("Failed to write {}", csv_path.display()))?;
        info!("Trade log saved to {:?}", csv_path);
    }

    Ok(())
}

/// Pick the loader: `--data` wins, then the configured source.
fn price_source(
    data: Option<&Path>,
    settings: &DataSettings,
    symbols: &[String],
) -> Result<Arc<dyn PriceSource>> {
    if let Some(path) = data {
        if !path.exists() {
            bail!(
                "Data path '{}' does not exist. Provide a CSV file or directory containing CSV files (e.g. --data ./data)",
                path.display()
            );
        }
        // A single file holds one symbol's history
        if path.is_file() && symbols.len() > 1 {
            bail!(
                "Data file '{}' holds a single series but {} symbols were requested; pass a directory of per-symbol CSV files instead",
                path.display(),
                symbols.len()
            );
        }
        return Ok(Arc::new(CsvPriceSource::new(path)?));
    }

    match settings.source {
        DataSourceKind::Csv => {
            let Some(dir) = &settings.csv_dir else {
                bail!("data.source is \"csv\" but data.csv_dir is not set (or pass --data)");
            };
            let source = CsvPriceSource::new(dir)
                .with_context(|| format!("Invalid data.csv_dir '{}'", dir))?;
            Ok(Arc::new(source))
        }
        DataSourceKind::Yahoo => {
            let source = YahooPriceSource::new(
                settings.yahoo_base_url.as_str(),
                Duration::from_secs(settings.timeout_secs),
            )?;
            Ok(Arc::new(source))
        }
    }
}

/// Backtest every symbol on its own task, returning reports in request order.
async fn run_symbols(
    args: &BacktestArgs,
    source: Arc<dyn PriceSource>,
    engine: Arc<BacktestEngine>,
) -> Result<Vec<BacktestReport>> {
    let mut tasks = JoinSet::new();

    for (index, symbol) in args.symbols.iter().enumerate() {
        let symbol = symbol.trim().to_uppercase();
        let source = Arc::clone(&source);
        let engine = Arc::clone(&engine);
        let (start, end) = (args.start, args.end);

        tasks.spawn(async move {
            let result: Result<BacktestReport> = async {
                let prices = load_normalized(source.as_ref(), &symbol, start, end)
                    .await
                    .with_context(|| format!("Failed to load prices for {}", symbol))?;
                let report = engine
                    .run(&symbol, &prices)
                    .with_context(|| format!("Backtest failed for {}", symbol))?;
                info!(
                    symbol = %symbol,
                    trades = report.trades.len(),
                    profit_loss = %report.performance.profit_loss,
                    "Backtest complete"
                );
                Ok(report)
            }
            .await;
            (index, result)
        });
    }

    let mut results = Vec::with_capacity(args.symbols.len());
    while let Some(joined) = tasks.join_next().await {
        let (index, result) = joined.context("Backtest task panicked")?;
        results.push((index, result?));
    }
    results.sort_by_key(|(index, _)| *index);

    Ok(results.into_iter().map(|(_, report)| report).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_single_file_serves_one_symbol() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        std::fs::write(&path, "Date,Close\n2024-01-02,10\n").unwrap();
        let settings = DataSettings::default();

        let source = price_source(Some(&path), &settings, &symbols(&["AAPL"])).unwrap();
        assert_eq!(source.name(), "csv");

        let err = price_source(Some(&path), &settings, &symbols(&["AAPL", "MSFT"]))
            .err()
            .unwrap();
        assert!(err.to_string().contains("2 symbols"));
    }

    #[test]
    fn test_directory_serves_many_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let settings = DataSettings::default();

        let source = price_source(Some(dir.path()), &settings, &symbols(&["AAPL", "MSFT"]));
        assert!(source.is_ok());
    }

    #[test]
    fn test_csv_source_requires_directory() {
        let settings = DataSettings {
            source: DataSourceKind::Csv,
            csv_dir: None,
            ..DataSettings::default()
        };
        assert!(price_source(None, &settings, &symbols(&["AAPL"])).is_err());
    }
}
