//! CLI definitions.

pub mod commands;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "algotrader")]
#[command(author, version, about = "Moving-average crossover backtester for daily prices")]
pub struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml", env = "ALGOTRADER_CONFIG")]
    pub config: PathBuf,

    /// Log level (overrides logging.level)
    #[arg(short, long)]
    pub log_level: Option<LogLevel>,

    /// Enable JSON log format
    #[arg(long)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

#[derive(Subcommand)]
pub enum Commands {
    /// Backtest the crossover strategy on one or more symbols
    Backtest(BacktestArgs),
    /// Validate configuration
    ValidateConfig,
    /// Write the default configuration to the config path
    InitConfig(InitConfigArgs),
}

#[derive(Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(clap::Args)]
pub struct BacktestArgs {
    /// Symbols to backtest (comma-separated)
    #[arg(short = 'S', long, value_delimiter = ',', required = true)]
    pub symbols: Vec<String>,

    /// First day of the range (YYYY-MM-DD)
    #[arg(long)]
    pub start: NaiveDate,

    /// Last day of the range, inclusive (YYYY-MM-DD)
    #[arg(long)]
    pub end: NaiveDate,

    /// Short moving average window (overrides backtest.short_window)
    #[arg(long)]
    pub short_window: Option<usize>,

    /// Long moving average window (overrides backtest.long_window)
    #[arg(long)]
    pub long_window: Option<usize>,

    /// Initial cash (overrides backtest.initial_budget)
    #[arg(long)]
    pub budget: Option<Decimal>,

    /// CSV file or directory of per-symbol CSV files; bypasses data.source
    #[arg(long)]
    pub data: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub output: OutputFormat,

    /// Save the reports as JSON
    #[arg(long)]
    pub save: Option<PathBuf>,

    /// Export the trade log as CSV
    #[arg(long)]
    pub trades_csv: Option<PathBuf>,
}

#[derive(clap::Args)]
pub struct InitConfigArgs {
    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use rust_decimal_macros::dec;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_backtest() {
        let cli = Cli::try_parse_from([
            "algotrader",
            "backtest",
            "--symbols",
            "AAPL,MSFT",
            "--start",
            "2018-01-01",
            "--end",
            "2023-12-31",
            "--short-window",
            "20",
            "--budget",
            "2500.50",
            "--output",
            "json",
        ])
        .unwrap();

        let Commands::Backtest(args) = cli.command else {
            panic!("expected backtest command");
        };
        assert_eq!(args.symbols, vec!["AAPL", "MSFT"]);
        assert_eq!(args.start, NaiveDate::from_ymd_opt(2018, 1, 1).unwrap());
        assert_eq!(args.short_window, Some(20));
        assert_eq!(args.long_window, None);
        assert_eq!(args.budget, Some(dec!(2500.50)));
        assert!(args.output == OutputFormat::Json);
        assert!(cli.log_level.is_none());
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(Cli::try_parse_from([
            "algotrader",
            "backtest",
            "--symbols",
            "AAPL",
            "--start",
            "2018-13-01",
            "--end",
            "2023-12-31",
        ])
        .is_err());
    }
}
