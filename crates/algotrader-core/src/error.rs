//! Error types for the backtester.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::types::PriceField;

/// Top-level error for a backtest run.
#[derive(Error, Debug)]
pub enum BacktestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Data error: {0}")]
    Data(#[from] DataError),

    #[error("Cash or profit overflowed the decimal range on {date}")]
    Overflow { date: NaiveDate },
}

/// Invalid run parameters. Detected before any processing starts.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{name} window must be greater than 0")]
    ZeroWindow { name: &'static str },

    #[error("Short window ({short}) must be less than long window ({long})")]
    WindowOrder { short: usize, long: usize },

    #[error("Initial budget must be positive, got {0}")]
    NonPositiveBudget(Decimal),
}

/// Price data errors, from loading or from validating a series.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("Price series is empty")]
    EmptySeries,

    #[error("Price series is not date-ordered: {current} follows {previous}")]
    OutOfOrder {
        previous: NaiveDate,
        current: NaiveDate,
    },

    #[error("First observation ({date}) is missing {field}")]
    IncompleteFirstObservation { date: NaiveDate, field: PriceField },

    #[error("Invalid close price {value} on {date}")]
    InvalidPrice { date: NaiveDate, value: f64 },

    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    #[error("No data available for the requested range")]
    NoDataAvailable,

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
