//! Core types and traits for the crossover backtester.
//!
//! This crate provides the foundational building blocks including:
//! - Daily price data (PricePoint, RawPricePoint)
//! - Trades, positions and portfolio state
//! - Core traits for indicators, strategy configuration and price sources

pub mod types;
pub mod traits;
pub mod error;

pub use error::{BacktestError, ConfigError, DataError};
pub use types::*;
pub use traits::*;
