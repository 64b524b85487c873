//! Moving average crossover backtesting.
//!
//! Pipeline: a normalized daily series goes in, the engine walks it once
//! with a single-lot FLAT/LONG state machine, and a [`BacktestReport`] with
//! the trade log and final performance comes out.

mod engine;
mod report;
mod statistics;

pub use engine::{run_backtest, BacktestConfig, BacktestEngine};
pub use report::{trades_to_csv, BacktestReport, PerformanceReport};
pub use statistics::TradeStats;
