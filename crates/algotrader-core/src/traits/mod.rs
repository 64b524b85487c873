//! Core traits for the backtester.

mod indicator;
mod price_source;
mod strategy;

pub use indicator::Indicator;
pub use price_source::PriceSource;
pub use strategy::StrategyConfig;
