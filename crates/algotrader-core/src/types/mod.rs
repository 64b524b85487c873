//! Core data types for the backtester.

mod position;
mod price;
mod trade;

pub use position::{PortfolioState, Position};
pub use price::{PriceField, PricePoint, RawPricePoint};
pub use trade::{Side, Trade, TradeReason};
