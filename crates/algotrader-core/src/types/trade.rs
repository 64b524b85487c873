//! Executed trades.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Trade side (buy or sell).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Buy => f.pad("BUY"),
            Side::Sell => f.pad("SELL"),
        }
    }
}

/// Why a trade was executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeReason {
    /// Short MA crossed above long MA
    GoldenCross,
    /// Short MA crossed below long MA
    DeathCross,
    /// Open position liquidated at the final close
    EndOfData,
}

impl std::fmt::Display for TradeReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TradeReason::GoldenCross => write!(f, "golden cross"),
            TradeReason::DeathCross => write!(f, "death cross"),
            TradeReason::EndOfData => write!(f, "end of data"),
        }
    }
}

/// A single executed trade.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub side: Side,
    pub date: NaiveDate,
    pub price: Decimal,
    pub shares: u64,
    /// Cash balance after the trade settled
    pub cash_after: Decimal,
    /// Realized profit of the round trip (sells only)
    pub realized_pnl: Option<Decimal>,
    pub reason: TradeReason,
}

impl Trade {
    /// Gross value of the trade.
    pub fn value(&self) -> Decimal {
        Decimal::from(self.shares) * self.price
    }
}
