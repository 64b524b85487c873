//! Position and portfolio state.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// The single-lot position of a run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "UPPERCASE")]
pub enum Position {
    #[default]
    Flat,
    Long { shares: u64, entry_price: Decimal },
}

/// Cash and cumulative realized profit of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortfolioState {
    pub cash: Decimal,
    pub realized_profit: Decimal,
}

impl PortfolioState {
    /// Create a portfolio holding only the initial budget.
    pub fn new(initial_budget: Decimal) -> Self {
        Self {
            cash: initial_budget,
            realized_profit: Decimal::ZERO,
        }
    }
}
