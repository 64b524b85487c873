//! Trade statistics.

use algotrader_core::types::{Side, Trade};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Round-trip statistics derived from a trade log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeStats {
    /// Completed buy/sell pairs
    pub round_trips: usize,
    /// Number of winning round trips
    pub winning_trades: usize,
    /// Number of losing round trips
    pub losing_trades: usize,
    /// Round trips closed at the entry price
    pub breakeven_trades: usize,
    /// Win rate percentage
    pub win_rate_pct: Decimal,
    /// Average profit per winning trade
    pub avg_win: Decimal,
    /// Average loss per losing trade (positive)
    pub avg_loss: Decimal,
    /// Profit factor (gross profit / gross loss), zero without losses
    pub profit_factor: Decimal,
    /// Calendar days spent holding a position
    pub days_in_market: i64,
}

impl TradeStats {
    /// Compute statistics from an alternating buy/sell log.
    pub fn from_trades(trades: &[Trade]) -> Self {
        let mut stats = Self {
            round_trips: 0,
            winning_trades: 0,
            losing_trades: 0,
            breakeven_trades: 0,
            win_rate_pct: Decimal::ZERO,
            avg_win: Decimal::ZERO,
            avg_loss: Decimal::ZERO,
            profit_factor: Decimal::ZERO,
            days_in_market: 0,
        };

        let mut gross_profit = Decimal::ZERO;
        let mut gross_loss = Decimal::ZERO;
        let mut opened = None;

        for trade in trades {
            match trade.side {
                Side::Buy => opened = Some(trade.date),
                Side::Sell => {
                    stats.round_trips += 1;
                    if let Some(entry_date) = opened.take() {
                        stats.days_in_market += (trade.date - entry_date).num_days();
                    }

                    let pnl = trade.realized_pnl.unwrap_or(Decimal::ZERO);
                    if pnl > Decimal::ZERO {
                        stats.winning_trades += 1;
                        gross_profit = gross_profit.saturating_add(pnl);
                    } else if pnl < Decimal::ZERO {
                        stats.losing_trades += 1;
                        gross_loss = gross_loss.saturating_add(pnl.abs());
                    } else {
                        stats.breakeven_trades += 1;
                    }
                }
            }
        }

        if stats.round_trips > 0 {
            stats.win_rate_pct = Decimal::from(stats.winning_trades * 100)
                / Decimal::from(stats.round_trips);
        }
        if stats.winning_trades > 0 {
            stats.avg_win = gross_profit / Decimal::from(stats.winning_trades);
        }
        if stats.losing_trades > 0 {
            stats.avg_loss = gross_loss / Decimal::from(stats.losing_trades);
        }
        if gross_loss > Decimal::ZERO {
            stats.profit_factor = gross_profit / gross_loss;
        }

        stats
    }
}
