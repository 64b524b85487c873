//! Backtest report generation.

use algotrader_core::types::{Side, Trade, TradeReason};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::{BacktestConfig, TradeStats};

/// Final performance of one run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceReport {
    pub symbol: String,
    pub initial_budget: Decimal,
    pub ending_cash: Decimal,
    pub profit_loss: Decimal,
    /// Return on investment as a fraction of the initial budget
    pub roi: Decimal,
}

impl PerformanceReport {
    /// Summarize a finished run. ROI is (ending cash - budget) / budget.
    pub fn new(
        symbol: &str,
        initial_budget: Decimal,
        ending_cash: Decimal,
        profit_loss: Decimal,
    ) -> Self {
        let roi = (ending_cash - initial_budget)
            .checked_div(initial_budget)
            .unwrap_or(Decimal::ZERO);
        Self {
            symbol: symbol.to_string(),
            initial_budget,
            ending_cash,
            profit_loss,
            roi,
        }
    }

    /// ROI as a percentage.
    pub fn roi_pct(&self) -> Decimal {
        self.roi * dec!(100)
    }
}

/// Complete backtest report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BacktestReport {
    /// Configuration used
    pub config: BacktestConfig,
    /// Final performance
    pub performance: PerformanceReport,
    /// Round-trip statistics
    pub stats: TradeStats,
    /// Executed trades in date order
    pub trades: Vec<Trade>,
    /// Golden crosses that could not buy a single share
    pub skipped_signals: usize,
    /// Number of price points processed
    pub bars_processed: usize,
}

impl BacktestReport {
    /// Generate a text summary.
    pub fn summary(&self) -> String {
        let p = &self.performance;
        let mut s = String::new();

        s.push_str("═══════════════════════════════════════════════════════════\n");
        s.push_str(&format!("  BACKTEST REPORT: {}\n", p.symbol));
        s.push_str("═══════════════════════════════════════════════════════════\n\n");

        s.push_str("PERFORMANCE\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Initial Budget:      ${:.2}\n", p.initial_budget));
        s.push_str(&format!("  Ending Cash:         ${:.2}\n", p.ending_cash));
        s.push_str(&format!("  Total Profit/Loss:   ${:.2}\n", p.profit_loss));
        s.push_str(&format!("  Return on Investment: {:.2}%\n", p.roi_pct()));
        s.push('\n');

        s.push_str("PARAMETERS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!(
            "  Moving Averages:     {} / {}\n",
            self.config.crossover.short_window, self.config.crossover.long_window
        ));
        s.push_str(&format!("  Bars Processed:      {}\n", self.bars_processed));
        s.push('\n');

        s.push_str("TRADES\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        if self.trades.is_empty() {
            s.push_str("  (none)\n");
        }
        for trade in &self.trades {
            s.push_str(&format!(
                "  {}  {:<4} {:>6} @ ${:.2}  cash ${:.2}",
                trade.date, trade.side, trade.shares, trade.price, trade.cash_after
            ));
            if let Some(pnl) = trade.realized_pnl {
                s.push_str(&format!("  P/L ${:.2}", pnl));
            }
            s.push_str(&format!("  ({})\n", trade.reason));
        }
        if self.skipped_signals > 0 {
            s.push_str(&format!(
                "  Skipped golden crosses (insufficient cash): {}\n",
                self.skipped_signals
            ));
        }
        s.push('\n');

        s.push_str("TRADE STATISTICS\n");
        s.push_str("───────────────────────────────────────────────────────────\n");
        s.push_str(&format!("  Round Trips:         {}\n", self.stats.round_trips));
        s.push_str(&format!("  Winning Trades:      {}\n", self.stats.winning_trades));
        s.push_str(&format!("  Losing Trades:       {}\n", self.stats.losing_trades));
        s.push_str(&format!("  Win Rate:            {:.2}%\n", self.stats.win_rate_pct));
        s.push_str(&format!("  Avg Win:             ${:.2}\n", self.stats.avg_win));
        s.push_str(&format!("  Avg Loss:            ${:.2}\n", self.stats.avg_loss));
        s.push_str(&format!("  Days In Market:      {}\n", self.stats.days_in_market));
        s.push('\n');

        s.push_str("═══════════════════════════════════════════════════════════\n");

        s
    }

    /// Export to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One CSV row of the trade log.
#[derive(Debug, Serialize)]
struct TradeRow<'a> {
    symbol: &'a str,
    side: Side,
    date: NaiveDate,
    price: Decimal,
    shares: u64,
    cash_after: Decimal,
    realized_pnl: Option<Decimal>,
    reason: TradeReason,
}

/// Export the trades of several reports as one CSV table.
pub fn trades_to_csv(reports: &[BacktestReport]) -> Result<String, csv::Error> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    for report in reports {
        for trade in &report.trades {
            writer.serialize(TradeRow {
                symbol: &report.performance.symbol,
                side: trade.side,
                date: trade.date,
                price: trade.price,
                shares: trade.shares,
                cash_after: trade.cash_after,
                realized_pnl: trade.realized_pnl,
                reason: trade.reason,
            })?;
        }
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| csv::Error::from(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
