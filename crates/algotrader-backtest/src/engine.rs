//! Backtesting engine.

use algotrader_core::error::{BacktestError, ConfigError, DataError};
use algotrader_core::traits::StrategyConfig;
use algotrader_core::types::{PortfolioState, Position, PricePoint, Side, Trade, TradeReason};
use algotrader_strategies::{CrossSignal, MACrossoverConfig, MACrossoverStrategy};
use chrono::NaiveDate;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::report::{BacktestReport, PerformanceReport};
use crate::statistics::TradeStats;

/// Backtest configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BacktestConfig {
    /// Cash available at the start of the run
    pub initial_budget: Decimal,
    /// Moving average windows
    pub crossover: MACrossoverConfig,
}

impl BacktestConfig {
    pub fn new(short_window: usize, long_window: usize, initial_budget: Decimal) -> Self {
        Self {
            initial_budget,
            crossover: MACrossoverConfig {
                short_window,
                long_window,
            },
        }
    }

    /// Check windows and budget.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.crossover.validate()?;
        if self.initial_budget <= Decimal::ZERO {
            return Err(ConfigError::NonPositiveBudget(self.initial_budget));
        }
        Ok(())
    }
}

impl Default for BacktestConfig {
    fn default() -> Self {
        Self {
            initial_budget: dec!(5000),
            crossover: MACrossoverConfig::default(),
        }
    }
}

/// Backtesting engine.
///
/// A run is a pure function of the configuration and the price series: the
/// portfolio and position live on the stack of [`BacktestEngine::run`] and
/// everything the run produced is returned in the report.
#[derive(Debug, Clone)]
pub struct BacktestEngine {
    config: BacktestConfig,
    strategy: MACrossoverStrategy,
}

impl BacktestEngine {
    /// Create a new backtest engine, rejecting invalid parameters.
    pub fn new(config: BacktestConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let strategy = MACrossoverStrategy::new(config.crossover)?;
        Ok(Self { config, strategy })
    }

    /// Run a backtest over a normalized daily series.
    pub fn run(&self, symbol: &str, prices: &[PricePoint]) -> Result<BacktestReport, BacktestError> {
        let closes = decimal_closes(prices)?;
        let close_values: Vec<f64> = prices.iter().map(|p| p.close).collect();
        let averages = self.strategy.averages(&close_values);

        if prices.len() <= self.strategy.warmup_period() {
            debug!(
                symbol,
                bars = prices.len(),
                long_window = self.config.crossover.long_window,
                "Series too short for any crossover"
            );
        }

        let mut portfolio = PortfolioState::new(self.config.initial_budget);
        let mut position = Position::default();
        let mut trades = Vec::new();
        let mut skipped_signals = 0usize;

        for i in 1..prices.len() {
            let Some(signal) = self.strategy.signal_at(&averages, i) else {
                continue;
            };
            let date = prices[i].date;
            let price = closes[i];

            match (signal, position) {
                (CrossSignal::GoldenCross, Position::Flat) => {
                    match buy(&mut portfolio, date, price)? {
                        Some((opened, trade)) => {
                            debug!(symbol, %date, %price, shares = trade.shares, "Golden cross: bought");
                            position = opened;
                            trades.push(trade);
                        }
                        None => {
                            skipped_signals += 1;
                            warn!(
                                symbol,
                                %date,
                                %price,
                                cash = %portfolio.cash,
                                "Golden cross skipped: cash does not cover one share"
                            );
                        }
                    }
                }
                (CrossSignal::DeathCross, Position::Long { shares, entry_price }) => {
                    let trade = sell(
                        &mut portfolio,
                        shares,
                        entry_price,
                        date,
                        price,
                        TradeReason::DeathCross,
                    )?;
                    debug!(symbol, %date, %price, pnl = ?trade.realized_pnl, "Death cross: sold");
                    position = Position::Flat;
                    trades.push(trade);
                }
                _ => {}
            }
        }

        if let Position::Long { shares, entry_price } = position {
            // `decimal_closes` rejected empty series
            let last = prices.len() - 1;
            let trade = sell(
                &mut portfolio,
                shares,
                entry_price,
                prices[last].date,
                closes[last],
                TradeReason::EndOfData,
            )?;
            debug!(symbol, date = %trade.date, pnl = ?trade.realized_pnl, "Open position closed at end of data");
            trades.push(trade);
        }

        let performance = PerformanceReport::new(
            symbol,
            self.config.initial_budget,
            portfolio.cash,
            portfolio.realized_profit,
        );
        let stats = TradeStats::from_trades(&trades);

        Ok(BacktestReport {
            config: self.config,
            performance,
            stats,
            trades,
            skipped_signals,
            bars_processed: prices.len(),
        })
    }
}

/// Validate and run one symbol.
pub fn run_backtest(
    symbol: &str,
    prices: &[PricePoint],
    short_window: usize,
    long_window: usize,
    initial_budget: Decimal,
) -> Result<BacktestReport, BacktestError> {
    let config = BacktestConfig::new(short_window, long_window, initial_budget);
    BacktestEngine::new(config)?.run(symbol, prices)
}

/// Check ordering and convert closes for accounting.
fn decimal_closes(prices: &[PricePoint]) -> Result<Vec<Decimal>, DataError> {
    if prices.is_empty() {
        return Err(DataError::EmptySeries);
    }
    if let Some(pair) = prices.windows(2).find(|w| w[1].date <= w[0].date) {
        return Err(DataError::OutOfOrder {
            previous: pair[0].date,
            current: pair[1].date,
        });
    }

    prices
        .iter()
        .map(|p| {
            let invalid = || DataError::InvalidPrice {
                date: p.date,
                value: p.close,
            };
            if !p.close.is_finite() || p.close <= 0.0 {
                return Err(invalid());
            }
            Decimal::try_from(p.close).map_err(|_| invalid())
        })
        .collect()
}

/// Whole shares purchasable with `cash`.
fn affordable_shares(cash: Decimal, price: Decimal) -> u64 {
    if cash <= Decimal::ZERO || price <= Decimal::ZERO {
        return 0;
    }
    let Some(quotient) = cash.checked_div(price) else {
        return 0;
    };
    // Share counts are u64; larger quotients buy the most a lot can hold
    let mut shares = quotient.floor().to_u64().unwrap_or(u64::MAX);
    // The quotient is rounded to 28 digits and may land on the next integer.
    while shares > 0
        && Decimal::from(shares)
            .checked_mul(price)
            .map_or(true, |cost| cost > cash)
    {
        shares -= 1;
    }
    shares
}

fn buy(
    portfolio: &mut PortfolioState,
    date: NaiveDate,
    price: Decimal,
) -> Result<Option<(Position, Trade)>, BacktestError> {
    let shares = affordable_shares(portfolio.cash, price);
    if shares == 0 {
        return Ok(None);
    }

    let overflow = || BacktestError::Overflow { date };
    let cost = Decimal::from(shares).checked_mul(price).ok_or_else(overflow)?;
    portfolio.cash = portfolio.cash.checked_sub(cost).ok_or_else(overflow)?;

    let position = Position::Long {
        shares,
        entry_price: price,
    };
    let trade = Trade {
        side: Side::Buy,
        date,
        price,
        shares,
        cash_after: portfolio.cash,
        realized_pnl: None,
        reason: TradeReason::GoldenCross,
    };
    Ok(Some((position, trade)))
}

fn sell(
    portfolio: &mut PortfolioState,
    shares: u64,
    entry_price: Decimal,
    date: NaiveDate,
    price: Decimal,
    reason: TradeReason,
) -> Result<Trade, BacktestError> {
    let overflow = || BacktestError::Overflow { date };
    let quantity = Decimal::from(shares);
    let proceeds = quantity.checked_mul(price).ok_or_else(overflow)?;
    let pnl = price
        .checked_sub(entry_price)
        .and_then(|change| quantity.checked_mul(change))
        .ok_or_else(overflow)?;

    portfolio.cash = portfolio.cash.checked_add(proceeds).ok_or_else(overflow)?;
    portfolio.realized_profit = portfolio
        .realized_profit
        .checked_add(pnl)
        .ok_or_else(overflow)?;

    Ok(Trade {
        side: Side::Sell,
        date,
        price,
        shares,
        cash_after: portfolio.cash,
        realized_pnl: Some(pnl),
        reason,
    })
}
