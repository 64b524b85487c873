//! Moving Average Crossover Strategy.
//!
//! Generates a golden cross when the short MA crosses above the long MA,
//! and a death cross when the short MA crosses below the long MA.

use algotrader_core::{error::ConfigError, traits::StrategyConfig};
use algotrader_indicators::MovingAverageSeries;
use serde::{Deserialize, Serialize};

/// Configuration for the MA Crossover strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MACrossoverConfig {
    /// Short moving average window
    pub short_window: usize,
    /// Long moving average window
    pub long_window: usize,
}

impl Default for MACrossoverConfig {
    fn default() -> Self {
        Self {
            short_window: 50,
            long_window: 200,
        }
    }
}

impl StrategyConfig for MACrossoverConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.short_window == 0 {
            return Err(ConfigError::ZeroWindow { name: "Short" });
        }
        if self.long_window == 0 {
            return Err(ConfigError::ZeroWindow { name: "Long" });
        }
        if self.short_window >= self.long_window {
            return Err(ConfigError::WindowOrder {
                short: self.short_window,
                long: self.long_window,
            });
        }
        Ok(())
    }
}

/// A detected crossover.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossSignal {
    /// Short MA moved from below to above the long MA
    GoldenCross,
    /// Short MA moved from above to below the long MA
    DeathCross,
}

/// Compare two consecutive (short, long) pairs.
///
/// Both sides must be strictly ordered on both days; a tie on either day is
/// never a crossover.
pub fn detect_crossover(previous: (f64, f64), current: (f64, f64)) -> Option<CrossSignal> {
    let (prev_short, prev_long) = previous;
    let (short, long) = current;

    if prev_short < prev_long && short > long {
        Some(CrossSignal::GoldenCross)
    } else if prev_short > prev_long && short < long {
        Some(CrossSignal::DeathCross)
    } else {
        None
    }
}

/// Moving Average Crossover Strategy.
#[derive(Debug, Clone)]
pub struct MACrossoverStrategy {
    config: MACrossoverConfig,
}

impl MACrossoverStrategy {
    /// Create a new MA Crossover strategy.
    pub fn new(config: MACrossoverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Compute the aligned short/long averages for a close series.
    pub fn averages(&self, closes: &[f64]) -> MovingAverageSeries {
        MovingAverageSeries::new(closes, self.config.short_window, self.config.long_window)
    }

    /// Signal on day `index`, comparing it with day `index - 1`.
    pub fn signal_at(&self, averages: &MovingAverageSeries, index: usize) -> Option<CrossSignal> {
        let previous = averages.pair(index.checked_sub(1)?)?;
        let current = averages.pair(index)?;
        detect_crossover(previous, current)
    }

    /// First index at which a signal is possible.
    pub fn warmup_period(&self) -> usize {
        self.config.long_window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_validation() {
        let mut config = MACrossoverConfig::default();
        assert!(config.validate().is_ok());

        config.short_window = 30;
        config.long_window = 20;
        assert_eq!(
            config.validate(),
            Err(ConfigError::WindowOrder { short: 30, long: 20 })
        );

        config.long_window = 30;
        assert!(config.validate().is_err());

        config.short_window = 0;
        assert_eq!(config.validate(), Err(ConfigError::ZeroWindow { name: "Short" }));
    }

    #[test]
    fn test_detect_crossover() {
        assert_eq!(
            detect_crossover((9.0, 10.0), (11.0, 10.0)),
            Some(CrossSignal::GoldenCross)
        );
        assert_eq!(
            detect_crossover((11.0, 10.0), (9.0, 10.0)),
            Some(CrossSignal::DeathCross)
        );
        assert_eq!(detect_crossover((11.0, 10.0), (12.0, 10.0)), None);
    }

    #[test]
    fn test_ties_are_not_crossovers() {
        assert_eq!(detect_crossover((10.0, 10.0), (11.0, 10.0)), None);
        assert_eq!(detect_crossover((9.0, 10.0), (10.0, 10.0)), None);
        assert_eq!(detect_crossover((10.0, 10.0), (9.0, 10.0)), None);
        assert_eq!(detect_crossover((11.0, 10.0), (10.0, 10.0)), None);
    }

    #[test]
    fn test_signal_at() {
        let strategy = MACrossoverStrategy::new(MACrossoverConfig {
            short_window: 2,
            long_window: 3,
        })
        .unwrap();

        // Downtrend then a jump
        let closes = [10.0, 9.0, 8.0, 7.0, 12.0];
        let averages = strategy.averages(&closes);

        assert_eq!(strategy.signal_at(&averages, 0), None);
        assert_eq!(strategy.signal_at(&averages, 2), None); // day 1 has no long MA
        assert_eq!(strategy.signal_at(&averages, 3), None);
        assert_eq!(
            strategy.signal_at(&averages, 4),
            Some(CrossSignal::GoldenCross)
        );
        assert_eq!(strategy.signal_at(&averages, 5), None);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let result = MACrossoverStrategy::new(MACrossoverConfig {
            short_window: 5,
            long_window: 5,
        });
        assert!(result.is_err());
    }
}
