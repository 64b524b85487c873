//! Configuration structures.

use algotrader_backtest::BacktestConfig;
use algotrader_core::error::ConfigError;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main application configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub app: AppSettings,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub backtest: BacktestSettings,
    #[serde(default)]
    pub data: DataSettings,
}

impl AppConfig {
    /// Engine configuration built from the backtest section.
    pub fn to_backtest_config(&self) -> BacktestConfig {
        BacktestConfig::new(
            self.backtest.short_window,
            self.backtest.long_window,
            self.backtest.initial_budget,
        )
    }

    /// Run the engine's parameter checks against the configured values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.to_backtest_config().validate()
    }
}

/// General app settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub name: String,
    pub environment: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            name: "algotrader".to_string(),
            environment: "development".to_string(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    /// `pretty` or `json`
    pub format: String,
    pub file: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
            file: None,
        }
    }
}

/// Backtest settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BacktestSettings {
    pub short_window: usize,
    pub long_window: usize,
    pub initial_budget: Decimal,
}

impl Default for BacktestSettings {
    fn default() -> Self {
        let defaults = BacktestConfig::default();
        Self {
            short_window: defaults.crossover.short_window,
            long_window: defaults.crossover.long_window,
            initial_budget: defaults.initial_budget,
        }
    }
}

/// Where daily prices come from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DataSourceKind {
    #[default]
    Yahoo,
    Csv,
}

/// Price data settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DataSettings {
    pub source: DataSourceKind,
    /// Directory searched for `{SYMBOL}.csv` files when `source = "csv"`
    pub csv_dir: Option<String>,
    pub yahoo_base_url: String,
    pub timeout_secs: u64,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            source: DataSourceKind::Yahoo,
            csv_dir: None,
            yahoo_base_url: "https://query1.finance.yahoo.com".to_string(),
            timeout_secs: 30,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.backtest.short_window, 50);
        assert_eq!(config.backtest.long_window, 200);
        assert_eq!(config.backtest.initial_budget, dec!(5000));
        assert_eq!(config.data.source, DataSourceKind::Yahoo);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_windows() {
        let mut config = AppConfig::default();
        config.backtest.short_window = 200;
        assert_eq!(
            config.validate(),
            Err(ConfigError::WindowOrder {
                short: 200,
                long: 200
            })
        );

        config.backtest.short_window = 20;
        config.backtest.initial_budget = Decimal::ZERO;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::NonPositiveBudget(_))
        ));
    }
}
