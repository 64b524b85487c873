//! Configuration management.

mod settings;

pub use settings::{
    AppConfig, AppSettings, BacktestSettings, DataSettings, DataSourceKind, LoggingConfig,
};

use config::{Config, ConfigError, Environment, File};
use std::path::Path;

/// Environment variable prefix, e.g. `ALGOTRADER__BACKTEST__SHORT_WINDOW`.
pub const ENV_PREFIX: &str = "ALGOTRADER";

/// Load configuration from file and environment.
pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, true)
}

/// Like [`load_config`], but a missing file leaves defaults and environment.
pub fn load_config_or_env(path: &Path) -> Result<AppConfig, ConfigError> {
    build(path, false)
}

fn build(path: &Path, file_required: bool) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from(path).required(file_required))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    config.try_deserialize()
}

/// Render a configuration as TOML.
pub fn to_toml(config: &AppConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::io::Write;

    #[test]
    fn test_load_partial_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[backtest]\nshort_window = 20\nlong_window = 100\ninitial_budget = 2500\n\n[data]\nsource = \"csv\"\ncsv_dir = \"data\"\nyahoo_base_url = \"http://localhost\"\ntimeout_secs = 5"
        )
        .unwrap();

        let config = load_config(file.path()).unwrap();

        assert_eq!(config.backtest.short_window, 20);
        assert_eq!(config.backtest.long_window, 100);
        assert_eq!(config.backtest.initial_budget, dec!(2500));
        assert_eq!(config.data.source, DataSourceKind::Csv);
        assert_eq!(config.data.csv_dir.as_deref(), Some("data"));
        assert_eq!(config.logging, LoggingConfig::default());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(&dir.path().join("absent.toml")).is_err());
    }

    #[test]
    fn test_environment_applies_without_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        // Keys not asserted by other tests in this module, which share the process env
        std::env::set_var("ALGOTRADER__DATA__TIMEOUT_SECS", "7");
        std::env::set_var("ALGOTRADER__APP__ENVIRONMENT", "ci");
        let result = load_config_or_env(&path);
        std::env::remove_var("ALGOTRADER__DATA__TIMEOUT_SECS");
        std::env::remove_var("ALGOTRADER__APP__ENVIRONMENT");

        let config = result.unwrap();
        assert_eq!(config.data.timeout_secs, 7);
        assert_eq!(config.app.environment, "ci");
        assert_eq!(config.backtest, BacktestSettings::default());
    }

    #[test]
    fn test_toml_roundtrip() {
        let config = AppConfig::default();
        let rendered = to_toml(&config).unwrap();
        assert!(rendered.contains("[backtest]"));

        let parsed: AppConfig = toml::from_str(&rendered).unwrap();
        assert_eq!(parsed, config);
    }
}
