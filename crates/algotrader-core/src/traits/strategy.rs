//! Strategy trait definitions.

use crate::error::ConfigError;

/// Configuration trait for strategies.
pub trait StrategyConfig: Send + Sync + Clone + 'static {
    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError>;
}
