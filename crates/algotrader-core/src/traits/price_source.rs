//! Price source trait definitions.

use crate::error::DataError;
use crate::types::RawPricePoint;
use async_trait::async_trait;
use chrono::NaiveDate;

/// Trait for historical daily price sources.
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Fetch daily observations.
    ///
    /// # Arguments
    /// * `symbol` - The symbol to fetch
    /// * `from` - First day of the range (inclusive)
    /// * `to` - Last day of the range (inclusive)
    ///
    /// # Returns
    /// Observations ordered from oldest to newest. Days without data are
    /// simply absent; individual fields may be missing.
    async fn fetch_daily(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawPricePoint>, DataError>;

    /// Get the source name.
    fn name(&self) -> &str;
}
