//! Daily price loaders and series normalization.

mod csv_source;
mod normalize;
mod yahoo;

pub use csv_source::CsvPriceSource;
pub use normalize::normalize;
pub use yahoo::{YahooPriceSource, DEFAULT_YAHOO_BASE_URL};

use algotrader_core::error::DataError;
use algotrader_core::traits::PriceSource;
use algotrader_core::types::PricePoint;
use chrono::NaiveDate;
use tracing::info;

/// Fetch a symbol's daily history and normalize it.
pub async fn load_normalized(
    source: &dyn PriceSource,
    symbol: &str,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<PricePoint>, DataError> {
    info!(symbol, %from, %to, source = source.name(), "Fetching daily prices");
    let raw = source.fetch_daily(symbol, from, to).await?;
    let fetched = raw.len();
    let points = normalize(raw)?;
    info!(symbol, fetched, kept = points.len(), "Price series normalized");
    Ok(points)
}
