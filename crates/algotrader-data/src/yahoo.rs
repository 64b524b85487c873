//! Yahoo Finance chart API price source.

use algotrader_core::error::DataError;
use algotrader_core::traits::PriceSource;
use algotrader_core::types::RawPricePoint;
use async_trait::async_trait;
use chrono::{DateTime, Days, NaiveDate, NaiveTime};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Default chart API host.
pub const DEFAULT_YAHOO_BASE_URL: &str = "https://query1.finance.yahoo.com";

const USER_AGENT: &str = concat!("algotrader/", env!("CARGO_PKG_VERSION"));

/// Chart API response types
#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    result: Option<Vec<ChartResult>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: ChartIndicators,
}

#[derive(Debug, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct ChartIndicators {
    #[serde(default)]
    quote: Vec<ChartQuote>,
}

#[derive(Debug, Default, Deserialize)]
struct ChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

/// Daily bars from the Yahoo Finance chart endpoint.
pub struct YahooPriceSource {
    client: Client,
    base_url: String,
}

impl YahooPriceSource {
    /// Create a source against `base_url` with a request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl PriceSource for YahooPriceSource {
    async fn fetch_daily(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawPricePoint>, DataError> {
        let url = format!("{}/v8/finance/chart/{}", self.base_url, symbol);
        let (period1, period2) = period_bounds(from, to);

        let resp = self
            .client
            .get(&url)
            .query(&[
                ("period1", period1.to_string()),
                ("period2", period2.to_string()),
                ("interval", "1d".to_string()),
                ("events", "history".to_string()),
            ])
            .send()
            .await
            .map_err(|e| DataError::ConnectionError(e.to_string()))?;

        if resp.status() == StatusCode::NOT_FOUND {
            return Err(DataError::SymbolNotFound(symbol.to_string()));
        }

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(DataError::ConnectionError(format!("{}: {}", status, text)));
        }

        let body: ChartResponse = resp
            .json()
            .await
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        let points = parse_chart(symbol, body, from, to)?;
        debug!(symbol, rows = points.len(), "Fetched Yahoo daily prices");
        Ok(points)
    }

    fn name(&self) -> &str {
        "yahoo"
    }
}

/// Unix-second bounds covering [from, to]; the upper bound is exclusive.
fn period_bounds(from: NaiveDate, to: NaiveDate) -> (i64, i64) {
    let start = from.and_time(NaiveTime::MIN);
    let end = to
        .checked_add_days(Days::new(1))
        .unwrap_or(to)
        .and_time(NaiveTime::MIN);
    (start.and_utc().timestamp(), end.and_utc().timestamp())
}

fn parse_chart(
    symbol: &str,
    body: ChartResponse,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<RawPricePoint>, DataError> {
    if let Some(err) = body.chart.error {
        return Err(if err.code == "Not Found" {
            DataError::SymbolNotFound(symbol.to_string())
        } else {
            DataError::ConnectionError(format!("{}: {}", err.code, err.description))
        });
    }

    let result = body
        .chart
        .result
        .and_then(|r| r.into_iter().next())
        .ok_or(DataError::NoDataAvailable)?;

    let quote = result.indicators.quote.into_iter().next().unwrap_or_default();
    let at = |column: &[Option<f64>], i: usize| column.get(i).copied().flatten();

    let mut points = Vec::with_capacity(result.timestamp.len());
    for (i, ts) in result.timestamp.iter().enumerate() {
        let local = ts + result.meta.gmtoffset;
        let date = DateTime::from_timestamp(local, 0)
            .ok_or_else(|| DataError::ParseError(format!("Invalid timestamp: {}", ts)))?
            .date_naive();
        if date < from || date > to {
            continue;
        }

        points.push(RawPricePoint {
            date,
            open: at(&quote.open, i),
            high: at(&quote.high, i),
            low: at(&quote.low, i),
            close: at(&quote.close, i),
            volume: at(&quote.volume, i),
        });
    }

    if points.is_empty() {
        return Err(DataError::NoDataAvailable);
    }
    Ok(points)
}
