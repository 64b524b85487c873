//! CSV price source.

use algotrader_core::error::DataError;
use algotrader_core::traits::PriceSource;
use algotrader_core::types::RawPricePoint;
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// CSV record format. Empty or unparseable numeric cells are missing values.
#[derive(Debug, Deserialize)]
struct CsvRecord {
    #[serde(alias = "Date", alias = "date", alias = "timestamp", alias = "Timestamp")]
    date: String,
    #[serde(alias = "Open", default, deserialize_with = "csv::invalid_option")]
    open: Option<f64>,
    #[serde(alias = "High", default, deserialize_with = "csv::invalid_option")]
    high: Option<f64>,
    #[serde(alias = "Low", default, deserialize_with = "csv::invalid_option")]
    low: Option<f64>,
    #[serde(alias = "Close", default, deserialize_with = "csv::invalid_option")]
    close: Option<f64>,
    #[serde(
        alias = "Adj Close",
        alias = "adj_close",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    adj_close: Option<f64>,
    #[serde(alias = "Volume", default, deserialize_with = "csv::invalid_option")]
    volume: Option<f64>,
}

/// CSV data source for historical daily prices.
///
/// `root` is either a single CSV file, used for every symbol, or a directory
/// holding one file per symbol.
pub struct CsvPriceSource {
    root: PathBuf,
}

impl CsvPriceSource {
    /// Create a new CSV data source.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, DataError> {
        let root = root.into();
        if !root.exists() {
            return Err(DataError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("data path '{}' does not exist", root.display()),
            )));
        }
        Ok(Self { root })
    }

    /// Find the file holding `symbol`.
    ///
    /// Directories are searched for `{SYMBOL}.csv`, `{symbol}.csv`,
    /// `{SYMBOL}_daily.csv` and `{symbol}_daily.csv`.
    pub fn resolve(&self, symbol: &str) -> Result<PathBuf, DataError> {
        if self.root.is_file() {
            return Ok(self.root.clone());
        }

        let lower = symbol.to_lowercase();
        let candidates = [
            self.root.join(format!("{}.csv", symbol)),
            self.root.join(format!("{}.csv", lower)),
            self.root.join(format!("{}_daily.csv", symbol)),
            self.root.join(format!("{}_daily.csv", lower)),
        ];
        candidates
            .into_iter()
            .find(|path| path.is_file())
            .ok_or_else(|| DataError::SymbolNotFound(symbol.to_string()))
    }

    /// Load every observation from a file, ordered by date.
    pub fn load_file(path: &Path) -> Result<Vec<RawPricePoint>, DataError> {
        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| DataError::ParseError(e.to_string()))?;

        // `Adj Close` stands in for a missing Close column, never for a missing cell
        let has_close = reader
            .headers()
            .map_err(|e| DataError::ParseError(e.to_string()))?
            .iter()
            .any(|h| matches!(h, "close" | "Close"));

        let mut points = Vec::new();

        for result in reader.deserialize() {
            let record: CsvRecord = result.map_err(|e| DataError::ParseError(e.to_string()))?;
            points.push(RawPricePoint {
                date: parse_date(&record.date)?,
                open: record.open,
                high: record.high,
                low: record.low,
                close: if has_close { record.close } else { record.adj_close },
                volume: record.volume,
            });
        }

        // Stable sort: duplicates keep their file order
        points.sort_by_key(|p| p.date);

        debug!(path = %path.display(), rows = points.len(), "Loaded CSV prices");
        Ok(points)
    }
}

#[async_trait]
impl PriceSource for CsvPriceSource {
    async fn fetch_daily(
        &self,
        symbol: &str,
        from: NaiveDate,
        to: NaiveDate,
    ) -> Result<Vec<RawPricePoint>, DataError> {
        let path = self.resolve(symbol)?;
        let points: Vec<RawPricePoint> = Self::load_file(&path)?
            .into_iter()
            .filter(|p| p.date >= from && p.date <= to)
            .collect();

        if points.is_empty() {
            return Err(DataError::NoDataAvailable);
        }
        Ok(points)
    }

    fn name(&self) -> &str {
        "csv"
    }
}

/// Parse various date formats.
fn parse_date(date_str: &str) -> Result<NaiveDate, DataError> {
    let formats = ["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d-%m-%Y"];
    for format in formats {
        if let Ok(d) = NaiveDate::parse_from_str(date_str, format) {
            return Ok(d);
        }
    }

    if let Ok(dt) = NaiveDateTime::parse_from_str(date_str, "%Y-%m-%d %H:%M:%S") {
        return Ok(dt.date());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(date_str) {
        return Ok(dt.date_naive());
    }

    // Unix timestamp, milliseconds if > 10 digits
    if let Ok(ts) = date_str.parse::<i64>() {
        let secs = if ts > 10_000_000_000 { ts / 1000 } else { ts };
        if let Some(dt) = DateTime::from_timestamp(secs, 0) {
            return Ok(dt.date_naive());
        }
    }

    Err(DataError::ParseError(format!(
        "Could not parse date: {}",
        date_str
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn day(m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, m, d).unwrap()
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("2024-01-15").unwrap(), day(1, 15));
        assert_eq!(parse_date("01/15/2024").unwrap(), day(1, 15));
        assert_eq!(parse_date("2024-01-15 10:30:00").unwrap(), day(1, 15));
        assert_eq!(parse_date("1705312800000").unwrap(), day(1, 15)); // Unix ms
        assert_eq!(parse_date("1705312800").unwrap(), day(1, 15)); // Unix sec
        assert!(parse_date("yesterday").is_err());
    }

    #[test]
    fn test_load_file_with_gaps() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL.csv");
        fs::write(
            &path,
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-03,11,12,10,11.5,11.4,2000\n\
             2024-01-02,10,11,9,10.5,10.4,1000\n\
             2024-01-04,,13,11,,12.4,null\n",
        )
        .unwrap();

        let points = CsvPriceSource::load_file(&path).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[0].date, day(1, 2));
        assert_eq!(points[0].close, Some(10.5));
        assert_eq!(points[2].open, None);
        assert_eq!(points[2].close, None);
        assert_eq!(points[2].volume, None);
    }

    #[test]
    fn test_empty_close_is_forward_filled_not_adjusted() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL.csv");
        fs::write(
            &path,
            "Date,Open,High,Low,Close,Adj Close,Volume\n\
             2024-01-02,100,101,99,100,50,1000\n\
             2024-01-03,100,101,99,,51,1000\n",
        )
        .unwrap();

        let points = crate::normalize(CsvPriceSource::load_file(&path).unwrap()).unwrap();

        let closes: Vec<f64> = points.iter().map(|p| p.close).collect();
        assert_eq!(closes, vec![100.0, 100.0]);
    }

    #[test]
    fn test_adjusted_close_used_without_close_column() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("AAPL.csv");
        fs::write(
            &path,
            "Date,Open,High,Low,Adj Close,Volume\n\
             2024-01-02,100,101,99,98.5,1000\n\
             2024-01-03,100,101,99,,1000\n",
        )
        .unwrap();

        let points = CsvPriceSource::load_file(&path).unwrap();

        assert_eq!(points[0].close, Some(98.5));
        assert_eq!(points[1].close, None);
    }

    #[test]
    fn test_resolve_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("msft_daily.csv"), "Date,Close\n").unwrap();

        let source = CsvPriceSource::new(dir.path()).unwrap();
        assert_eq!(
            source.resolve("MSFT").unwrap(),
            dir.path().join("msft_daily.csv")
        );
        assert!(matches!(
            source.resolve("AAPL"),
            Err(DataError::SymbolNotFound(_))
        ));
    }

    #[test]
    fn test_missing_root() {
        assert!(CsvPriceSource::new("/definitely/not/here").is_err());
    }

    #[tokio::test]
    async fn test_fetch_daily_filters_range() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prices.csv");
        fs::write(
            &path,
            "date,open,high,low,close,volume\n\
             2024-01-02,10,11,9,10,100\n\
             2024-01-03,10,11,9,11,100\n\
             2024-01-04,10,11,9,12,100\n\
             2024-01-05,10,11,9,13,100\n",
        )
        .unwrap();

        let source = CsvPriceSource::new(&path).unwrap();
        let points = source
            .fetch_daily("ANY", day(1, 3), day(1, 4))
            .await
            .unwrap();

        assert_eq!(points.len(), 2);
        assert_eq!(points[0].close, Some(11.0));
        assert_eq!(points[1].date, day(1, 4));

        let empty = source.fetch_daily("ANY", day(2, 1), day(2, 5)).await;
        assert!(matches!(empty, Err(DataError::NoDataAvailable)));
    }
}
