//! Daily OHLCV price types.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A fully populated daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Trading day
    pub date: NaiveDate,
    /// Opening price
    pub open: f64,
    /// Highest price
    pub high: f64,
    /// Lowest price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Trading volume
    pub volume: f64,
}

impl PricePoint {
    /// Create a new price point.
    pub fn new(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Get a field by name.
    pub fn field(&self, field: PriceField) -> f64 {
        match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume,
        }
    }
}

/// The value columns of a daily observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceField {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl PriceField {
    /// All fields in column order.
    pub const ALL: [PriceField; 5] = [
        PriceField::Open,
        PriceField::High,
        PriceField::Low,
        PriceField::Close,
        PriceField::Volume,
    ];
}

impl fmt::Display for PriceField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PriceField::Open => write!(f, "open"),
            PriceField::High => write!(f, "high"),
            PriceField::Low => write!(f, "low"),
            PriceField::Close => write!(f, "close"),
            PriceField::Volume => write!(f, "volume"),
        }
    }
}

/// A daily observation as delivered by a loader.
///
/// Any value may be missing. Non-finite values count as missing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawPricePoint {
    pub date: NaiveDate,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

impl RawPricePoint {
    /// Create a raw point with every field present.
    pub fn complete(date: NaiveDate, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            date,
            open: Some(open),
            high: Some(high),
            low: Some(low),
            close: Some(close),
            volume: Some(volume),
        }
    }

    /// Create a raw point with every field missing.
    pub fn empty(date: NaiveDate) -> Self {
        Self {
            date,
            open: None,
            high: None,
            low: None,
            close: None,
            volume: None,
        }
    }

    /// Get a field, treating NaN and infinities as missing.
    pub fn field(&self, field: PriceField) -> Option<f64> {
        let value = match field {
            PriceField::Open => self.open,
            PriceField::High => self.high,
            PriceField::Low => self.low,
            PriceField::Close => self.close,
            PriceField::Volume => self.volume,
        };
        value.filter(|v| v.is_finite())
    }

    /// Convert to a [`PricePoint`], failing on the first missing field.
    pub fn try_complete(&self) -> Result<PricePoint, PriceField> {
        let get = |field| self.field(field).ok_or(field);
        Ok(PricePoint {
            date: self.date,
            open: get(PriceField::Open)?,
            high: get(PriceField::High)?,
            low: get(PriceField::Low)?,
            close: get(PriceField::Close)?,
            volume: get(PriceField::Volume)?,
        })
    }

    /// Convert to a [`PricePoint`], taking missing fields from `previous`.
    pub fn fill_from(&self, previous: &PricePoint) -> PricePoint {
        let get = |field| self.field(field).unwrap_or_else(|| previous.field(field));
        PricePoint {
            date: self.date,
            open: get(PriceField::Open),
            high: get(PriceField::High),
            low: get(PriceField::Low),
            close: get(PriceField::Close),
            volume: get(PriceField::Volume),
        }
    }

    /// Check whether any field is missing.
    pub fn has_gaps(&self) -> bool {
        PriceField::ALL.iter().any(|&f| self.field(f).is_none())
    }
}

impl From<PricePoint> for RawPricePoint {
    fn from(p: PricePoint) -> Self {
        Self::complete(p.date, p.open, p.high, p.low, p.close, p.volume)
    }
}
