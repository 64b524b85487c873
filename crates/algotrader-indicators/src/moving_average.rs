//! Moving average indicators.

use algotrader_core::traits::Indicator;
use serde::{Deserialize, Serialize};

/// Simple Moving Average (SMA).
///
/// Calculates the arithmetic mean of the trailing N values. Each window is
/// summed from its earliest value, so every output depends only on the
/// values inside its own window.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
}

impl Sma {
    /// Create a new SMA with the specified period.
    pub fn new(period: usize) -> Self {
        assert!(period > 0, "Period must be greater than 0");
        Self { period }
    }
}

impl Indicator for Sma {
    type Output = f64;

    fn calculate(&self, data: &[f64]) -> Vec<f64> {
        let mut result = vec![f64::NAN; data.len()];
        if data.len() < self.period {
            return result;
        }

        let period_f64 = self.period as f64;
        for (offset, window) in data.windows(self.period).enumerate() {
            let sum: f64 = window.iter().sum();
            result[offset + self.period - 1] = sum / period_f64;
        }

        result
    }

    fn period(&self) -> usize {
        self.period
    }

    fn name(&self) -> &str {
        "SMA"
    }
}

/// Short and long trailing SMAs aligned to the same price points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageSeries {
    pub short_window: usize,
    pub long_window: usize,
    pub short: Vec<f64>,
    pub long: Vec<f64>,
}

impl MovingAverageSeries {
    /// Compute both averages over `closes`.
    pub fn new(closes: &[f64], short_window: usize, long_window: usize) -> Self {
        Self {
            short_window,
            long_window,
            short: Sma::new(short_window).calculate(closes),
            long: Sma::new(long_window).calculate(closes),
        }
    }

    /// The (short, long) pair at `index`, if both are defined.
    pub fn pair(&self, index: usize) -> Option<(f64, f64)> {
        let short = *self.short.get(index)?;
        let long = *self.long.get(index)?;
        (!short.is_nan() && !long.is_nan()).then_some((short, long))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma() {
        let sma = Sma::new(3);
        let result = sma.calculate(&[10.0, 20.0, 30.0, 40.0]);

        assert_eq!(result.len(), 4);
        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!((result[2] - 20.0).abs() < 1e-10); // (10+20+30)/3
        assert!((result[3] - 30.0).abs() < 1e-10); // (20+30+40)/3
    }

    #[test]
    fn test_sma_insufficient_data() {
        let sma = Sma::new(5);
        let result = sma.calculate(&[1.0, 2.0, 3.0]);

        assert_eq!(result.len(), 3);
        assert!(result.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_sma_defined_iff_window_filled() {
        let data: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        for period in 1..=8 {
            let result = Sma::new(period).calculate(&data);
            for (i, value) in result.iter().enumerate() {
                assert_eq!(!value.is_nan(), i + 1 >= period, "period {period} index {i}");
            }
        }
    }

    #[test]
    fn test_sma_window_is_independent_of_history() {
        // A huge early value must not leave rounding residue in later windows.
        let data = vec![1e16, 1.0, 2.0, 3.0, 4.0];
        let result = Sma::new(2).calculate(&data);
        assert_eq!(result[3], 2.5);
        assert_eq!(result[4], 3.5);
    }

    #[test]
    #[should_panic(expected = "Period must be greater than 0")]
    fn test_sma_zero_period() {
        Sma::new(0);
    }

    #[test]
    fn test_series_pair() {
        let closes = [10.0, 10.0, 10.0, 10.0, 10.0, 9.0];
        let series = MovingAverageSeries::new(&closes, 2, 5);

        assert_eq!(series.short.len(), 6);
        assert_eq!(series.long.len(), 6);
        assert!(series.pair(0).is_none());
        assert!(series.pair(3).is_none()); // long window not filled
        assert_eq!(series.pair(4), Some((10.0, 10.0)));

        let (short, long) = series.pair(5).unwrap();
        assert!((short - 9.5).abs() < 1e-10);
        assert!((long - 9.8).abs() < 1e-10);
        assert!(series.pair(6).is_none());
    }
}
