//! Series normalization: first-wins deduplication and forward fill.

use algotrader_core::error::DataError;
use algotrader_core::types::{PricePoint, RawPricePoint};
use tracing::debug;

/// Clean a raw daily series.
///
/// Keeps the first observation of each date and fills missing fields from
/// the most recent earlier value. The first observation must be complete.
/// Dates must not go backwards.
pub fn normalize(raw: Vec<RawPricePoint>) -> Result<Vec<PricePoint>, DataError> {
    let mut iter = raw.into_iter();
    let first = iter.next().ok_or(DataError::EmptySeries)?;
    let first = first
        .try_complete()
        .map_err(|field| DataError::IncompleteFirstObservation {
            date: first.date,
            field,
        })?;

    let mut points = vec![first];
    let mut duplicates = 0usize;
    let mut filled = 0usize;

    for observation in iter {
        // `points` is never empty here
        let previous = points[points.len() - 1];

        if observation.date == previous.date {
            duplicates += 1;
            continue;
        }
        if observation.date < previous.date {
            return Err(DataError::OutOfOrder {
                previous: previous.date,
                current: observation.date,
            });
        }
        if observation.has_gaps() {
            filled += 1;
        }
        points.push(observation.fill_from(&previous));
    }

    if duplicates > 0 || filled > 0 {
        debug!(duplicates, filled, "Cleaned price series");
    }

    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use algotrader_core::types::PriceField;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn raw(d: u32, close: f64) -> RawPricePoint {
        RawPricePoint::complete(day(d), close, close + 1.0, close - 1.0, close, 1000.0)
    }

    #[test]
    fn test_empty_series() {
        assert!(matches!(normalize(vec![]), Err(DataError::EmptySeries)));
    }

    #[test]
    fn test_keeps_first_duplicate() {
        let points = normalize(vec![raw(2, 10.0), raw(3, 11.0), raw(3, 99.0), raw(4, 12.0)]).unwrap();

        assert_eq!(points.len(), 3);
        assert_eq!(points[1].date, day(3));
        assert_eq!(points[1].close, 11.0);
    }

    #[test]
    fn test_forward_fills_each_field() {
        let mut gappy = RawPricePoint::empty(day(3));
        gappy.open = Some(10.5);
        let mut nan_close = raw(4, 0.0);
        nan_close.close = Some(f64::NAN);

        let points = normalize(vec![raw(2, 10.0), gappy, nan_close]).unwrap();

        assert_eq!(points[1].open, 10.5);
        assert_eq!(points[1].close, 10.0);
        assert_eq!(points[1].volume, 1000.0);
        assert_eq!(points[2].close, 10.0);
        assert_eq!(points[2].open, 0.0);
    }

    #[test]
    fn test_incomplete_first_observation() {
        let mut first = raw(2, 10.0);
        first.high = None;

        match normalize(vec![first, raw(3, 11.0)]) {
            Err(DataError::IncompleteFirstObservation { date, field }) => {
                assert_eq!(date, day(2));
                assert_eq!(field, PriceField::High);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_out_of_order() {
        let result = normalize(vec![raw(2, 10.0), raw(4, 11.0), raw(3, 12.0)]);
        assert!(matches!(
            result,
            Err(DataError::OutOfOrder { previous, current }) if previous == day(4) && current == day(3)
        ));
    }

    #[test]
    fn test_output_strictly_ascending() {
        let input = vec![raw(2, 1.0), raw(2, 2.0), raw(5, 3.0), raw(5, 4.0), raw(5, 5.0), raw(9, 6.0)];
        let points = normalize(input).unwrap();

        assert!(points.windows(2).all(|w| w[0].date < w[1].date));
        assert_eq!(
            points.iter().map(|p| p.close).collect::<Vec<_>>(),
            vec![1.0, 3.0, 6.0]
        );
    }
}
