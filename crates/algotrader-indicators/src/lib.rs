//! Moving average indicators.
//!
//! Outputs are aligned with their input: one value per price point, NaN
//! until the window has filled.

pub mod moving_average;

pub use moving_average::{MovingAverageSeries, Sma};
