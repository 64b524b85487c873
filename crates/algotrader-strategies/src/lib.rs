//! Moving average crossover signal detection.
//!
//! The strategy decides *when* a crossover happens; position handling and
//! accounting live in the backtest engine.

pub mod ma_crossover;

pub use ma_crossover::{detect_crossover, CrossSignal, MACrossoverConfig, MACrossoverStrategy};
