//! Technical indicators module
//!
//! EMA, SMA and MACD delegate to the `ta` crate; RSI uses Wilder smoothing.
//! [`IndicatorSnapshot`] bundles the values a strategy reads for one bar.

pub mod ema;
pub mod macd;
pub mod rsi;
pub mod sma;
pub mod snapshot;

pub use ema::*;
pub use macd::*;
pub use rsi::*;
pub use sma::*;
pub use snapshot::*;

/// Indicator trait for all indicators
pub trait Indicator {
    /// Get the name of the indicator
    fn name(&self) -> &str;

    /// Update indicator with new value
    fn update(&mut self, value: f64);

    /// Get current indicator value
    fn value(&self) -> Option<f64>;

    /// Check if indicator is ready (has enough data)
    fn is_ready(&self) -> bool;
}
