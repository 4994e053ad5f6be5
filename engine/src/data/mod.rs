//! Data module
//!
//! Market identifiers, candle intervals and OHLCV price bars.

pub mod candle;
pub mod market;

pub use candle::*;
pub use market::*;
