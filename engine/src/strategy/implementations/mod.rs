//! Strategy implementations

pub mod rsi_strategy;
pub mod macd_strategy;

pub use rsi_strategy::*;
pub use macd_strategy::*;

