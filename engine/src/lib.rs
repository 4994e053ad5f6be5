//! Trade-Engine: signal trading on Upbit KRW markets
//!
//! Periodically evaluates a set of instruments with technical indicators,
//! decides to enter, exit or hold, executes market orders and tracks
//! per-instrument positions with stop-loss and take-profit levels.
//!
//! # Features
//!
//! - **Indicators**: trend SMA, EMA, MACD and Wilder RSI
//! - **Strategies**: trend-filtered MACD crossover and dual-threshold RSI
//! - **Candidate Selection**: 24h trade value ranking with exclusion rules
//! - **Portfolio Management**: position ledger and risk bounds
//! - **Exchange Integration**: Upbit REST client and a paper trading wrapper
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use trade_engine::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), TradeError> {
//!     let client = Arc::new(UpbitClient::production(None)?);
//!     let strategy = MACDStrategy::new(MacdStrategyConfig::default(), RiskConfig::default());
//!     let mut controller = TradingCycleController::new(
//!         client.clone(),
//!         client,
//!         Box::new(strategy),
//!         CandidateSelector::new(SelectorConfig::default()),
//!     );
//!     controller.initialize().await?;
//!     controller.run().await;
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod cycle;
pub mod data;
pub mod error;
pub mod exchange;
pub mod indicators;
pub mod portfolio;
pub mod selector;
pub mod strategy;

// Re-export commonly used types
pub mod prelude {
    pub use crate::config::*;
    pub use crate::cycle::*;
    pub use crate::data::*;
    pub use crate::error::*;
    pub use crate::exchange::*;
    pub use crate::indicators::*;
    pub use crate::portfolio::*;
    pub use crate::selector::*;
    pub use crate::strategy::*;
}
