//! Exchange integration module
//!
//! The engine talks to the outside world only through the [`Exchange`] and
//! [`InstrumentDirectory`] traits. [`UpbitClient`] implements both against
//! the Upbit REST API; [`PaperExchange`] simulates fills for dry runs.

pub mod auth;
pub mod client;
pub mod order;
pub mod paper;
pub mod responses;

pub use auth::*;
pub use client::*;
pub use order::*;
pub use paper::*;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::data::{Instrument, Interval, PriceBar};
use crate::error::ExchangeError;

/// Market data, balances and market orders
#[async_trait]
pub trait Exchange: Send + Sync {
    /// Up to `count` bars, oldest first
    async fn price_history(
        &self,
        instrument: &Instrument,
        interval: Interval,
        count: usize,
    ) -> Result<Vec<PriceBar>, ExchangeError>;

    /// Last traded price
    async fn current_price(&self, instrument: &Instrument) -> Result<f64, ExchangeError>;

    /// Available balance of `currency`; zero when nothing is held
    async fn balance(&self, currency: &str) -> Result<f64, ExchangeError>;

    /// Quote and base balances of one market
    async fn balances(&self, quote: &str, base: &str) -> Result<(f64, f64), ExchangeError> {
        Ok((self.balance(quote).await?, self.balance(base).await?))
    }

    /// Buy for `quote_amount` of quote currency at market
    async fn place_market_buy(
        &self,
        instrument: &Instrument,
        quote_amount: f64,
    ) -> Result<OrderReceipt, ExchangeError>;

    /// Sell `base_quantity` at market
    async fn place_market_sell(
        &self,
        instrument: &Instrument,
        base_quantity: f64,
    ) -> Result<OrderReceipt, ExchangeError>;
}

/// Instrument universe and market metadata
#[async_trait]
pub trait InstrumentDirectory: Send + Sync {
    async fn list_tradable_instruments(&self) -> Result<Vec<Instrument>, ExchangeError>;

    /// Markets under a warning or any caution flag
    async fn list_caution_flagged_instruments(&self) -> Result<HashSet<Instrument>, ExchangeError>;

    /// Instruments sorted by descending 24h cumulative trade value
    async fn rank_by_24h_volume(
        &self,
        instruments: &[Instrument],
    ) -> Result<Vec<Instrument>, ExchangeError>;
}
