//! Paper trading: real market data, simulated fills

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use tracing::info;

use crate::data::{Instrument, Interval, PriceBar};
use crate::error::ExchangeError;
use crate::exchange::{Exchange, OrderReceipt, OrderSide};

/// Upbit KRW market taker fee
pub const DEFAULT_FEE_RATE: f64 = 0.0005;

/// Wraps an exchange, delegating market data and simulating market orders
/// against an in-memory balance book.
///
/// Orders fill immediately and completely at the current price.
pub struct PaperExchange<E> {
    inner: E,
    fee_rate: f64,
    balances: Mutex<HashMap<String, f64>>,
    next_order_id: AtomicU64,
}

impl<E: Exchange> PaperExchange<E> {
    /// Create a paper account holding `quote_balance` of `quote_currency`
    pub fn new(inner: E, quote_currency: &str, quote_balance: f64) -> Self {
        let mut balances = HashMap::new();
        balances.insert(quote_currency.to_string(), quote_balance);
        Self {
            inner,
            fee_rate: DEFAULT_FEE_RATE,
            balances: Mutex::new(balances),
            next_order_id: AtomicU64::new(1),
        }
    }

    pub fn with_fee_rate(mut self, fee_rate: f64) -> Self {
        self.fee_rate = fee_rate;
        self
    }

    /// Simulated balance of `currency`
    pub fn paper_balance(&self, currency: &str) -> f64 {
        self.book()
            .map(|b| b.get(currency).copied().unwrap_or(0.0))
            .unwrap_or(0.0)
    }

    fn book(&self) -> Result<std::sync::MutexGuard<'_, HashMap<String, f64>>, ExchangeError> {
        self.balances
            .lock()
            .map_err(|_| ExchangeError::Malformed("paper balance book poisoned".to_string()))
    }

    fn receipt(&self, instrument: &Instrument, side: OrderSide, amount: f64) -> OrderReceipt {
        let id = self.next_order_id.fetch_add(1, Ordering::Relaxed);
        OrderReceipt {
            order_id: format!("paper-{}", id),
            instrument: instrument.clone(),
            side,
            amount,
        }
    }
}

#[async_trait]
impl<E: Exchange> Exchange for PaperExchange<E> {
    async fn price_history(
        &self,
        instrument: &Instrument,
        interval: Interval,
        count: usize,
    ) -> Result<Vec<PriceBar>, ExchangeError> {
        self.inner.price_history(instrument, interval, count).await
    }

    async fn current_price(&self, instrument: &Instrument) -> Result<f64, ExchangeError> {
        self.inner.current_price(instrument).await
    }

    async fn balance(&self, currency: &str) -> Result<f64, ExchangeError> {
        Ok(self.book()?.get(currency).copied().unwrap_or(0.0))
    }

    async fn balances(&self, quote: &str, base: &str) -> Result<(f64, f64), ExchangeError> {
        let book = self.book()?;
        let get = |currency: &str| book.get(currency).copied().unwrap_or(0.0);
        Ok((get(quote), get(base)))
    }

    async fn place_market_buy(
        &self,
        instrument: &Instrument,
        quote_amount: f64,
    ) -> Result<OrderReceipt, ExchangeError> {
        let price = self.inner.current_price(instrument).await?;
        if price <= 0.0 {
            return Err(ExchangeError::Malformed(format!("non-positive price {}", price)));
        }

        let mut book = self.book()?;
        let cash = book.get(instrument.quote()).copied().unwrap_or(0.0);
        if quote_amount > cash {
            return Err(ExchangeError::InsufficientFunds(format!(
                "need {:.0} {}, have {:.0}",
                quote_amount,
                instrument.quote(),
                cash
            )));
        }

        let quantity = quote_amount * (1.0 - self.fee_rate) / price;
        book.insert(instrument.quote().to_string(), cash - quote_amount);
        *book.entry(instrument.base().to_string()).or_insert(0.0) += quantity;
        drop(book);

        info!(instrument = %instrument, price, quantity, quote_amount, "paper buy filled");
        Ok(self.receipt(instrument, OrderSide::Buy, quote_amount))
    }

    async fn place_market_sell(
        &self,
        instrument: &Instrument,
        base_quantity: f64,
    ) -> Result<OrderReceipt, ExchangeError> {
        let price = self.inner.current_price(instrument).await?;

        let mut book = self.book()?;
        let held = book.get(instrument.base()).copied().unwrap_or(0.0);
        if base_quantity > held {
            return Err(ExchangeError::InsufficientFunds(format!(
                "need {} {}, have {}",
                base_quantity,
                instrument.base(),
                held
            )));
        }

        let proceeds = base_quantity * price * (1.0 - self.fee_rate);
        book.insert(instrument.base().to_string(), held - base_quantity);
        *book.entry(instrument.quote().to_string()).or_insert(0.0) += proceeds;
        drop(book);

        info!(instrument = %instrument, price, base_quantity, proceeds, "paper sell filled");
        Ok(self.receipt(instrument, OrderSide::Sell, base_quantity))
    }
}
