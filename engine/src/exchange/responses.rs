//! Upbit REST response payloads

use std::collections::HashMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Deserializer};

use crate::data::PriceBar;
use crate::error::ExchangeError;

/// Entry of `GET /v1/market/all?isDetails=true`
#[derive(Debug, Clone, Deserialize)]
pub struct MarketInfo {
    pub market: String,
    #[serde(default)]
    pub korean_name: String,
    #[serde(default)]
    pub english_name: String,
    #[serde(default)]
    pub market_event: Option<MarketEvent>,
}

/// Warning and caution flags of a market
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarketEvent {
    #[serde(default)]
    pub warning: bool,
    #[serde(default)]
    pub caution: HashMap<String, bool>,
}

impl MarketInfo {
    /// Under a warning or any caution flag
    pub fn is_flagged(&self) -> bool {
        self.market_event
            .as_ref()
            .map(|e| e.warning || e.caution.values().any(|&flag| flag))
            .unwrap_or(false)
    }
}

/// Entry of `GET /v1/ticker`
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    pub market: String,
    pub trade_price: f64,
    #[serde(default)]
    pub acc_trade_price_24h: f64,
}

/// Entry of `GET /v1/candles/...`
#[derive(Debug, Clone, Deserialize)]
pub struct CandleResponse {
    pub market: String,
    pub candle_date_time_utc: String,
    pub opening_price: f64,
    pub high_price: f64,
    pub low_price: f64,
    pub trade_price: f64,
    pub candle_acc_trade_volume: f64,
}

impl TryFrom<CandleResponse> for PriceBar {
    type Error = ExchangeError;

    fn try_from(c: CandleResponse) -> Result<Self, Self::Error> {
        let timestamp = NaiveDateTime::parse_from_str(&c.candle_date_time_utc, "%Y-%m-%dT%H:%M:%S")
            .map_err(|e| {
                ExchangeError::Malformed(format!(
                    "candle time '{}': {}",
                    c.candle_date_time_utc, e
                ))
            })?
            .and_utc();
        Ok(PriceBar::new(
            timestamp,
            c.opening_price,
            c.high_price,
            c.low_price,
            c.trade_price,
            c.candle_acc_trade_volume,
        ))
    }
}

/// Entry of `GET /v1/accounts`
#[derive(Debug, Clone, Deserialize)]
pub struct Account {
    pub currency: String,
    #[serde(deserialize_with = "f64_from_str")]
    pub balance: f64,
    #[serde(default, deserialize_with = "f64_from_str")]
    pub locked: f64,
    #[serde(default, deserialize_with = "f64_from_str")]
    pub avg_buy_price: f64,
    #[serde(default)]
    pub unit_currency: String,
}

/// Response of `POST /v1/orders`
#[derive(Debug, Clone, Deserialize)]
pub struct OrderResponse {
    pub uuid: String,
    pub side: String,
    pub ord_type: String,
    #[serde(default)]
    pub market: String,
    #[serde(default)]
    pub state: String,
}

/// Error payload, e.g. `{"error":{"name":"insufficient_funds_bid","message":"..."}}`
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub message: String,
}

/// Upbit sends decimal amounts as JSON strings
fn f64_from_str<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Number {
        Text(String),
        Float(f64),
    }

    match Number::deserialize(deserializer)? {
        Number::Text(s) => s.parse().map_err(serde::de::Error::custom),
        Number::Float(f) => Ok(f),
    }
}
