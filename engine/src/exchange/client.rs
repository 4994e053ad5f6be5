//! Upbit REST client

use std::collections::{HashMap, HashSet};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

use crate::data::{Instrument, Interval, PriceBar};
use crate::error::ExchangeError;
use crate::exchange::auth::{query_string, ApiCredentials, RequestSigner};
use crate::exchange::responses::{
    Account, CandleResponse, ErrorBody, MarketInfo, OrderResponse, Ticker,
};
use crate::exchange::{Exchange, InstrumentDirectory, OrderReceipt, OrderSide};

/// Production REST endpoint
pub const UPBIT_API_URL: &str = "https://api.upbit.com";

/// Largest page the candle endpoint returns
const MAX_CANDLES: usize = 200;

/// Upbit REST client
///
/// Public market endpoints work without credentials; balance and order calls
/// fail with [`ExchangeError::Auth`] when none are configured.
#[derive(Debug, Clone)]
pub struct UpbitClient {
    http: Client,
    base_url: String,
    credentials: Option<ApiCredentials>,
}

impl UpbitClient {
    /// Create new client
    pub fn new(base_url: impl Into<String>, credentials: Option<ApiCredentials>) -> Result<Self, ExchangeError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| ExchangeError::Network(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Client for the production endpoint
    pub fn production(credentials: Option<ApiCredentials>) -> Result<Self, ExchangeError> {
        Self::new(UPBIT_API_URL, credentials)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn signer(&self) -> Result<RequestSigner<'_>, ExchangeError> {
        self.credentials
            .as_ref()
            .map(RequestSigner::new)
            .ok_or_else(|| ExchangeError::Auth("no API credentials configured".to_string()))
    }

    async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ExchangeError> {
        let request = self.http.get(self.url(path)).query(params);
        Self::send(request).await
    }

    async fn get_private<T: DeserializeOwned>(&self, path: &str) -> Result<T, ExchangeError> {
        let authorization = self.signer()?.authorization(None)?;
        let request = self
            .http
            .get(self.url(path))
            .header("Authorization", authorization);
        Self::send(request).await
    }

    async fn post_private<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, ExchangeError> {
        let query = query_string(params);
        let authorization = self.signer()?.authorization(Some(&query))?;
        let body: HashMap<&str, &str> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        let request = self
            .http
            .post(self.url(path))
            .header("Authorization", authorization)
            .json(&body);
        Self::send(request).await
    }

    async fn send<T: DeserializeOwned>(request: RequestBuilder) -> Result<T, ExchangeError> {
        let response = request.send().await.map_err(network_error)?;
        let response = check_status(response).await?;
        response
            .json::<T>()
            .await
            .map_err(|e| ExchangeError::Malformed(e.to_string()))
    }

    /// Every market with its warning/caution details
    pub async fn markets(&self) -> Result<Vec<MarketInfo>, ExchangeError> {
        self.get_public("/v1/market/all", &[("isDetails", "true".to_string())])
            .await
    }

    /// Tickers for the given markets
    pub async fn tickers(&self, instruments: &[Instrument]) -> Result<Vec<Ticker>, ExchangeError> {
        if instruments.is_empty() {
            return Ok(Vec::new());
        }
        let markets = instruments
            .iter()
            .map(Instrument::as_str)
            .collect::<Vec<_>>()
            .join(",");
        self.get_public("/v1/ticker", &[("markets", markets)]).await
    }

    /// All account balances
    pub async fn accounts(&self) -> Result<Vec<Account>, ExchangeError> {
        self.get_private("/v1/accounts").await
    }

    /// Verify credentials and return the quote balance.
    pub async fn check_login(&self, quote_currency: &str) -> Result<f64, ExchangeError> {
        let accounts = self.accounts().await?;
        let balance = available(&accounts, quote_currency);
        info!(accounts = accounts.len(), balance, currency = quote_currency, "login ok");
        Ok(balance)
    }

    async fn place_order(
        &self,
        instrument: &Instrument,
        side: OrderSide,
        params: Vec<(&str, String)>,
        amount: f64,
    ) -> Result<OrderReceipt, ExchangeError> {
        let response: OrderResponse = self.post_private("/v1/orders", &params).await?;
        if response.uuid.is_empty() {
            return Err(ExchangeError::Malformed("order response without uuid".to_string()));
        }
        debug!(
            instrument = %instrument,
            order_id = %response.uuid,
            ord_type = %response.ord_type,
            state = %response.state,
            "order accepted"
        );
        Ok(OrderReceipt {
            order_id: response.uuid,
            instrument: instrument.clone(),
            side,
            amount,
        })
    }
}

#[async_trait]
impl Exchange for UpbitClient {
    async fn price_history(
        &self,
        instrument: &Instrument,
        interval: Interval,
        count: usize,
    ) -> Result<Vec<PriceBar>, ExchangeError> {
        if count > MAX_CANDLES {
            warn!(count, max = MAX_CANDLES, "candle count capped");
        }
        let path = format!("/v1/candles/{}", interval.endpoint());
        let candles: Vec<CandleResponse> = self
            .get_public(
                &path,
                &[
                    ("market", instrument.to_string()),
                    ("count", count.min(MAX_CANDLES).to_string()),
                ],
            )
            .await?;

        // newest first on the wire
        let mut bars = candles
            .into_iter()
            .map(PriceBar::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        bars.reverse();
        Ok(bars)
    }

    async fn current_price(&self, instrument: &Instrument) -> Result<f64, ExchangeError> {
        self.tickers(std::slice::from_ref(instrument))
            .await?
            .into_iter()
            .find(|t| t.market == instrument.as_str())
            .map(|t| t.trade_price)
            .ok_or_else(|| ExchangeError::NotFound(format!("no ticker for {}", instrument)))
    }

    async fn balance(&self, currency: &str) -> Result<f64, ExchangeError> {
        Ok(available(&self.accounts().await?, currency))
    }

    /// One `/v1/accounts` call for both sides of the market
    async fn balances(&self, quote: &str, base: &str) -> Result<(f64, f64), ExchangeError> {
        let accounts = self.accounts().await?;
        Ok((available(&accounts, quote), available(&accounts, base)))
    }

    async fn place_market_buy(
        &self,
        instrument: &Instrument,
        quote_amount: f64,
    ) -> Result<OrderReceipt, ExchangeError> {
        // KRW amounts have no fractional part on Upbit
        let price = quote_amount.floor();
        let params = vec![
            ("market", instrument.to_string()),
            ("side", OrderSide::Buy.as_upbit().to_string()),
            ("price", format!("{}", price)),
            ("ord_type", "price".to_string()),
        ];
        self.place_order(instrument, OrderSide::Buy, params, price).await
    }

    async fn place_market_sell(
        &self,
        instrument: &Instrument,
        base_quantity: f64,
    ) -> Result<OrderReceipt, ExchangeError> {
        let params = vec![
            ("market", instrument.to_string()),
            ("side", OrderSide::Sell.as_upbit().to_string()),
            ("volume", format!("{}", base_quantity)),
            ("ord_type", "market".to_string()),
        ];
        self.place_order(instrument, OrderSide::Sell, params, base_quantity)
            .await
    }
}

#[async_trait]
impl InstrumentDirectory for UpbitClient {
    async fn list_tradable_instruments(&self) -> Result<Vec<Instrument>, ExchangeError> {
        Ok(self
            .markets()
            .await?
            .into_iter()
            .filter_map(|m| Instrument::new(m.market).ok())
            .collect())
    }

    async fn list_caution_flagged_instruments(&self) -> Result<HashSet<Instrument>, ExchangeError> {
        Ok(self
            .markets()
            .await?
            .into_iter()
            .filter(MarketInfo::is_flagged)
            .filter_map(|m| Instrument::new(m.market).ok())
            .collect())
    }

    async fn rank_by_24h_volume(
        &self,
        instruments: &[Instrument],
    ) -> Result<Vec<Instrument>, ExchangeError> {
        let mut tickers = self.tickers(instruments).await?;
        tickers.sort_by(|a, b| b.acc_trade_price_24h.total_cmp(&a.acc_trade_price_24h));
        Ok(tickers
            .into_iter()
            .filter_map(|t| Instrument::new(t.market).ok())
            .collect())
    }
}

/// Free balance of `currency`; zero when the account has none
fn available(accounts: &[Account], currency: &str) -> f64 {
    accounts
        .iter()
        .find(|a| a.currency == currency)
        .map(|a| a.balance)
        .unwrap_or(0.0)
}

fn network_error(err: reqwest::Error) -> ExchangeError {
    ExchangeError::Network(err.to_string())
}

/// Map a non-success response to an error
async fn check_status(response: Response) -> Result<Response, ExchangeError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    let detail = serde_json::from_str::<ErrorBody>(&text)
        .map(|b| b.error)
        .ok();
    let (name, message) = match detail {
        Some(d) => (d.name, d.message),
        None => (status.to_string(), text),
    };

    Err(match status {
        StatusCode::TOO_MANY_REQUESTS => ExchangeError::RateLimited(message),
        StatusCode::UNAUTHORIZED => ExchangeError::Auth(format!("{}: {}", name, message)),
        StatusCode::NOT_FOUND => ExchangeError::NotFound(format!("{}: {}", name, message)),
        s if s.is_server_error() => ExchangeError::Network(format!("{}: {}", s, message)),
        _ if name.starts_with("insufficient_funds") => ExchangeError::InsufficientFunds(message),
        _ => ExchangeError::Rejected { code: name, message },
    })
}
