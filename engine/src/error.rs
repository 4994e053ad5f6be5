//! Error taxonomy for the trading engine.
//!
//! Every failure that can happen while evaluating one instrument is a
//! [`TradeError`]. The cycle controller reports it under its
//! [`ErrorCategory`] and moves on to the next instrument.

use std::fmt;

use thiserror::Error;

use crate::data::Instrument;

/// Errors reported by exchange and instrument-directory collaborators.
#[derive(Debug, Clone, Error)]
pub enum ExchangeError {
    /// Connection failure, timeout or 5xx response.
    #[error("network error: {0}")]
    Network(String),

    /// The exchange throttled the request (HTTP 429).
    #[error("rate limited: {0}")]
    RateLimited(String),

    /// Not enough funds to place the order.
    #[error("insufficient funds: {0}")]
    InsufficientFunds(String),

    /// Exchange-side rejection with an error code.
    #[error("rejected [{code}]: {message}")]
    Rejected {
        /// Exchange error name.
        code: String,
        /// Human readable message.
        message: String,
    },

    /// The response could not be parsed.
    #[error("malformed response: {0}")]
    Malformed(String),

    /// Credentials were refused.
    #[error("authentication failed: {0}")]
    Auth(String),

    /// The requested market or resource does not exist.
    #[error("not found: {0}")]
    NotFound(String),
}

/// Errors raised by the indicator engine.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum IndicatorError {
    /// Not enough bars to compute the indicator.
    #[error("insufficient data for {indicator}: need {required} bars, have {available}")]
    InsufficientData {
        /// Indicator name.
        indicator: &'static str,
        /// Minimum number of input values.
        required: usize,
        /// Number of input values provided.
        available: usize,
    },

    /// Invalid indicator parameters (zero period and the like).
    #[error("invalid indicator parameter: {0}")]
    InvalidParameter(String),
}

/// Errors raised by the position ledger.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LedgerError {
    /// A position is already open for the instrument.
    #[error("position already open for {0}")]
    AlreadyOpen(Instrument),

    /// No position is open for the instrument.
    #[error("no open position for {0}")]
    NotOpen(Instrument),

    /// Risk thresholds violate `stop_loss < entry_price < take_profit`.
    #[error("invalid risk bounds for {instrument}: stop_loss={stop_loss}, entry={entry_price}, take_profit={take_profit}")]
    InvalidBounds {
        instrument: Instrument,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
    },
}

/// Configuration parsing errors.
#[derive(Debug, Clone, Error)]
pub enum ConfigError {
    #[error("invalid instrument '{0}': expected QUOTE-BASE")]
    InvalidInstrument(String),

    #[error("unsupported candle interval '{0}'")]
    InvalidInterval(String),

    #[error("unknown strategy '{0}': expected 'macd' or 'rsi'")]
    UnknownStrategy(String),

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Failure of one instrument evaluation or of a whole pass.
#[derive(Debug, Clone, Error)]
pub enum TradeError {
    /// Missing or empty price data, or not enough bars for an indicator.
    #[error("data unavailable: {0}")]
    DataUnavailable(String),

    /// A balance query failed.
    #[error("balance query failed: {0}")]
    BalanceUnavailable(String),

    /// The exchange refused the order for lack of funds.
    #[error("insufficient balance: {0}")]
    InsufficientBalance(String),

    /// Exchange-side rejection or malformed order response.
    #[error("order rejected: {0}")]
    OrderRejected(String),

    /// Connectivity, timeout or rate limit.
    #[error("transient network failure: {0}")]
    TransientNetwork(String),

    /// Position ledger invariant violation.
    #[error("invalid state: {0}")]
    InvalidState(#[from] LedgerError),

    /// Anything else.
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

/// Diagnostic category used to tag error reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Data,
    Balance,
    Order,
    Network,
    State,
    Unexpected,
}

impl ErrorCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Data => "data",
            Self::Balance => "balance",
            Self::Order => "order",
            Self::Network => "network",
            Self::State => "state",
            Self::Unexpected => "unexpected",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TradeError {
    /// Category this error is reported under.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::DataUnavailable(_) => ErrorCategory::Data,
            Self::BalanceUnavailable(_) => ErrorCategory::Balance,
            Self::InsufficientBalance(_) | Self::OrderRejected(_) => ErrorCategory::Order,
            Self::TransientNetwork(_) => ErrorCategory::Network,
            Self::InvalidState(_) => ErrorCategory::State,
            Self::Unexpected(_) => ErrorCategory::Unexpected,
        }
    }

    /// Classify a failed order call.
    ///
    /// Network-level failures stay transient; everything else the exchange
    /// says about an order counts as a rejection.
    pub fn from_order(err: ExchangeError) -> Self {
        match err {
            ExchangeError::InsufficientFunds(msg) => Self::InsufficientBalance(msg),
            ExchangeError::Network(msg) | ExchangeError::RateLimited(msg) => {
                Self::TransientNetwork(msg)
            }
            other => Self::OrderRejected(other.to_string()),
        }
    }

    /// Classify a failed balance query.
    pub fn from_balance(err: ExchangeError) -> Self {
        match err {
            ExchangeError::Network(msg) | ExchangeError::RateLimited(msg) => {
                Self::TransientNetwork(msg)
            }
            other => Self::BalanceUnavailable(other.to_string()),
        }
    }
}

impl From<ExchangeError> for TradeError {
    fn from(err: ExchangeError) -> Self {
        match err {
            ExchangeError::Network(msg) | ExchangeError::RateLimited(msg) => {
                Self::TransientNetwork(msg)
            }
            ExchangeError::InsufficientFunds(msg) => Self::InsufficientBalance(msg),
            ExchangeError::NotFound(msg) | ExchangeError::Malformed(msg) => {
                Self::DataUnavailable(msg)
            }
            other => Self::Unexpected(other.to_string()),
        }
    }
}

impl From<IndicatorError> for TradeError {
    fn from(err: IndicatorError) -> Self {
        Self::DataUnavailable(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_errors_are_classified() {
        let err = TradeError::from_order(ExchangeError::InsufficientFunds("bid".into()));
        assert_eq!(err.category(), ErrorCategory::Order);
        assert!(matches!(err, TradeError::InsufficientBalance(_)));

        let err = TradeError::from_order(ExchangeError::RateLimited("429".into()));
        assert_eq!(err.category(), ErrorCategory::Network);

        let err = TradeError::from_order(ExchangeError::Malformed("no uuid".into()));
        assert!(matches!(err, TradeError::OrderRejected(_)));
    }

    #[test]
    fn test_balance_errors_are_classified() {
        let err = TradeError::from_balance(ExchangeError::Auth("jwt".into()));
        assert_eq!(err.category(), ErrorCategory::Balance);
    }

    #[test]
    fn test_indicator_error_is_data_failure() {
        let err: TradeError = IndicatorError::InsufficientData {
            indicator: "RSI",
            required: 15,
            available: 3,
        }
        .into();
        assert_eq!(err.category(), ErrorCategory::Data);
        assert!(err.to_string().contains("need 15 bars, have 3"));
    }
}
