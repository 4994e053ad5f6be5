//! Strategy configuration

use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::data::{Instrument, Interval};
use crate::error::ConfigError;

/// Which strategy variant drives the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrategyKind {
    /// Trend-filtered MACD crossover with candidate rotation
    #[default]
    Macd,
    /// Dual-threshold RSI mean reversion on a fixed list
    Rsi,
}

impl FromStr for StrategyKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "macd" => Ok(Self::Macd),
            "rsi" => Ok(Self::Rsi),
            other => Err(ConfigError::UnknownStrategy(other.to_string())),
        }
    }
}

/// MACD crossover strategy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacdStrategyConfig {
    /// Candle interval of the main series
    pub interval: Interval,
    /// Number of candles fetched per evaluation
    pub candle_count: usize,
    /// Interval of the recent-low window
    pub recent_low_interval: Interval,
    /// Bars in the recent-low window
    pub recent_low_bars: usize,
    /// Share of the quote balance spent on entry (e.g., 0.99 = 99%)
    pub balance_fraction: f64,
    /// Pause after a successful entry, in seconds
    pub entry_cooldown_secs: u64,
}

impl Default for MacdStrategyConfig {
    fn default() -> Self {
        Self {
            interval: Interval::Minutes(5),
            candle_count: 200,
            recent_low_interval: Interval::Minutes(5),
            recent_low_bars: 20,
            balance_fraction: 0.99,
            entry_cooldown_secs: 120,
        }
    }
}

impl MacdStrategyConfig {
    pub fn entry_cooldown(&self) -> Duration {
        Duration::from_secs(self.entry_cooldown_secs)
    }
}

/// RSI mean reversion strategy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RsiStrategyConfig {
    /// Candle interval
    pub interval: Interval,
    /// Number of candles fetched per evaluation
    pub candle_count: usize,
    /// Entry when RSI rises back above this level
    pub oversold: f64,
    /// Exit when RSI falls back below this level
    pub overbought: f64,
    /// Minimum quote amount invested per entry
    pub investment_floor: f64,
    /// Wait before re-reading RSI near a threshold, in milliseconds
    pub debounce_ms: u64,
    /// Instruments traded
    pub instruments: Vec<Instrument>,
}

impl Default for RsiStrategyConfig {
    fn default() -> Self {
        Self {
            interval: Interval::Minutes(5),
            candle_count: 200,
            oversold: 30.0,
            overbought: 65.0,
            investment_floor: 5000.0,
            debounce_ms: 3000,
            instruments: Vec::new(),
        }
    }
}

impl RsiStrategyConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}
