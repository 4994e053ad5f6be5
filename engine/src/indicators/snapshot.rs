//! Indicator values at the latest bar of a series

use serde::{Deserialize, Serialize};

use crate::data::PriceSeries;
use crate::error::IndicatorError;
use crate::indicators::{calculate_macd, latest_rsi, trend_average, MACDPoint};

/// Indicator periods
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    /// Trend average (SMA) period
    pub trend_period: usize,
    /// MACD fast EMA period
    pub macd_fast: usize,
    /// MACD slow EMA period
    pub macd_slow: usize,
    /// MACD signal EMA period
    pub macd_signal: usize,
    /// RSI period
    pub rsi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            trend_period: 200,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            rsi_period: 14,
        }
    }
}

/// Indicator values derived from a price series at its most recent bar.
///
/// Recomputed from scratch on every evaluation. An indicator without enough
/// input is stored as its error, so a strategy that does not need it is not
/// affected.
#[derive(Debug, Clone)]
pub struct IndicatorSnapshot {
    /// Close of the latest bar
    pub last_close: f64,
    /// Number of bars the snapshot was computed from
    pub bars: usize,
    trend_average: Result<f64, IndicatorError>,
    macd: Result<MACDPoint, IndicatorError>,
    rsi: Result<f64, IndicatorError>,
}

impl IndicatorSnapshot {
    /// Compute every indicator for the latest bar of `series`
    pub fn compute(series: &PriceSeries, params: &IndicatorParams) -> Result<Self, IndicatorError> {
        let last_close = series
            .last()
            .map(|b| b.close)
            .ok_or(IndicatorError::InsufficientData {
                indicator: "price series",
                required: 1,
                available: 0,
            })?;
        let closes = series.closes();

        Ok(Self {
            last_close,
            bars: closes.len(),
            trend_average: trend_average(&closes, params.trend_period),
            macd: macd_point(&closes, params),
            rsi: latest_rsi(&closes, params.rsi_period),
        })
    }

    /// Build a snapshot from precomputed values
    pub fn from_values(
        last_close: f64,
        trend_average: Option<f64>,
        macd: Option<MACDPoint>,
        rsi: Option<f64>,
    ) -> Self {
        let missing = |indicator| IndicatorError::InsufficientData {
            indicator,
            required: 1,
            available: 0,
        };
        Self {
            last_close,
            bars: 0,
            trend_average: trend_average.ok_or_else(|| missing("SMA")),
            macd: macd.ok_or_else(|| missing("MACD")),
            rsi: rsi.ok_or_else(|| missing("RSI")),
        }
    }

    /// Trend average or the reason it is missing
    pub fn trend_average(&self) -> Result<f64, IndicatorError> {
        self.trend_average.clone()
    }

    /// Latest MACD point or the reason it is missing
    pub fn macd(&self) -> Result<MACDPoint, IndicatorError> {
        self.macd.clone()
    }

    /// Latest RSI or the reason it is missing
    pub fn rsi(&self) -> Result<f64, IndicatorError> {
        self.rsi.clone()
    }
}

fn macd_point(closes: &[f64], params: &IndicatorParams) -> Result<MACDPoint, IndicatorError> {
    let required = params.macd_slow.max(params.macd_fast) + 1;
    if closes.len() < required {
        return Err(IndicatorError::InsufficientData {
            indicator: "MACD",
            required,
            available: closes.len(),
        });
    }
    calculate_macd(closes, params.macd_fast, params.macd_slow, params.macd_signal)?
        .latest()
        .ok_or(IndicatorError::InsufficientData {
            indicator: "MACD",
            required,
            available: closes.len(),
        })
}
