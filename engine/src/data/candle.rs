//! OHLCV price bar data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar of a candle series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    /// Bar open time
    pub timestamp: DateTime<Utc>,
    /// Opening price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Closing price
    pub close: f64,
    /// Traded volume in base units
    pub volume: f64,
}

impl PriceBar {
    /// Create a new bar
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Chronologically ordered bars, oldest first
#[derive(Debug, Clone, Default)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, sorting the bars oldest first
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self { bars }
    }

    /// Get number of bars
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    /// Check if series is empty
    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Get last bar
    pub fn last(&self) -> Option<&PriceBar> {
        self.bars.last()
    }

    /// Get close prices as vector
    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    /// Minimum low over the last `count` bars
    pub fn recent_low(&self, count: usize) -> Option<f64> {
        let start = self.bars.len().saturating_sub(count);
        self.bars[start..]
            .iter()
            .map(|b| b.low)
            .fold(None, |acc: Option<f64>, low| match acc {
                Some(min) => Some(min.min(low)),
                None => Some(low),
            })
    }
}

impl From<Vec<PriceBar>> for PriceSeries {
    fn from(bars: Vec<PriceBar>) -> Self {
        Self::new(bars)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn bar(minutes: i64, low: f64, close: f64) -> PriceBar {
        let ts = DateTime::<Utc>::from_timestamp(1_700_000_000, 0).unwrap()
            + Duration::minutes(minutes);
        PriceBar::new(ts, close, close + 1.0, low, close, 10.0)
    }

    #[test]
    fn test_series_is_sorted_oldest_first() {
        let series = PriceSeries::new(vec![bar(10, 1.0, 3.0), bar(0, 1.0, 1.0), bar(5, 1.0, 2.0)]);
        assert_eq!(series.closes(), vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_recent_low_uses_trailing_window() {
        let series = PriceSeries::new(vec![
            bar(0, 50.0, 60.0),
            bar(5, 90.0, 95.0),
            bar(10, 85.0, 96.0),
            bar(15, 88.0, 97.0),
        ]);
        assert_eq!(series.recent_low(3), Some(85.0));
        assert_eq!(series.recent_low(10), Some(50.0));
        assert_eq!(PriceSeries::default().recent_low(20), None);
    }
}
