//! SMA (Simple Moving Average) indicator

use crate::error::IndicatorError;
use crate::indicators::Indicator;
use ta::indicators::SimpleMovingAverage;
use ta::Next;

/// SMA indicator wrapper
#[derive(Debug)]
pub struct SMA {
    inner: SimpleMovingAverage,
    period: usize,
    update_count: usize,
    last_value: Option<f64>,
}

impl SMA {
    /// Create new SMA indicator
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let inner = SimpleMovingAverage::new(period)
            .map_err(|e| IndicatorError::InvalidParameter(format!("SMA({}): {:?}", period, e)))?;
        Ok(Self {
            inner,
            period,
            update_count: 0,
            last_value: None,
        })
    }

    /// Get SMA period
    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for SMA {
    fn name(&self) -> &str {
        "SMA"
    }

    fn update(&mut self, value: f64) {
        let sma_value = self.inner.next(value);
        self.update_count += 1;
        // ta averages a partial window; only a full window counts
        if self.update_count >= self.period {
            self.last_value = Some(sma_value);
        }
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.update_count >= self.period
    }
}

/// Calculate SMA from a series of values
pub fn calculate_sma(values: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    let mut sma = SMA::new(period)?;
    let mut results = Vec::with_capacity(values.len());

    for &value in values {
        sma.update(value);
        results.push(sma.value());
    }

    Ok(results)
}

/// Trend reference line: SMA of the trailing `period` closes
pub fn trend_average(closes: &[f64], period: usize) -> Result<f64, IndicatorError> {
    if period == 0 {
        return Err(IndicatorError::InvalidParameter("SMA(0)".to_string()));
    }
    if closes.len() < period {
        return Err(IndicatorError::InsufficientData {
            indicator: "SMA",
            required: period,
            available: closes.len(),
        });
    }
    let window = &closes[closes.len() - period..];
    Ok(window.iter().sum::<f64>() / period as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sma_waits_for_full_window() {
        let sma = calculate_sma(&[1.0, 2.0, 3.0, 4.0], 3).unwrap();
        assert_eq!(sma[0], None);
        assert_eq!(sma[1], None);
        assert_eq!(sma[2], Some(2.0));
        assert_eq!(sma[3], Some(3.0));
    }

    #[test]
    fn test_trend_average_uses_trailing_window() {
        let closes: Vec<f64> = (1..=10).map(f64::from).collect();
        assert_eq!(trend_average(&closes, 4).unwrap(), 8.5);
        assert!(matches!(
            trend_average(&closes, 200),
            Err(IndicatorError::InsufficientData { required: 200, available: 10, .. })
        ));
    }
}
