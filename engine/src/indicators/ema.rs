//! EMA (Exponential Moving Average) indicator

use crate::error::IndicatorError;
use crate::indicators::Indicator;
use ta::indicators::ExponentialMovingAverage;
use ta::Next;

/// EMA indicator wrapper
///
/// Smoothing factor is `2 / (period + 1)` and the first output equals the
/// first input, so the series carries no warm-up bias correction.
#[derive(Debug)]
pub struct EMA {
    inner: ExponentialMovingAverage,
    period: usize,
    update_count: usize,
    last_value: Option<f64>,
}

impl EMA {
    /// Create new EMA indicator
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let inner = ExponentialMovingAverage::new(period)
            .map_err(|e| IndicatorError::InvalidParameter(format!("EMA({}): {:?}", period, e)))?;
        Ok(Self {
            inner,
            period,
            update_count: 0,
            last_value: None,
        })
    }

    /// Get EMA period
    pub fn period(&self) -> usize {
        self.period
    }
}

impl Indicator for EMA {
    fn name(&self) -> &str {
        "EMA"
    }

    fn update(&mut self, value: f64) {
        self.last_value = Some(self.inner.next(value));
        self.update_count += 1;
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        self.update_count >= self.period
    }
}

/// Calculate EMA from a series of values
///
/// The output has one value per input.
pub fn calculate_ema(values: &[f64], period: usize) -> Result<Vec<f64>, IndicatorError> {
    let mut ema = ExponentialMovingAverage::new(period)
        .map_err(|e| IndicatorError::InvalidParameter(format!("EMA({}): {:?}", period, e)))?;
    Ok(values.iter().map(|&v| ema.next(v)).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ema_seeded_with_first_value() {
        let values = [10.0, 11.0, 12.0, 13.0];
        let ema = calculate_ema(&values, 3).unwrap();
        assert_eq!(ema.len(), values.len());
        assert_eq!(ema[0], 10.0);
        // k = 2 / (3 + 1) = 0.5
        assert!((ema[1] - 10.5).abs() < 1e-12);
        assert!((ema[2] - 11.25).abs() < 1e-12);
    }

    #[test]
    fn test_ema_rejects_zero_period() {
        assert!(EMA::new(0).is_err());
        assert!(calculate_ema(&[1.0], 0).is_err());
    }
}
