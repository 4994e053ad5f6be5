//! RSI (Relative Strength Index) indicator with Wilder smoothing

use crate::error::IndicatorError;
use crate::indicators::Indicator;

/// RSI indicator
///
/// Average gain and loss are seeded with the arithmetic mean of the first
/// `period` deltas, then smoothed with
/// `avg = (avg_prev * (period - 1) + current) / period`.
#[derive(Debug, Clone)]
pub struct RSI {
    period: usize,
    prev_close: Option<f64>,
    gain_sum: f64,
    loss_sum: f64,
    deltas: usize,
    avg_gain: f64,
    avg_loss: f64,
    last_value: Option<f64>,
}

impl RSI {
    /// Create new RSI indicator
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        if period == 0 {
            return Err(IndicatorError::InvalidParameter("RSI(0)".to_string()));
        }
        Ok(Self {
            period,
            prev_close: None,
            gain_sum: 0.0,
            loss_sum: 0.0,
            deltas: 0,
            avg_gain: 0.0,
            avg_loss: 0.0,
            last_value: None,
        })
    }

    /// Get RSI period
    pub fn period(&self) -> usize {
        self.period
    }

    fn compute(&self) -> f64 {
        if self.avg_loss == 0.0 {
            return 100.0;
        }
        let rs = self.avg_gain / self.avg_loss;
        100.0 - 100.0 / (1.0 + rs)
    }
}

impl Indicator for RSI {
    fn name(&self) -> &str {
        "RSI"
    }

    fn update(&mut self, value: f64) {
        let Some(prev) = self.prev_close.replace(value) else {
            return;
        };

        let change = value - prev;
        let gain = change.max(0.0);
        let loss = (-change).max(0.0);
        self.deltas += 1;

        if self.deltas < self.period {
            self.gain_sum += gain;
            self.loss_sum += loss;
            return;
        }

        if self.deltas == self.period {
            self.gain_sum += gain;
            self.loss_sum += loss;
            self.avg_gain = self.gain_sum / self.period as f64;
            self.avg_loss = self.loss_sum / self.period as f64;
        } else {
            let p = self.period as f64;
            self.avg_gain = (self.avg_gain * (p - 1.0) + gain) / p;
            self.avg_loss = (self.avg_loss * (p - 1.0) + loss) / p;
        }

        self.last_value = Some(self.compute());
    }

    fn value(&self) -> Option<f64> {
        self.last_value
    }

    fn is_ready(&self) -> bool {
        // period deltas need period + 1 closes
        self.deltas >= self.period
    }
}

/// Calculate RSI from a series of values
pub fn calculate_rsi(values: &[f64], period: usize) -> Result<Vec<Option<f64>>, IndicatorError> {
    let mut rsi = RSI::new(period)?;
    let mut results = Vec::with_capacity(values.len());

    for &value in values {
        rsi.update(value);
        results.push(rsi.value());
    }

    Ok(results)
}

/// Latest RSI value of a close series
pub fn latest_rsi(closes: &[f64], period: usize) -> Result<f64, IndicatorError> {
    let mut rsi = RSI::new(period)?;
    for &close in closes {
        rsi.update(close);
    }
    rsi.value().ok_or(IndicatorError::InsufficientData {
        indicator: "RSI",
        required: period + 1,
        available: closes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rsi() {
        let mut rsi = RSI::new(14).unwrap();
        let values = vec![100.0, 102.0, 101.0, 103.0, 105.0, 104.0, 106.0];

        for value in values {
            rsi.update(value);
        }

        // RSI needs at least period+1 values to be ready
        assert!(!rsi.is_ready());
        assert_eq!(rsi.value(), None);
    }

    #[test]
    fn test_rsi_seed_and_smoothing() {
        // deltas: +1, -1, +2, then +1 after the seed window of 3
        let closes = [10.0, 11.0, 10.0, 12.0, 13.0];
        let series = calculate_rsi(&closes, 3).unwrap();
        assert_eq!(&series[..3], &[None, None, None]);

        // seed: avg_gain = 3/3 = 1, avg_loss = 1/3
        let seeded = series[3].unwrap();
        assert!((seeded - 75.0).abs() < 1e-9);

        // smoothed: avg_gain = (1*2 + 1)/3 = 1, avg_loss = (1/3*2 + 0)/3 = 2/9
        let expected = 100.0 - 100.0 / (1.0 + 1.0 / (2.0 / 9.0));
        assert!((series[4].unwrap() - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rsi_without_losses_is_100() {
        let closes: Vec<f64> = (0..20).map(|i| 50.0 + i as f64).collect();
        assert_eq!(latest_rsi(&closes, 14).unwrap(), 100.0);

        let flat = vec![42.0; 20];
        assert_eq!(latest_rsi(&flat, 14).unwrap(), 100.0);
    }

    #[test]
    fn test_rsi_without_gains_is_0() {
        let closes: Vec<f64> = (0..20).map(|i| 50.0 - i as f64).collect();
        assert_eq!(latest_rsi(&closes, 14).unwrap(), 0.0);
    }

    #[test]
    fn test_latest_rsi_insufficient_data() {
        let err = latest_rsi(&[1.0, 2.0, 3.0], 14).unwrap_err();
        assert_eq!(
            err,
            IndicatorError::InsufficientData {
                indicator: "RSI",
                required: 15,
                available: 3
            }
        );
    }
}
