//! MACD (Moving Average Convergence Divergence) indicator

use crate::error::IndicatorError;
use crate::indicators::Indicator;
use ta::indicators::{MovingAverageConvergenceDivergence, MovingAverageConvergenceDivergenceOutput};
use ta::Next;

/// MACD indicator wrapper
#[derive(Debug)]
pub struct MACD {
    inner: MovingAverageConvergenceDivergence,
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    update_count: usize,
    last_output: Option<MovingAverageConvergenceDivergenceOutput>,
}

impl MACD {
    /// Create new MACD indicator
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Result<Self, IndicatorError> {
        let inner =
            MovingAverageConvergenceDivergence::new(fast_period, slow_period, signal_period)
                .map_err(|e| {
                    IndicatorError::InvalidParameter(format!(
                        "MACD({}, {}, {}): {:?}",
                        fast_period, slow_period, signal_period, e
                    ))
                })?;
        Ok(Self {
            inner,
            fast_period,
            slow_period,
            signal_period,
            update_count: 0,
            last_output: None,
        })
    }

    /// Get MACD line value
    pub fn macd(&self) -> Option<f64> {
        self.last_output.as_ref().map(|o| o.macd)
    }

    /// Get signal line value
    pub fn signal(&self) -> Option<f64> {
        self.last_output.as_ref().map(|o| o.signal)
    }

    /// Get histogram value (MACD - Signal)
    pub fn histogram(&self) -> Option<f64> {
        self.last_output.as_ref().map(|o| o.histogram)
    }

    /// Fast, slow and signal periods
    pub fn periods(&self) -> (usize, usize, usize) {
        (self.fast_period, self.slow_period, self.signal_period)
    }

    /// Bars needed before the slow line has seen a full period
    pub fn warmup(&self) -> usize {
        self.slow_period.max(self.fast_period)
    }
}

impl Indicator for MACD {
    fn name(&self) -> &str {
        "MACD"
    }

    fn update(&mut self, value: f64) {
        self.last_output = Some(self.inner.next(value));
        self.update_count += 1;
    }

    fn value(&self) -> Option<f64> {
        self.macd()
    }

    fn is_ready(&self) -> bool {
        // one extra bar so the previous reading exists too
        self.update_count > self.warmup()
    }
}

/// Full MACD series, one entry per input value
#[derive(Debug, Clone, Default)]
pub struct MACDSeries {
    pub macd: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

/// Latest MACD reading together with the previous bar's lines
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MACDPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
    pub prev_macd: f64,
    pub prev_signal: f64,
}

impl MACDPoint {
    /// MACD crossed above the signal line on the latest bar
    pub fn crossed_above(&self) -> bool {
        self.macd > self.signal && self.prev_macd <= self.prev_signal
    }
}

impl MACDSeries {
    pub fn len(&self) -> usize {
        self.macd.len()
    }

    pub fn is_empty(&self) -> bool {
        self.macd.is_empty()
    }

    /// Latest point; needs at least two values
    pub fn latest(&self) -> Option<MACDPoint> {
        let n = self.macd.len();
        if n < 2 {
            return None;
        }
        Some(MACDPoint {
            macd: self.macd[n - 1],
            signal: self.signal[n - 1],
            histogram: self.histogram[n - 1],
            prev_macd: self.macd[n - 2],
            prev_signal: self.signal[n - 2],
        })
    }
}

/// Calculate MACD from a series of values
pub fn calculate_macd(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<MACDSeries, IndicatorError> {
    let mut macd = MACD::new(fast_period, slow_period, signal_period)?;
    let mut series = MACDSeries {
        macd: Vec::with_capacity(values.len()),
        signal: Vec::with_capacity(values.len()),
        histogram: Vec::with_capacity(values.len()),
    };

    for &value in values {
        macd.update(value);
        if let Some(output) = macd.last_output.as_ref() {
            series.macd.push(output.macd);
            series.signal.push(output.signal);
            series.histogram.push(output.histogram);
        }
    }

    Ok(series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::calculate_ema;

    #[test]
    fn test_macd_matches_ema_difference() {
        let values: Vec<f64> = (0..60).map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0).collect();
        let series = calculate_macd(&values, 12, 26, 9).unwrap();
        let fast = calculate_ema(&values, 12).unwrap();
        let slow = calculate_ema(&values, 26).unwrap();
        let signal = calculate_ema(&series.macd, 9).unwrap();

        assert_eq!(series.len(), values.len());
        for i in 0..values.len() {
            assert!((series.macd[i] - (fast[i] - slow[i])).abs() < 1e-9);
            assert!((series.signal[i] - signal[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn test_crossover_detection() {
        let point = MACDPoint {
            macd: -0.5,
            signal: -0.6,
            histogram: 0.1,
            prev_macd: -0.7,
            prev_signal: -0.65,
        };
        assert!(point.crossed_above());

        let no_cross = MACDPoint { prev_macd: -0.55, prev_signal: -0.6, ..point };
        assert!(!no_cross.crossed_above());
    }
}
