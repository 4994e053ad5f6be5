//! Risk management

use crate::config::RiskConfig;

/// Stop-loss and take-profit attached to an entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBounds {
    pub stop_loss: f64,
    pub take_profit: f64,
    /// Which bound set the stop-loss
    pub stop_source: StopSource,
}

/// Bound that determined the stop-loss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopSource {
    /// Minimum low of the recent short-interval window
    RecentLow,
    /// Trend average line
    TrendAverage,
    /// Fixed percentage band around the entry
    Band,
}

impl RiskBounds {
    /// Check `stop_loss < entry_price < take_profit`
    pub fn brackets(&self, entry_price: f64) -> bool {
        self.stop_loss < entry_price && entry_price < self.take_profit
    }
}

/// Risk manager
#[derive(Debug, Clone)]
pub struct RiskManager {
    config: RiskConfig,
}

impl RiskManager {
    /// Create new risk manager
    pub fn new(config: RiskConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RiskConfig {
        &self.config
    }

    /// Stop at the higher of trend average and recent low.
    ///
    /// The reward multiple depends on which bound won: a recent-low stop is
    /// tighter and gets the larger multiple.
    pub fn trend_bounded(&self, entry_price: f64, trend_average: f64, recent_low: f64) -> RiskBounds {
        let stop_loss = trend_average.max(recent_low);
        if stop_loss == recent_low {
            RiskBounds {
                stop_loss,
                take_profit: entry_price
                    + (entry_price - recent_low) * self.config.recent_low_reward_multiple,
                stop_source: StopSource::RecentLow,
            }
        } else {
            RiskBounds {
                stop_loss,
                take_profit: entry_price
                    + (entry_price - trend_average) * self.config.trend_reward_multiple,
                stop_source: StopSource::TrendAverage,
            }
        }
    }

    /// Fixed percentage band around the entry price
    pub fn banded(&self, entry_price: f64) -> RiskBounds {
        RiskBounds {
            stop_loss: entry_price * (1.0 - self.config.stop_band),
            take_profit: entry_price * (1.0 + self.config.profit_band),
            stop_source: StopSource::Band,
        }
    }

    /// Check order amount against the exchange minimum
    pub fn meets_minimum(&self, quote_amount: f64) -> bool {
        quote_amount >= self.config.min_order_amount
    }
}
