//! Risk management configuration

use serde::{Deserialize, Serialize};

/// Risk management configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskConfig {
    /// Smallest order the exchange accepts, in quote currency
    pub min_order_amount: f64,
    /// Take-profit multiple of the risk when the recent low sets the stop
    pub recent_low_reward_multiple: f64,
    /// Take-profit multiple of the risk when the trend average sets the stop
    pub trend_reward_multiple: f64,
    /// Stop-loss band below entry (e.g., 0.05 = 5%)
    pub stop_band: f64,
    /// Take-profit band above entry (e.g., 0.10 = 10%)
    pub profit_band: f64,
}

impl Default for RiskConfig {
    fn default() -> Self {
        Self {
            min_order_amount: 5000.0,
            recent_low_reward_multiple: 2.0,
            trend_reward_multiple: 1.5,
            stop_band: 0.05,
            profit_band: 0.10,
        }
    }
}
