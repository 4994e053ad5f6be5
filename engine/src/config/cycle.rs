//! Trading loop and candidate selection configuration

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Trading loop timing
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Sleep between two passes, in milliseconds
    pub pass_interval_ms: u64,
    /// Delay before retrying after a failed pass, in milliseconds
    pub retry_delay_ms: u64,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            pass_interval_ms: 0,
            retry_delay_ms: 1000,
        }
    }
}

impl CycleConfig {
    pub fn pass_interval(&self) -> Duration {
        Duration::from_millis(self.pass_interval_ms)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

/// Candidate universe filtering
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectorConfig {
    /// Quote currency of tradable markets
    pub quote_currency: String,
    /// Keep this many markets from the 24h trade value ranking
    pub top_n: usize,
    /// Markets containing any of these substrings are excluded
    pub denylist: Vec<String>,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            quote_currency: "KRW".to_string(),
            top_n: 22,
            denylist: vec!["XRP".to_string(), "USDT".to_string()],
        }
    }
}
