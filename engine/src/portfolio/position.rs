//! Position tracking

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::Instrument;

/// Open long position on one instrument
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    /// Instrument held
    pub instrument: Instrument,
    /// Entry price
    pub entry_price: f64,
    /// Quote amount spent on entry
    pub entry_cost: f64,
    /// Stop loss price
    pub stop_loss: f64,
    /// Take profit price
    pub take_profit: f64,
    /// Entry time
    pub opened_at: DateTime<Utc>,
}

impl Position {
    /// Check if stop loss is hit
    pub fn is_stop_loss_hit(&self, price: f64) -> bool {
        price < self.stop_loss
    }

    /// Check if take profit is hit
    pub fn is_take_profit_hit(&self, price: f64) -> bool {
        price >= self.take_profit
    }

    /// Unrealized P&L percentage at `price`
    pub fn pnl_percent(&self, price: f64) -> f64 {
        (price - self.entry_price) / self.entry_price * 100.0
    }

    /// Realized P&L percentage at `exit_price`, rounded to two decimals
    pub fn realized_percent(&self, exit_price: f64) -> f64 {
        (self.pnl_percent(exit_price) * 100.0).round() / 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position() -> Position {
        Position {
            instrument: Instrument::new("KRW-BTC").unwrap(),
            entry_price: 100.0,
            entry_cost: 10_000.0,
            stop_loss: 95.0,
            take_profit: 107.5,
            opened_at: Utc::now(),
        }
    }

    #[test]
    fn test_thresholds() {
        let pos = position();
        assert!(pos.is_take_profit_hit(107.5));
        assert!(!pos.is_take_profit_hit(107.4));
        assert!(pos.is_stop_loss_hit(94.9));
        assert!(!pos.is_stop_loss_hit(95.0));
    }

    #[test]
    fn test_realized_percent() {
        let pos = position();
        assert_eq!(pos.realized_percent(107.5), 7.5);
        assert_eq!(pos.realized_percent(94.333), -5.67);
    }
}
