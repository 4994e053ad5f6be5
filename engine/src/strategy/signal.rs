//! Strategy decisions

use std::fmt;

use crate::portfolio::RiskBounds;

/// Outcome of one strategy evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum Decision {
    /// No action
    Hold { reason: String },
    /// Open a position
    Enter(EntryOrder),
    /// Close the open position
    Exit(ExitReason),
}

/// Parameters of an entry
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntryOrder {
    /// Quote currency to spend
    pub quote_amount: f64,
    /// Price the thresholds were derived from
    pub entry_price: f64,
    pub stop_loss: f64,
    pub take_profit: f64,
}

/// Why a position is closed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    /// RSI fell back below the overbought level
    RsiReversal,
}

/// Decision type without payload, for reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionKind {
    Hold,
    Enter,
    Exit,
}

impl Decision {
    /// Create hold decision
    pub fn hold(reason: impl Into<String>) -> Self {
        Self::Hold {
            reason: reason.into(),
        }
    }

    /// Create entry decision from risk bounds
    pub fn enter(quote_amount: f64, entry_price: f64, bounds: RiskBounds) -> Self {
        Self::Enter(EntryOrder {
            quote_amount,
            entry_price,
            stop_loss: bounds.stop_loss,
            take_profit: bounds.take_profit,
        })
    }

    pub fn kind(&self) -> DecisionKind {
        match self {
            Self::Hold { .. } => DecisionKind::Hold,
            Self::Enter(_) => DecisionKind::Enter,
            Self::Exit(_) => DecisionKind::Exit,
        }
    }
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TakeProfit => "take-profit",
            Self::StopLoss => "stop-loss",
            Self::RsiReversal => "rsi-reversal",
        })
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Hold => "NONE",
            Self::Enter => "ENTER",
            Self::Exit => "EXIT",
        })
    }
}
