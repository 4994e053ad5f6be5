//! Order management

use serde::{Deserialize, Serialize};

use crate::data::Instrument;

/// Order side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderSide {
    /// Buy
    Buy,
    /// Sell
    Sell,
}

impl OrderSide {
    /// Side name used by the Upbit order API
    pub fn as_upbit(&self) -> &'static str {
        match self {
            Self::Buy => "bid",
            Self::Sell => "ask",
        }
    }
}

/// Acknowledgement of an accepted market order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderReceipt {
    /// Exchange order identifier
    pub order_id: String,
    /// Instrument traded
    pub instrument: Instrument,
    /// Order side
    pub side: OrderSide,
    /// Quote amount for buys, base quantity for sells
    pub amount: f64,
}
