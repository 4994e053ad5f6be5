//! Per-instrument position ledger

use std::collections::HashMap;

use chrono::Utc;
use tracing::debug;

use crate::data::Instrument;
use crate::error::LedgerError;
use crate::portfolio::Position;

/// In-memory record of open positions, keyed by instrument.
///
/// Every operation touches only the entry of the instrument it is given.
#[derive(Debug, Default)]
pub struct PositionLedger {
    positions: HashMap<Instrument, Position>,
    order: Vec<Instrument>,
}

impl PositionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a new position.
    ///
    /// Fails if one is already open for the instrument or if the thresholds
    /// do not satisfy `stop_loss < entry_price < take_profit`.
    pub fn open(
        &mut self,
        instrument: &Instrument,
        entry_price: f64,
        entry_cost: f64,
        stop_loss: f64,
        take_profit: f64,
    ) -> Result<&Position, LedgerError> {
        if self.positions.contains_key(instrument) {
            return Err(LedgerError::AlreadyOpen(instrument.clone()));
        }
        if !(stop_loss < entry_price && entry_price < take_profit) {
            return Err(LedgerError::InvalidBounds {
                instrument: instrument.clone(),
                entry_price,
                stop_loss,
                take_profit,
            });
        }

        debug!(instrument = %instrument, entry_price, stop_loss, take_profit, "ledger open");
        self.order.push(instrument.clone());
        let position = self
            .positions
            .entry(instrument.clone())
            .or_insert(Position {
                instrument: instrument.clone(),
                entry_price,
                entry_cost,
                stop_loss,
                take_profit,
                opened_at: Utc::now(),
            });
        Ok(position)
    }

    /// Remove and return the open position
    pub fn close(&mut self, instrument: &Instrument) -> Result<Position, LedgerError> {
        let position = self
            .positions
            .remove(instrument)
            .ok_or_else(|| LedgerError::NotOpen(instrument.clone()))?;
        self.order.retain(|i| i != instrument);
        debug!(instrument = %instrument, "ledger close");
        Ok(position)
    }

    /// Current position, if one is open
    pub fn get(&self, instrument: &Instrument) -> Option<&Position> {
        self.positions.get(instrument)
    }

    pub fn is_open(&self, instrument: &Instrument) -> bool {
        self.positions.contains_key(instrument)
    }

    /// Instruments with an open position, in opening order
    pub fn open_instruments(&self) -> Vec<Instrument> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
