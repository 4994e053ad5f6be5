//! Base strategy trait and evaluation context

use std::time::Duration;

use crate::data::{Instrument, Interval};
use crate::error::IndicatorError;
use crate::indicators::IndicatorSnapshot;
use crate::portfolio::Position;
use crate::strategy::{Decision, StrategyMemory};

/// Base trait for all trading strategies
///
/// Evaluation is a pure function of the context, the instrument's memory and
/// its open position. The cycle controller performs all I/O around it.
pub trait Strategy: Send + Sync {
    /// Get strategy name
    fn name(&self) -> &str;

    /// Market data the controller must fetch before evaluating
    fn requirements(&self) -> DataRequirements;

    /// How the instrument list is chosen and refreshed
    fn candidate_policy(&self) -> CandidatePolicy;

    /// Pause after a successful entry
    fn entry_cooldown(&self) -> Option<Duration> {
        None
    }

    /// Delay before fetching data for an instrument close to a threshold
    fn debounce(&self, _memory: &StrategyMemory, _position: Option<&Position>) -> Option<Duration> {
        None
    }

    /// Decide what to do with one instrument.
    ///
    /// An error means an indicator the strategy needs could not be computed;
    /// the controller treats it as no action.
    fn evaluate(
        &self,
        ctx: &MarketContext<'_>,
        memory: &mut StrategyMemory,
        position: Option<&Position>,
    ) -> Result<Decision, IndicatorError>;
}

/// Market state of one instrument at evaluation time
#[derive(Debug, Clone)]
pub struct MarketContext<'a> {
    pub instrument: &'a Instrument,
    /// Current traded price
    pub price: f64,
    pub snapshot: &'a IndicatorSnapshot,
    /// Available quote currency
    pub quote_balance: f64,
    /// Base currency held
    pub holdings: f64,
    /// Minimum low of the recent-low window, when requested
    pub recent_low: Option<f64>,
}

/// Candle data a strategy needs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataRequirements {
    pub interval: Interval,
    pub candle_count: usize,
    pub recent_low: Option<RecentLowWindow>,
}

/// Short window whose minimum low bounds the stop-loss
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecentLowWindow {
    pub interval: Interval,
    pub bars: usize,
}

/// Candidate set policy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidatePolicy {
    /// Ranked universe; focus on held instruments after an entry and
    /// re-rank after an exit
    Rotating,
    /// Fixed instrument list
    Fixed(Vec<Instrument>),
}
