//! Trading cycle controller - main execution loop

use std::any::Any;
use std::collections::HashMap;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tracing::{debug, error, info};

use crate::config::CycleConfig;
use crate::cycle::{CycleEvent, EventSink, IndicatorReadout, TracingSink};
use crate::data::{Instrument, Interval, PriceSeries};
use crate::error::{ErrorCategory, TradeError};
use crate::exchange::{Exchange, InstrumentDirectory};
use crate::indicators::{IndicatorParams, IndicatorSnapshot};
use crate::portfolio::{Position, PositionLedger};
use crate::selector::CandidateSelector;
use crate::strategy::{CandidatePolicy, Decision, MarketContext, Strategy, StrategyMemory};

/// Counters of one pass over the candidate set
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassSummary {
    pub evaluated: usize,
    pub entries: usize,
    pub exits: usize,
    pub failures: usize,
}

/// What happened to one instrument
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Held,
    Entered,
    Exited,
}

/// Candidate change applied after the current pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CandidateUpdate {
    /// Narrow to instruments with open positions
    FocusHeld,
    /// Re-rank the universe
    Refresh,
}

/// The trading cycle controller
///
/// Evaluates the candidate set one instrument at a time, executes decisions
/// through the exchange and owns the position ledger and strategy memory.
/// A failure on one instrument is reported and the pass moves on.
pub struct TradingCycleController {
    exchange: Arc<dyn Exchange>,
    directory: Arc<dyn InstrumentDirectory>,
    strategy: Box<dyn Strategy>,
    selector: CandidateSelector,
    sink: Arc<dyn EventSink>,
    params: IndicatorParams,
    config: CycleConfig,
    ledger: PositionLedger,
    memory: HashMap<Instrument, StrategyMemory>,
    candidates: Vec<Instrument>,
    pending: Option<CandidateUpdate>,
}

impl TradingCycleController {
    /// Create a controller with an empty candidate set
    pub fn new(
        exchange: Arc<dyn Exchange>,
        directory: Arc<dyn InstrumentDirectory>,
        strategy: Box<dyn Strategy>,
        selector: CandidateSelector,
    ) -> Self {
        Self {
            exchange,
            directory,
            strategy,
            selector,
            sink: Arc::new(TracingSink),
            params: IndicatorParams::default(),
            config: CycleConfig::default(),
            ledger: PositionLedger::new(),
            memory: HashMap::new(),
            candidates: Vec::new(),
            pending: None,
        }
    }

    /// Set the event sink
    pub fn with_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn with_indicator_params(mut self, params: IndicatorParams) -> Self {
        self.params = params;
        self
    }

    pub fn with_cycle_config(mut self, config: CycleConfig) -> Self {
        self.config = config;
        self
    }

    pub fn ledger(&self) -> &PositionLedger {
        &self.ledger
    }

    pub fn candidates(&self) -> &[Instrument] {
        &self.candidates
    }

    /// Memory of one instrument, if it has been evaluated
    pub fn memory(&self, instrument: &Instrument) -> Option<&StrategyMemory> {
        self.memory.get(instrument)
    }

    /// Build the initial candidate set from the strategy's policy
    pub async fn initialize(&mut self) -> Result<&[Instrument], TradeError> {
        let candidates = match self.strategy.candidate_policy() {
            CandidatePolicy::Fixed(instruments) => instruments,
            CandidatePolicy::Rotating => self.selector.select(self.directory.as_ref()).await?,
        };
        info!(
            strategy = self.strategy.name(),
            candidates = candidates.len(),
            "controller initialized"
        );
        self.set_candidates(candidates);
        Ok(&self.candidates)
    }

    /// Loop over passes forever
    pub async fn run(&mut self) {
        info!(strategy = self.strategy.name(), "starting trading cycle");
        loop {
            match self.run_pass().await {
                Ok(summary) if summary.evaluated == 0 => {
                    debug!("no candidates; waiting before the next refresh");
                    pause(self.config.retry_delay()).await;
                }
                Ok(_) => pause(self.config.pass_interval()).await,
                Err(err) => {
                    self.sink.emit(&CycleEvent::PassFailed {
                        message: err.to_string(),
                    });
                    pause(self.config.retry_delay()).await;
                }
            }
        }
    }

    /// Evaluate every candidate once, then apply any pending candidate
    /// update.
    ///
    /// Per-instrument failures are counted in the summary. An error is
    /// returned only when the candidate update fails; the previous set is
    /// kept and the update is retried after the next pass.
    pub async fn run_pass(&mut self) -> Result<PassSummary, TradeError> {
        let mut summary = PassSummary::default();
        let candidates = self.candidates.clone();
        if candidates.is_empty() {
            self.request_refresh();
        }

        for instrument in &candidates {
            summary.evaluated += 1;
            let result = AssertUnwindSafe(self.evaluate_instrument(instrument))
                .catch_unwind()
                .await
                .unwrap_or_else(|payload| {
                    Err(TradeError::Unexpected(format!(
                        "panic: {}",
                        panic_message(payload)
                    )))
                });

            match result {
                Ok(Outcome::Held) => {}
                Ok(Outcome::Entered) => summary.entries += 1,
                Ok(Outcome::Exited) => summary.exits += 1,
                Err(err) => {
                    summary.failures += 1;
                    self.report(Some(instrument), &err);
                }
            }
        }

        self.apply_pending_update().await?;
        debug!(
            evaluated = summary.evaluated,
            entries = summary.entries,
            exits = summary.exits,
            failures = summary.failures,
            "pass complete"
        );
        Ok(summary)
    }

    async fn evaluate_instrument(&mut self, instrument: &Instrument) -> Result<Outcome, TradeError> {
        let mut position = self.ledger.get(instrument).cloned();
        let mut memory = self.memory.get(instrument).cloned().unwrap_or_default();

        if let Some(delay) = self.strategy.debounce(&memory, position.as_ref()) {
            debug!(instrument = %instrument, delay_ms = delay.as_millis() as u64, "debounce");
            tokio::time::sleep(delay).await;
        }

        let (quote_balance, holdings) = self
            .exchange
            .balances(instrument.quote(), instrument.base())
            .await
            .map_err(TradeError::from_balance)?;
        let price = self.exchange.current_price(instrument).await?;

        let requirements = self.strategy.requirements();
        let series = self
            .fetch_series(instrument, requirements.interval, requirements.candle_count)
            .await?;
        let recent_low = match requirements.recent_low {
            None => None,
            Some(window) if window.interval == requirements.interval => {
                series.recent_low(window.bars)
            }
            Some(window) => self
                .fetch_series(instrument, window.interval, window.bars)
                .await?
                .recent_low(window.bars),
        };

        if position.is_some() && holdings <= 0.0 {
            self.ledger.close(instrument)?;
            position = None;
            self.sink.emit(&CycleEvent::Diagnostic {
                category: ErrorCategory::State,
                instrument: Some(instrument.clone()),
                message: "position cleared: no holdings left".to_string(),
            });
            self.request_refresh();
        }

        let snapshot = IndicatorSnapshot::compute(&series, &self.params)?;
        let ctx = MarketContext {
            instrument,
            price,
            snapshot: &snapshot,
            quote_balance,
            holdings,
            recent_low,
        };
        let evaluated = self.strategy.evaluate(&ctx, &mut memory, position.as_ref());
        self.memory.insert(instrument.clone(), memory);

        let decision = match evaluated {
            Ok(decision) => decision,
            Err(err) => {
                self.report(Some(instrument), &TradeError::from(err.clone()));
                Decision::hold(err.to_string())
            }
        };

        self.sink.emit(&CycleEvent::Decision {
            instrument: instrument.clone(),
            kind: decision.kind(),
            price,
            indicators: IndicatorReadout::from_snapshot(&snapshot),
            reason: match &decision {
                Decision::Hold { reason } => Some(reason.clone()),
                Decision::Exit(reason) => Some(reason.to_string()),
                Decision::Enter(_) => None,
            },
        });

        match decision {
            Decision::Hold { .. } => Ok(Outcome::Held),
            Decision::Enter(order) => {
                let receipt = self
                    .exchange
                    .place_market_buy(instrument, order.quote_amount)
                    .await
                    .map_err(TradeError::from_order)?;
                self.ledger.open(
                    instrument,
                    order.entry_price,
                    order.quote_amount,
                    order.stop_loss,
                    order.take_profit,
                )?;
                self.sink.emit(&CycleEvent::Entered {
                    instrument: instrument.clone(),
                    order_id: receipt.order_id,
                    quote_amount: order.quote_amount,
                    entry_price: order.entry_price,
                    stop_loss: order.stop_loss,
                    take_profit: order.take_profit,
                });
                if matches!(self.strategy.candidate_policy(), CandidatePolicy::Rotating) {
                    self.pending = Some(CandidateUpdate::FocusHeld);
                }
                if let Some(cooldown) = self.strategy.entry_cooldown() {
                    debug!(cooldown_secs = cooldown.as_secs(), "entry cooldown");
                    tokio::time::sleep(cooldown).await;
                }
                Ok(Outcome::Entered)
            }
            Decision::Exit(reason) => {
                let receipt = self
                    .exchange
                    .place_market_sell(instrument, holdings)
                    .await
                    .map_err(TradeError::from_order)?;
                let closed: Position = self.ledger.close(instrument)?;
                self.sink.emit(&CycleEvent::Exited {
                    instrument: instrument.clone(),
                    order_id: receipt.order_id,
                    reason,
                    exit_price: price,
                    realized_pct: closed.realized_percent(price),
                });
                self.request_refresh();
                Ok(Outcome::Exited)
            }
        }
    }

    async fn fetch_series(
        &self,
        instrument: &Instrument,
        interval: Interval,
        count: usize,
    ) -> Result<PriceSeries, TradeError> {
        let bars = self
            .exchange
            .price_history(instrument, interval, count)
            .await?;
        if bars.is_empty() {
            return Err(TradeError::DataUnavailable(format!(
                "no {} candles for {}",
                interval, instrument
            )));
        }
        Ok(PriceSeries::new(bars))
    }

    /// Re-rank the universe after this pass; fixed lists never change
    fn request_refresh(&mut self) {
        if matches!(self.strategy.candidate_policy(), CandidatePolicy::Rotating) {
            self.pending = Some(CandidateUpdate::Refresh);
        }
    }

    async fn apply_pending_update(&mut self) -> Result<(), TradeError> {
        let Some(update) = self.pending else {
            return Ok(());
        };

        let held = self.ledger.open_instruments();
        let candidates = if update == CandidateUpdate::FocusHeld && !held.is_empty() {
            held
        } else {
            self.selector.select(self.directory.as_ref()).await?
        };

        self.pending = None;
        self.set_candidates(candidates);
        Ok(())
    }

    fn set_candidates(&mut self, candidates: Vec<Instrument>) {
        self.sink.emit(&CycleEvent::CandidatesUpdated {
            instruments: candidates.clone(),
        });
        self.candidates = candidates;
    }

    fn report(&self, instrument: Option<&Instrument>, err: &TradeError) {
        if err.category() == ErrorCategory::Unexpected {
            error!(instrument = ?instrument.map(Instrument::as_str), "{}", err);
        }
        self.sink.emit(&CycleEvent::Diagnostic {
            category: err.category(),
            instrument: instrument.cloned(),
            message: err.to_string(),
        });
    }
}

/// Sleep, or just yield to the runtime when there is nothing to wait for
async fn pause(delay: Duration) {
    if delay.is_zero() {
        tokio::task::yield_now().await;
    } else {
        tokio::time::sleep(delay).await;
    }
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        return (*msg).to_string();
    }
    if let Some(msg) = payload.downcast_ref::<String>() {
        return msg.clone();
    }
    "unknown panic payload".to_string()
}

