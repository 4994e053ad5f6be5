//! Cycle events and sinks

use std::sync::Mutex;

use tracing::{info, warn};

use crate::data::Instrument;
use crate::error::ErrorCategory;
use crate::indicators::IndicatorSnapshot;
use crate::strategy::{DecisionKind, ExitReason};

/// Tracing target of no-trade decision lines
pub const IDLE_TARGET: &str = "trade_engine::idle";

/// Indicator values reported with a decision
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct IndicatorReadout {
    pub trend_average: Option<f64>,
    pub macd: Option<f64>,
    pub signal: Option<f64>,
    pub rsi: Option<f64>,
}

impl IndicatorReadout {
    pub fn from_snapshot(snapshot: &IndicatorSnapshot) -> Self {
        let macd = snapshot.macd().ok();
        Self {
            trend_average: snapshot.trend_average().ok(),
            macd: macd.map(|p| p.macd),
            signal: macd.map(|p| p.signal),
            rsi: snapshot.rsi().ok(),
        }
    }
}

/// Something the trading cycle reports
#[derive(Debug, Clone, PartialEq)]
pub enum CycleEvent {
    /// Strategy outcome for one instrument
    Decision {
        instrument: Instrument,
        kind: DecisionKind,
        price: f64,
        indicators: IndicatorReadout,
        reason: Option<String>,
    },
    /// Entry order filled and recorded
    Entered {
        instrument: Instrument,
        order_id: String,
        quote_amount: f64,
        entry_price: f64,
        stop_loss: f64,
        take_profit: f64,
    },
    /// Exit order filled and the position closed
    Exited {
        instrument: Instrument,
        order_id: String,
        reason: ExitReason,
        exit_price: f64,
        realized_pct: f64,
    },
    /// A failure that did not stop the cycle
    Diagnostic {
        category: ErrorCategory,
        instrument: Option<Instrument>,
        message: String,
    },
    /// The working instrument set changed
    CandidatesUpdated { instruments: Vec<Instrument> },
    /// A whole pass failed and will be retried
    PassFailed { message: String },
}

/// Receives cycle events
pub trait EventSink: Send + Sync {
    fn emit(&self, event: &CycleEvent);
}

/// Renders every event as one tracing line
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.4}", v))
}

impl EventSink for TracingSink {
    fn emit(&self, event: &CycleEvent) {
        match event {
            CycleEvent::Decision {
                instrument,
                kind: DecisionKind::Hold,
                price,
                indicators,
                reason,
            } => {
                info!(
                    target: IDLE_TARGET,
                    instrument = %instrument,
                    decision = "NONE",
                    price,
                    trend = %fmt_opt(indicators.trend_average),
                    macd = %fmt_opt(indicators.macd),
                    signal = %fmt_opt(indicators.signal),
                    rsi = %fmt_opt(indicators.rsi),
                    reason = reason.as_deref().unwrap_or(""),
                    "decision"
                );
            }
            CycleEvent::Decision {
                instrument,
                kind,
                price,
                indicators,
                reason,
            } => {
                info!(
                    instrument = %instrument,
                    decision = %kind,
                    price,
                    trend = %fmt_opt(indicators.trend_average),
                    macd = %fmt_opt(indicators.macd),
                    signal = %fmt_opt(indicators.signal),
                    rsi = %fmt_opt(indicators.rsi),
                    reason = reason.as_deref().unwrap_or(""),
                    "decision"
                );
            }
            CycleEvent::Entered {
                instrument,
                order_id,
                quote_amount,
                entry_price,
                stop_loss,
                take_profit,
            } => {
                info!(
                    instrument = %instrument,
                    order_id = %order_id,
                    amount = quote_amount,
                    entry = entry_price,
                    stop_loss,
                    take_profit,
                    "position opened"
                );
            }
            CycleEvent::Exited {
                instrument,
                order_id,
                reason,
                exit_price,
                realized_pct,
            } => {
                info!(
                    instrument = %instrument,
                    order_id = %order_id,
                    reason = %reason,
                    exit = exit_price,
                    "position closed, realized {:+.2}%",
                    realized_pct
                );
            }
            CycleEvent::Diagnostic {
                category,
                instrument,
                message,
            } => match instrument {
                Some(instrument) => {
                    warn!(category = %category, instrument = %instrument, "{}", message)
                }
                None => warn!(category = %category, "{}", message),
            },
            CycleEvent::CandidatesUpdated { instruments } => {
                let codes: Vec<&str> = instruments.iter().map(Instrument::as_str).collect();
                info!(count = instruments.len(), "candidates: {}", codes.join(", "));
            }
            CycleEvent::PassFailed { message } => {
                warn!(category = "pass", "pass failed: {}", message);
            }
        }
    }
}

/// Keeps every event in memory
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<CycleEvent>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything emitted so far
    pub fn events(&self) -> Vec<CycleEvent> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl EventSink for RecordingSink {
    fn emit(&self, event: &CycleEvent) {
        if let Ok(mut events) = self.events.lock() {
            events.push(event.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::MACDPoint;

    #[test]
    fn test_readout_from_snapshot() {
        let point = MACDPoint {
            macd: -1.0,
            signal: -0.5,
            histogram: -0.5,
            prev_macd: -1.2,
            prev_signal: -0.4,
        };
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(95.0), Some(point), None);
        let readout = IndicatorReadout::from_snapshot(&snapshot);
        assert_eq!(readout.trend_average, Some(95.0));
        assert_eq!(readout.macd, Some(-1.0));
        assert_eq!(readout.signal, Some(-0.5));
        assert_eq!(readout.rsi, None);
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let sink = RecordingSink::new();
        sink.emit(&CycleEvent::PassFailed {
            message: "first".to_string(),
        });
        sink.emit(&CycleEvent::CandidatesUpdated {
            instruments: Vec::new(),
        });
        let events = sink.events();
        assert_eq!(events.len(), 2);
        assert!(matches!(events[0], CycleEvent::PassFailed { .. }));
    }
}
