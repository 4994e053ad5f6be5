//! MACD Strategy implementation

use std::time::Duration;

use tracing::{debug, info};

use crate::config::{MacdStrategyConfig, RiskConfig};
use crate::error::IndicatorError;
use crate::portfolio::{Position, RiskManager};
use crate::strategy::{
    CandidatePolicy, DataRequirements, Decision, ExitReason, MarketContext, RecentLowWindow,
    Strategy, StrategyMemory,
};

/// Trend-filtered MACD crossover strategy
///
/// Enters when MACD crosses above its signal line while both are below zero
/// and the price trades above the trend average. Exits on the stop-loss or
/// take-profit recorded at entry.
pub struct MACDStrategy {
    config: MacdStrategyConfig,
    risk: RiskManager,
}

impl MACDStrategy {
    /// Create new MACD strategy
    pub fn new(config: MacdStrategyConfig, risk: RiskConfig) -> Self {
        Self {
            config,
            risk: RiskManager::new(risk),
        }
    }

    pub fn config(&self) -> &MacdStrategyConfig {
        &self.config
    }

    fn check_exit(&self, ctx: &MarketContext<'_>, position: &Position) -> Decision {
        if position.is_take_profit_hit(ctx.price) {
            info!(
                "{} take-profit reached: price={:.2}, target={:.2}",
                ctx.instrument, ctx.price, position.take_profit
            );
            return Decision::Exit(ExitReason::TakeProfit);
        }
        if position.is_stop_loss_hit(ctx.price) {
            info!(
                "{} stop-loss reached: price={:.2}, stop={:.2}",
                ctx.instrument, ctx.price, position.stop_loss
            );
            return Decision::Exit(ExitReason::StopLoss);
        }
        Decision::hold(format!(
            "holding: {:.2} between stop {:.2} and target {:.2}",
            ctx.price, position.stop_loss, position.take_profit
        ))
    }

    fn check_entry(&self, ctx: &MarketContext<'_>) -> Result<Decision, IndicatorError> {
        let macd = ctx.snapshot.macd()?;
        let trend = ctx.snapshot.trend_average()?;

        debug!(
            "{} MACD: {:.4}, Signal: {:.4}, Trend: {:.2}, Price: {:.2}",
            ctx.instrument, macd.macd, macd.signal, trend, ctx.price
        );

        if !macd.crossed_above() {
            return Ok(Decision::hold(format!(
                "no bullish crossover: macd={:.4}, signal={:.4}",
                macd.macd, macd.signal
            )));
        }
        if macd.macd >= 0.0 || macd.signal >= 0.0 {
            return Ok(Decision::hold(format!(
                "crossover above zero: macd={:.4}, signal={:.4}",
                macd.macd, macd.signal
            )));
        }
        if ctx.price <= trend {
            return Ok(Decision::hold(format!(
                "price {:.2} not above trend average {:.2}",
                ctx.price, trend
            )));
        }

        let recent_low = ctx.recent_low.ok_or(IndicatorError::InsufficientData {
            indicator: "recent low",
            required: self.config.recent_low_bars,
            available: 0,
        })?;
        let bounds = self.risk.trend_bounded(ctx.price, trend, recent_low);
        if !bounds.brackets(ctx.price) {
            return Ok(Decision::hold(format!(
                "stop-loss {:.2} not below entry {:.2}",
                bounds.stop_loss, ctx.price
            )));
        }

        let amount = ctx.quote_balance * self.config.balance_fraction;
        if !self.risk.meets_minimum(amount) {
            return Ok(Decision::hold(format!(
                "order amount {:.0} below minimum {:.0}",
                amount,
                self.risk.config().min_order_amount
            )));
        }

        info!(
            "{} BUY signal: price={:.2}, amount={:.0}, stop={:.2} ({:?}), target={:.2}",
            ctx.instrument, ctx.price, amount, bounds.stop_loss, bounds.stop_source, bounds.take_profit
        );
        Ok(Decision::enter(amount, ctx.price, bounds))
    }
}

impl Strategy for MACDStrategy {
    fn name(&self) -> &str {
        "MACD Strategy"
    }

    fn requirements(&self) -> DataRequirements {
        DataRequirements {
            interval: self.config.interval,
            candle_count: self.config.candle_count,
            recent_low: Some(RecentLowWindow {
                interval: self.config.recent_low_interval,
                bars: self.config.recent_low_bars,
            }),
        }
    }

    fn candidate_policy(&self) -> CandidatePolicy {
        CandidatePolicy::Rotating
    }

    fn entry_cooldown(&self) -> Option<Duration> {
        let cooldown = self.config.entry_cooldown();
        (!cooldown.is_zero()).then_some(cooldown)
    }

    fn evaluate(
        &self,
        ctx: &MarketContext<'_>,
        _memory: &mut StrategyMemory,
        position: Option<&Position>,
    ) -> Result<Decision, IndicatorError> {
        match position {
            Some(position) => Ok(self.check_exit(ctx, position)),
            None => self.check_entry(ctx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Instrument;
    use crate::indicators::{IndicatorSnapshot, MACDPoint};
    use chrono::Utc;

    fn crossing_below_zero() -> MACDPoint {
        MACDPoint {
            macd: -0.5,
            signal: -0.8,
            histogram: 0.3,
            prev_macd: -1.0,
            prev_signal: -0.9,
        }
    }

    fn strategy() -> MACDStrategy {
        MACDStrategy::new(MacdStrategyConfig::default(), RiskConfig::default())
    }

    fn evaluate(
        snapshot: &IndicatorSnapshot,
        price: f64,
        balance: f64,
        recent_low: Option<f64>,
        position: Option<&Position>,
    ) -> Result<Decision, IndicatorError> {
        let instrument = Instrument::new("KRW-BTC").unwrap();
        let ctx = MarketContext {
            instrument: &instrument,
            price,
            snapshot,
            quote_balance: balance,
            holdings: 0.0,
            recent_low,
        };
        strategy().evaluate(&ctx, &mut StrategyMemory::default(), position)
    }

    fn position(stop_loss: f64, take_profit: f64) -> Position {
        Position {
            instrument: Instrument::new("KRW-BTC").unwrap(),
            entry_price: 100.0,
            entry_cost: 9_900.0,
            stop_loss,
            take_profit,
            opened_at: Utc::now(),
        }
    }

    #[test]
    fn test_entry_with_recent_low_stop() {
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(70.0), Some(crossing_below_zero()), None);
        let decision = evaluate(&snapshot, 100.0, 1_000_000.0, Some(80.0), None).unwrap();
        match decision {
            Decision::Enter(order) => {
                assert_eq!(order.stop_loss, 80.0);
                assert_eq!(order.take_profit, 140.0);
                assert_eq!(order.quote_amount, 990_000.0);
                assert_eq!(order.entry_price, 100.0);
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[test]
    fn test_entry_with_trend_stop() {
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(95.0), Some(crossing_below_zero()), None);
        let decision = evaluate(&snapshot, 100.0, 1_000_000.0, Some(90.0), None).unwrap();
        match decision {
            Decision::Enter(order) => {
                assert_eq!(order.stop_loss, 95.0);
                assert_eq!(order.take_profit, 107.5);
            }
            other => panic!("expected entry, got {:?}", other),
        }
    }

    #[test]
    fn test_no_entry_when_crossover_above_zero() {
        let point = MACDPoint {
            macd: 0.5,
            signal: 0.2,
            histogram: 0.3,
            prev_macd: 0.1,
            prev_signal: 0.15,
        };
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(90.0), Some(point), None);
        let decision = evaluate(&snapshot, 100.0, 1_000_000.0, Some(95.0), None).unwrap();
        assert!(matches!(decision, Decision::Hold { .. }));
    }

    #[test]
    fn test_no_entry_without_crossover() {
        let point = MACDPoint {
            macd: -0.5,
            signal: -0.8,
            histogram: 0.3,
            prev_macd: -0.6,
            prev_signal: -0.9,
        };
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(90.0), Some(point), None);
        let decision = evaluate(&snapshot, 100.0, 1_000_000.0, Some(95.0), None).unwrap();
        assert!(matches!(decision, Decision::Hold { .. }));
    }

    #[test]
    fn test_no_entry_below_trend() {
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(100.0), Some(crossing_below_zero()), None);
        let decision = evaluate(&snapshot, 100.0, 1_000_000.0, Some(95.0), None).unwrap();
        assert!(matches!(decision, Decision::Hold { .. }));
    }

    #[test]
    fn test_no_entry_when_stop_not_below_price() {
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(90.0), Some(crossing_below_zero()), None);
        let decision = evaluate(&snapshot, 100.0, 1_000_000.0, Some(101.0), None).unwrap();
        assert!(matches!(decision, Decision::Hold { .. }));
    }

    #[test]
    fn test_no_entry_below_minimum_order() {
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(90.0), Some(crossing_below_zero()), None);
        let decision = evaluate(&snapshot, 100.0, 4_000.0, Some(95.0), None).unwrap();
        match decision {
            Decision::Hold { reason } => assert!(reason.contains("minimum")),
            other => panic!("expected hold, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_indicator_is_an_error() {
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(90.0), None, None);
        let err = evaluate(&snapshot, 100.0, 1_000_000.0, Some(95.0), None).unwrap_err();
        assert!(matches!(err, IndicatorError::InsufficientData { indicator: "MACD", .. }));
    }

    #[test]
    fn test_exit_on_take_profit_and_stop_loss() {
        let snapshot = IndicatorSnapshot::from_values(100.0, None, None, None);
        let held = position(95.0, 110.0);

        let at_target = evaluate(&snapshot, 110.0, 0.0, None, Some(&held)).unwrap();
        assert_eq!(at_target, Decision::Exit(ExitReason::TakeProfit));

        let below_stop = evaluate(&snapshot, 94.9, 0.0, None, Some(&held)).unwrap();
        assert_eq!(below_stop, Decision::Exit(ExitReason::StopLoss));

        let at_stop = evaluate(&snapshot, 95.0, 0.0, None, Some(&held)).unwrap();
        assert!(matches!(at_stop, Decision::Hold { .. }));
    }

    #[test]
    fn test_no_entry_while_position_open() {
        let snapshot = IndicatorSnapshot::from_values(100.0, Some(90.0), Some(crossing_below_zero()), None);
        let held = position(95.0, 110.0);
        let decision = evaluate(&snapshot, 100.0, 1_000_000.0, Some(95.0), Some(&held)).unwrap();
        assert!(matches!(decision, Decision::Hold { .. }));
    }
}
