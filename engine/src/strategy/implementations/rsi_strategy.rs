//! RSI Strategy implementation

use std::time::Duration;

use tracing::{debug, info};

use crate::config::{RiskConfig, RsiStrategyConfig};
use crate::error::IndicatorError;
use crate::portfolio::{Position, RiskManager};
use crate::strategy::{
    CandidatePolicy, DataRequirements, Decision, ExitReason, MarketContext, Strategy,
    StrategyMemory,
};

/// Dual-threshold RSI mean reversion
///
/// Enters when RSI climbs back above the oversold level and exits when it
/// drops back below the overbought level. Each instrument remembers the RSI
/// of its previous evaluation; the first evaluation only records it.
pub struct RSIStrategy {
    config: RsiStrategyConfig,
    risk: RiskManager,
}

impl RSIStrategy {
    /// Create new RSI strategy
    pub fn new(config: RsiStrategyConfig, risk: RiskConfig) -> Self {
        Self {
            config,
            risk: RiskManager::new(risk),
        }
    }

    pub fn config(&self) -> &RsiStrategyConfig {
        &self.config
    }

    /// Half the balance, but never less than the investment floor
    fn investment(&self, quote_balance: f64) -> f64 {
        (quote_balance / 2.0).max(self.config.investment_floor)
    }
}

impl Strategy for RSIStrategy {
    fn name(&self) -> &str {
        "RSI Strategy"
    }

    fn requirements(&self) -> DataRequirements {
        DataRequirements {
            interval: self.config.interval,
            candle_count: self.config.candle_count,
            recent_low: None,
        }
    }

    fn candidate_policy(&self) -> CandidatePolicy {
        CandidatePolicy::Fixed(self.config.instruments.clone())
    }

    fn debounce(&self, memory: &StrategyMemory, position: Option<&Position>) -> Option<Duration> {
        let previous = memory.previous_rsi?;
        let near_threshold = match position {
            Some(_) => previous >= self.config.overbought,
            None => previous <= self.config.oversold,
        };
        let delay = self.config.debounce();
        (near_threshold && !delay.is_zero()).then_some(delay)
    }

    fn evaluate(
        &self,
        ctx: &MarketContext<'_>,
        memory: &mut StrategyMemory,
        position: Option<&Position>,
    ) -> Result<Decision, IndicatorError> {
        let current = ctx.snapshot.rsi()?;
        let Some(previous) = memory.previous_rsi.replace(current) else {
            debug!("{} first RSI reading: {:.2}", ctx.instrument, current);
            return Ok(Decision::hold(format!("first RSI reading {:.2}", current)));
        };

        debug!(
            "{} RSI: {:.2} -> {:.2}, Price: {:.2}",
            ctx.instrument, previous, current, ctx.price
        );

        if position.is_some() {
            if previous >= self.config.overbought && current < self.config.overbought {
                info!(
                    "{} SELL signal: RSI fell below {:.0} ({:.2} -> {:.2})",
                    ctx.instrument, self.config.overbought, previous, current
                );
                return Ok(Decision::Exit(ExitReason::RsiReversal));
            }
            return Ok(Decision::hold(format!(
                "holding: RSI {:.2} -> {:.2}",
                previous, current
            )));
        }

        if previous > self.config.oversold || current <= self.config.oversold {
            return Ok(Decision::hold(format!(
                "no oversold recovery: RSI {:.2} -> {:.2}",
                previous, current
            )));
        }
        if ctx.quote_balance < self.config.investment_floor {
            return Ok(Decision::hold(format!(
                "balance {:.0} below investment floor {:.0}",
                ctx.quote_balance, self.config.investment_floor
            )));
        }

        let bounds = self.risk.banded(ctx.price);
        if !bounds.brackets(ctx.price) {
            return Ok(Decision::hold(format!(
                "protective band {:.2}..{:.2} does not bracket price {:.2}",
                bounds.stop_loss, bounds.take_profit, ctx.price
            )));
        }

        let amount = self.investment(ctx.quote_balance);
        info!(
            "{} BUY signal: RSI rose above {:.0} ({:.2} -> {:.2}), amount={:.0}",
            ctx.instrument, self.config.oversold, previous, current, amount
        );
        Ok(Decision::enter(amount, ctx.price, bounds))
    }
}
