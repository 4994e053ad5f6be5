//! Configuration module

pub mod cycle;
pub mod risk;
pub mod strategy;

pub use cycle::*;
pub use risk::*;
pub use strategy::*;

use serde::{Deserialize, Serialize};

use crate::indicators::IndicatorParams;

/// Complete engine configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub strategy: StrategyKind,
    pub cycle: CycleConfig,
    pub selector: SelectorConfig,
    pub indicators: IndicatorParams,
    pub risk: RiskConfig,
    pub macd: MacdStrategyConfig,
    pub rsi: RsiStrategyConfig,
}
