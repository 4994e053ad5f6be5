//! Per-instrument strategy memory

/// Values remembered from the previous evaluation of one instrument
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StrategyMemory {
    /// RSI seen on the previous evaluation; `None` until the first one
    pub previous_rsi: Option<f64>,
}
