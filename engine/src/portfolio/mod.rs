//! Portfolio management module
//!
//! Open positions, the per-instrument ledger and risk bound derivation.

pub mod ledger;
pub mod position;
pub mod risk;

pub use ledger::*;
pub use position::*;
pub use risk::*;
