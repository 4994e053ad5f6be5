//! Strategy engine module
//!
//! Strategy trait, decisions, per-instrument memory and the two strategy
//! variants.

pub mod base;
pub mod implementations;
pub mod memory;
pub mod signal;

pub use base::*;
pub use implementations::*;
pub use memory::*;
pub use signal::*;
