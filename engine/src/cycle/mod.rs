//! Trading cycle
//!
//! The controller that drives strategy evaluation and order execution, and
//! the events it reports.

pub mod controller;
pub mod events;

pub use controller::*;
pub use events::*;
