//! Heart-rate alerts and summary statistics over the local history.

mod alerts;
mod stats;

pub use alerts::*;
pub use stats::*;
