//! View models: pure functions from store state to what the UI draws.

mod dashboard;
mod history;

pub use dashboard::*;
pub use history::*;

/// Format a numeric reading the way the UI prints it (`72`, `98.6`).
pub(crate) fn format_reading(value: f64) -> String {
    format!("{}", value)
}
