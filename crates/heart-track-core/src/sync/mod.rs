//! Composition roots tying forms, stores and views together.
//!
//! - [`LocalTracker`]: cache loaded on mount, written through on every change.
//! - [`RemoteDashboard`]: live latest-reading subscription held from mount to unmount.

mod local_tracker;
mod remote_dashboard;

pub use local_tracker::*;
pub use remote_dashboard::*;
