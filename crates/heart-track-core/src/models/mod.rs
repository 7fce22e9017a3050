//! Domain models for the heart-track system.

mod latest;
mod local;
mod remote;

pub use latest::*;
pub use local::*;
pub use remote::*;
