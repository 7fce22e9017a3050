//! Remote vitals store: append-only document writes and a live "latest" query.
//!
//! ```text
//! RemoteVitalsForm ──append──▶ RemoteVitalsStore ──insert──▶ VitalsCollection
//!                                      │                    (assigns id + server time)
//!                                      │ notify
//!                                      ▼
//!                           Subscription callbacks ──▶ RemoteDashboard
//! ```

mod collection;
mod store;
mod subscription;

pub use collection::*;
pub use store::*;
pub use subscription::*;

use thiserror::Error;

use crate::db::DbError;

/// Remote store errors.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("Database error: {0}")]
    Database(#[from] DbError),

    #[error("Remote store unavailable: {0}")]
    Unavailable(String),

    #[error("Invalid remote configuration: {0}")]
    InvalidConfig(String),

    #[error("Remote store lock poisoned")]
    Poisoned,
}

impl<T> From<std::sync::PoisonError<T>> for RemoteError {
    fn from(_: std::sync::PoisonError<T>) -> Self {
        RemoteError::Poisoned
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Failure of an `append`. The write may be retried.
#[derive(Error, Debug)]
#[error("Failed to save vitals: {0}")]
pub struct RemoteWriteError(#[from] pub RemoteError);
