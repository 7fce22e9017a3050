//! Local cache layer: a key-value storage seam and the vitals snapshot store.

mod local;
mod storage;

pub use local::*;
pub use storage::*;

use thiserror::Error;

/// Cache errors.
#[derive(Error, Debug)]
pub enum CacheError {
    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Storage lock poisoned")]
    Poisoned,
}

pub type CacheResult<T> = Result<T, CacheError>;

/// String key-value storage shared by everything running under one origin.
///
/// Concurrent writers are not coordinated: the last `set` wins.
pub trait KeyValueStorage: Send + Sync {
    /// Read the value under `key`, `None` if nothing is stored.
    fn get(&self, key: &str) -> CacheResult<Option<String>>;

    /// Overwrite the value under `key`.
    fn set(&self, key: &str, value: &str) -> CacheResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn remove(&self, key: &str) -> CacheResult<()>;
}
