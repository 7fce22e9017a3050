//! Store capability traits.
//!
//! The form and the views only see these traits, so either backend can sit
//! behind them. The local tracker stores snapshots, the remote dashboard
//! subscribes to the latest document.

use crate::cache::{CacheError, LocalCacheStore};
use crate::models::{LocalVitalsInput, LocalVitalsRecord, RemoteVitalsDocument, RemoteVitalsInput};
use crate::remote::{RemoteError, RemoteVitalsStore, RemoteWriteError, Subscription};

/// Anything a vitals record can be appended to.
pub trait VitalsStore {
    /// Values captured by the form
    type Input: Clone;
    /// What the store holds once written
    type Record: Clone;
    type Error: std::error::Error;

    /// Persist a new record built from `input`.
    fn append(&self, input: &Self::Input) -> Result<Self::Record, Self::Error>;
}

/// A store persisted as full snapshots.
pub trait SnapshotStore: VitalsStore {
    /// Read the stored list. Never fails; unusable data reads as empty.
    fn load(&self) -> Vec<Self::Record>;

    /// Overwrite the stored list.
    fn save(&self, records: &[Self::Record]) -> Result<(), Self::Error>;
}

/// A store pushing its most recent record to subscribers.
pub trait LiveStore: VitalsStore {
    type SubscribeError: std::error::Error;

    fn subscribe_latest<F>(&self, callback: F) -> Result<Subscription, Self::SubscribeError>
    where
        F: Fn(&Self::Record) + Send + Sync + 'static;
}

impl VitalsStore for LocalCacheStore {
    type Input = LocalVitalsInput;
    type Record = LocalVitalsRecord;
    type Error = CacheError;

    /// Load, prepend, save. Newest records come first.
    fn append(&self, input: &LocalVitalsInput) -> Result<LocalVitalsRecord, CacheError> {
        let mut records = LocalCacheStore::load(self);
        let record = input.clone().into_record(records.first().map(|r| r.id));
        records.insert(0, record.clone());
        LocalCacheStore::save(self, &records)?;
        Ok(record)
    }
}

impl SnapshotStore for LocalCacheStore {
    fn load(&self) -> Vec<LocalVitalsRecord> {
        LocalCacheStore::load(self)
    }

    fn save(&self, records: &[LocalVitalsRecord]) -> Result<(), CacheError> {
        LocalCacheStore::save(self, records)
    }
}

impl VitalsStore for RemoteVitalsStore {
    type Input = RemoteVitalsInput;
    type Record = RemoteVitalsDocument;
    type Error = RemoteWriteError;

    fn append(&self, input: &RemoteVitalsInput) -> Result<RemoteVitalsDocument, RemoteWriteError> {
        RemoteVitalsStore::append(self, input)
    }
}

impl LiveStore for RemoteVitalsStore {
    type SubscribeError = RemoteError;

    fn subscribe_latest<F>(&self, callback: F) -> Result<Subscription, RemoteError>
    where
        F: Fn(&RemoteVitalsDocument) + Send + Sync + 'static,
    {
        RemoteVitalsStore::subscribe_latest(self, callback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStorage;
    use std::sync::Arc;

    #[test]
    fn test_local_append_prepends() {
        let cache = LocalCacheStore::new(Arc::new(MemoryStorage::new()));

        let first = VitalsStore::append(
            &cache,
            &LocalVitalsInput {
                heart_rate: 72.0,
                blood_pressure: "120/80".into(),
                notes: None,
            },
        )
        .unwrap();
        let second = VitalsStore::append(
            &cache,
            &LocalVitalsInput {
                heart_rate: 75.0,
                blood_pressure: "121/80".into(),
                notes: Some("after coffee".into()),
            },
        )
        .unwrap();

        assert!(second.id > first.id);
        assert_eq!(SnapshotStore::load(&cache), vec![second, first]);
    }
}
