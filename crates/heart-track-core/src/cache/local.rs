//! Full-snapshot cache of the local vitals history.

use std::sync::Arc;

use tracing::{debug, warn};

use super::{CacheResult, KeyValueStorage};
use crate::models::LocalVitalsRecord;

/// Well-known key holding the JSON array of records.
pub const CACHE_KEY: &str = "vitals";

/// Local Cache Store over a `KeyValueStorage`.
///
/// The stored value is always the complete list; every save overwrites it.
#[derive(Clone)]
pub struct LocalCacheStore {
    storage: Arc<dyn KeyValueStorage>,
    key: String,
}

impl LocalCacheStore {
    /// Create a store using the default key.
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self::with_key(storage, CACHE_KEY)
    }

    /// Create a store under a custom key.
    pub fn with_key(storage: Arc<dyn KeyValueStorage>, key: impl Into<String>) -> Self {
        Self {
            storage,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load the persisted list.
    ///
    /// Missing, unreadable or corrupt data all load as an empty history.
    pub fn load(&self) -> Vec<LocalVitalsRecord> {
        let raw = match self.storage.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(key = %self.key, error = %e, "vitals cache unreadable, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<LocalVitalsRecord>>(&raw) {
            Ok(records) => {
                debug!(key = %self.key, count = records.len(), "loaded vitals cache");
                records
            }
            Err(e) => {
                warn!(key = %self.key, error = %e, "vitals cache corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Overwrite the persisted list with `records`.
    pub fn save(&self, records: &[LocalVitalsRecord]) -> CacheResult<()> {
        let json = serde_json::to_string(records)?;
        self.storage.set(&self.key, &json)?;
        debug!(key = %self.key, count = records.len(), "saved vitals cache");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryStorage;

    fn setup() -> (Arc<MemoryStorage>, LocalCacheStore) {
        let storage = Arc::new(MemoryStorage::new());
        let cache = LocalCacheStore::new(storage.clone());
        (storage, cache)
    }

    #[test]
    fn test_load_empty() {
        let (_, cache) = setup();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_save_and_load() {
        let (_, cache) = setup();

        let first = LocalVitalsRecord::new(72.0, "120/80".into(), None, None);
        let second = LocalVitalsRecord::new(75.0, "122/81".into(), None, Some(first.id));
        let records = vec![second, first];

        cache.save(&records).unwrap();
        assert_eq!(cache.load(), records);
    }

    #[test]
    fn test_full_precision_readings_round_trip() {
        let (_, cache) = setup();

        let mut records = Vec::new();
        for heart_rate in [
            90.79177763656489,
            112.09627478432391,
            90.09770634450977,
            152.22639076063695,
        ] {
            let previous = records.first().map(|r: &LocalVitalsRecord| r.id);
            records.insert(0, LocalVitalsRecord::new(heart_rate, "120/80".into(), None, previous));
        }

        cache.save(&records).unwrap();
        let loaded = cache.load();
        for (saved, loaded) in records.iter().zip(&loaded) {
            assert_eq!(saved.heart_rate.to_bits(), loaded.heart_rate.to_bits());
        }
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_corrupt_data_loads_empty() {
        let (storage, cache) = setup();

        storage.set(CACHE_KEY, "{not json").unwrap();
        assert!(cache.load().is_empty());

        // Valid JSON, wrong shape
        storage.set(CACHE_KEY, r#"{"heartRate":72}"#).unwrap();
        assert!(cache.load().is_empty());
    }

    #[test]
    fn test_save_overwrites_snapshot() {
        let (storage, cache) = setup();

        let record = LocalVitalsRecord::new(72.0, "120/80".into(), None, None);
        cache.save(&[record.clone(), record.clone()]).unwrap();
        cache.save(&[record]).unwrap();

        assert_eq!(cache.load().len(), 1);
        let raw = storage.get(CACHE_KEY).unwrap().unwrap();
        assert!(raw.starts_with('['));
    }
}
