//! Local-only tracker: in-memory history kept identical to the cache.

use tracing::{info, warn};

use crate::analytics::{AlertLevel, AlertThresholds, SummaryStats};
use crate::cache::LocalCacheStore;
use crate::export::HistoryExport;
use crate::form::{LocalVitalsForm, SubmitOutcome};
use crate::models::{LocalVitalsInput, LocalVitalsRecord};
use crate::store::SnapshotStore;
use crate::views::{HistoryTable, TrendChart};

/// Result of submitting the local form.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalSubmission {
    pub outcome: SubmitOutcome<LocalVitalsInput>,
    /// The stored record, when the submission was saved
    pub record: Option<LocalVitalsRecord>,
    /// Alert level of the stored record
    pub alert: Option<AlertLevel>,
    /// Warning text for an out-of-range reading
    pub alert_message: Option<String>,
}

/// Local tracker over a snapshot store.
pub struct LocalTracker<S = LocalCacheStore>
where
    S: SnapshotStore<Input = LocalVitalsInput, Record = LocalVitalsRecord>,
{
    store: S,
    records: Vec<LocalVitalsRecord>,
    thresholds: AlertThresholds,
}

impl<S> LocalTracker<S>
where
    S: SnapshotStore<Input = LocalVitalsInput, Record = LocalVitalsRecord>,
{
    /// Load the cached history and start tracking.
    pub fn mount(store: S, thresholds: AlertThresholds) -> Self {
        let records = store.load();
        info!(count = records.len(), "local tracker mounted");
        Self {
            store,
            records,
            thresholds,
        }
    }

    /// History, newest first.
    pub fn records(&self) -> &[LocalVitalsRecord] {
        &self.records
    }

    pub fn thresholds(&self) -> &AlertThresholds {
        &self.thresholds
    }

    /// Prepend a record and write the full list through to the store.
    ///
    /// On a failed write the record is dropped again so memory and store agree.
    pub fn add(&mut self, input: &LocalVitalsInput) -> Result<LocalVitalsRecord, S::Error> {
        let record = input
            .clone()
            .into_record(self.records.first().map(|r| r.id));
        self.records.insert(0, record.clone());

        if let Err(e) = self.store.save(&self.records) {
            warn!(error = %e, "failed to persist vitals, rolling back");
            self.records.remove(0);
            return Err(e);
        }
        Ok(record)
    }

    /// Submit the form into this tracker.
    pub fn submit(&mut self, form: &mut LocalVitalsForm) -> LocalSubmission {
        let input = match form.begin_submit() {
            Ok(input) => input,
            Err(outcome) => {
                return LocalSubmission {
                    outcome,
                    record: None,
                    alert: None,
                    alert_message: None,
                }
            }
        };

        let result = self.add(&input);
        let record = result.as_ref().ok().cloned();
        let outcome = form.finish_submit(input, result);

        let alert = record
            .as_ref()
            .map(|r| self.thresholds.classify(r.heart_rate));
        let alert_message = record
            .as_ref()
            .and_then(|r| self.thresholds.message(r.heart_rate));

        LocalSubmission {
            outcome,
            record,
            alert,
            alert_message,
        }
    }

    pub fn history_table(&self) -> HistoryTable {
        HistoryTable::from_records(&self.records)
    }

    pub fn trend_chart(&self) -> TrendChart {
        TrendChart::from_records(&self.records)
    }

    pub fn stats(&self) -> Option<SummaryStats> {
        SummaryStats::from_records(&self.records)
    }

    /// Records outside the alert thresholds, newest first.
    pub fn alerts(&self) -> Vec<&LocalVitalsRecord> {
        self.thresholds.recent_alerts(&self.records)
    }

    pub fn export(&self) -> HistoryExport {
        HistoryExport::new(&self.records)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::{CacheError, CacheResult, KeyValueStorage, MemoryStorage};
    use crate::form::LocalVitalsFields;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;

    /// Storage whose writes can be switched off.
    #[derive(Default)]
    struct FlakyStorage {
        inner: MemoryStorage,
        fail_writes: AtomicBool,
    }

    impl KeyValueStorage for FlakyStorage {
        fn get(&self, key: &str) -> CacheResult<Option<String>> {
            self.inner.get(key)
        }

        fn set(&self, key: &str, value: &str) -> CacheResult<()> {
            if self.fail_writes.load(Ordering::SeqCst) {
                return Err(CacheError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    "quota exceeded",
                )));
            }
            self.inner.set(key, value)
        }

        fn remove(&self, key: &str) -> CacheResult<()> {
            self.inner.remove(key)
        }
    }

    fn form(heart_rate: &str, blood_pressure: &str) -> LocalVitalsForm {
        LocalVitalsForm::with_fields(LocalVitalsFields {
            heart_rate: heart_rate.into(),
            blood_pressure: blood_pressure.into(),
            notes: String::new(),
        })
    }

    #[test]
    fn test_submit_writes_through() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = LocalCacheStore::new(storage.clone());
        let mut tracker = LocalTracker::mount(cache.clone(), AlertThresholds::default());

        let submission = tracker.submit(&mut form("72", "120/80"));
        assert!(matches!(submission.outcome, SubmitOutcome::Saved(_)));
        assert_eq!(submission.alert, Some(AlertLevel::Normal));
        assert_eq!(cache.load(), tracker.records());
    }

    #[test]
    fn test_mount_loads_existing_history() {
        let storage = Arc::new(MemoryStorage::new());
        let cache = LocalCacheStore::new(storage.clone());
        {
            let mut tracker = LocalTracker::mount(cache.clone(), AlertThresholds::default());
            tracker.submit(&mut form("72", "120/80"));
            tracker.submit(&mut form("130", "140/90"));
        }

        let tracker = LocalTracker::mount(cache, AlertThresholds::default());
        assert_eq!(tracker.records().len(), 2);
        assert_eq!(tracker.records()[0].heart_rate, 130.0);
        assert_eq!(tracker.alerts().len(), 1);
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let storage = Arc::new(FlakyStorage::default());
        let cache = LocalCacheStore::new(storage.clone());
        let mut tracker = LocalTracker::mount(cache.clone(), AlertThresholds::default());
        tracker.submit(&mut form("72", "120/80"));

        storage.fail_writes.store(true, Ordering::SeqCst);
        let mut failing = form("75", "121/80");
        let submission = tracker.submit(&mut failing);

        assert!(matches!(submission.outcome, SubmitOutcome::Failed(_)));
        assert!(submission.record.is_none());
        assert_eq!(tracker.records().len(), 1);
        assert_eq!(cache.load(), tracker.records());
        // Inputs kept for retry
        assert_eq!(failing.fields().heart_rate, "75");
    }

    #[test]
    fn test_high_reading_alert_message() {
        let cache = LocalCacheStore::new(Arc::new(MemoryStorage::new()));
        let mut tracker = LocalTracker::mount(cache, AlertThresholds::default());

        let submission = tracker.submit(&mut form("150", "150/95"));
        assert_eq!(submission.alert, Some(AlertLevel::High));
        assert!(submission.alert_message.unwrap().contains("150 bpm"));
    }
}
