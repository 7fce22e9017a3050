//! HeartTrack Core Library
//!
//! Personal vitals tracking: a form captures one reading, a store persists it,
//! views render the latest reading, the history and the heart-rate trend.
//!
//! # Architecture
//!
//! Two independent composition roots share one store capability interface:
//!
//! ```text
//!   Local tracker                           Remote dashboard
//!   ─────────────                           ────────────────
//!   LocalVitalsForm                         RemoteVitalsForm
//!         │ submit                                │ submit (optimistic view update)
//!         ▼                                       ▼
//!   LocalTracker (in-memory list)           RemoteVitalsStore ──append──▶ VitalsCollection
//!         │ write-through save                    │                       (server time, SQLite)
//!         ▼                                       │ subscribe_latest
//!   LocalCacheStore ──▶ KeyValueStorage           ▼
//!         │                                 RemoteDashboard ──▶ DashboardView
//!         ▼
//!   HistoryTable / TrendChart / SummaryStats
//! ```
//!
//! # Modules
//!
//! - [`models`]: Domain types (LocalVitalsRecord, RemoteVitalsDocument, LatestVitals)
//! - [`cache`]: Key-value storage and the local snapshot cache
//! - [`db`]: SQLite document database behind the remote collection
//! - [`remote`]: Remote vitals store with live latest-reading subscriptions
//! - [`store`]: Store capability traits
//! - [`form`]: Record form validation and submit state machine
//! - [`views`]: Dashboard, history table and trend chart view models
//! - [`sync`]: Local tracker and remote dashboard composition roots
//! - [`analytics`]: Heart-rate alerts and summary statistics
//! - [`export`]: CSV and JSON export
//! - [`config`]: Static configuration

pub mod analytics;
pub mod cache;
pub mod config;
pub mod db;
pub mod export;
pub mod form;
pub mod logging;
pub mod models;
pub mod remote;
pub mod store;
pub mod sync;
pub mod views;

// Re-export commonly used types
pub use cache::{FileStorage, KeyValueStorage, LocalCacheStore, MemoryStorage};
pub use config::{AppConfig, RemoteConfig};
pub use form::{FormState, LocalVitalsForm, Notice, RemoteVitalsForm, SubmitOutcome};
pub use models::{
    LatestVitals, LocalVitalsInput, LocalVitalsRecord, RemoteVitalsDocument, RemoteVitalsInput,
};
pub use remote::{RemoteVitalsStore, SqliteCollection, Subscription};
pub use store::{LiveStore, SnapshotStore, VitalsStore};
pub use sync::{LocalTracker, RemoteDashboard};
pub use views::{DashboardView, HistoryTable, MetricCard, TrendChart};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use form::{LocalVitalsFields, RemoteVitalsFields};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum HeartTrackError {
    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Remote store error: {0}")]
    RemoteError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<cache::CacheError> for HeartTrackError {
    fn from(e: cache::CacheError) -> Self {
        HeartTrackError::StorageError(e.to_string())
    }
}

impl From<remote::RemoteError> for HeartTrackError {
    fn from(e: remote::RemoteError) -> Self {
        HeartTrackError::RemoteError(e.to_string())
    }
}

impl From<config::ConfigError> for HeartTrackError {
    fn from(e: config::ConfigError) -> Self {
        HeartTrackError::ConfigError(e.to_string())
    }
}

impl From<serde_json::Error> for HeartTrackError {
    fn from(e: serde_json::Error) -> Self {
        HeartTrackError::SerializationError(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for HeartTrackError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        HeartTrackError::StorageError(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Install the default tracing subscriber.
#[uniffi::export]
pub fn enable_logging() {
    logging::init_logging();
}

/// Open the local-only tracker described by a JSON config.
///
/// Without `cacheDir` the history lives in memory.
#[uniffi::export]
pub fn open_local_tracker(config_json: String) -> Result<Arc<LocalTrackerHandle>, HeartTrackError> {
    let config = AppConfig::from_json_str(&config_json)?;
    let storage: Arc<dyn KeyValueStorage> = match &config.cache_dir {
        Some(dir) => Arc::new(FileStorage::open(dir)?),
        None => Arc::new(MemoryStorage::new()),
    };
    let tracker = LocalTracker::mount(LocalCacheStore::new(storage), config.alert_thresholds);
    Ok(Arc::new(LocalTrackerHandle {
        tracker: Mutex::new(tracker),
    }))
}

/// Connect the remote dashboard described by a JSON config.
///
/// `listener` is called with the new view after every change.
#[uniffi::export]
pub fn connect_dashboard(
    config_json: String,
    listener: Box<dyn DashboardListener>,
) -> Result<Arc<DashboardHandle>, HeartTrackError> {
    let config = AppConfig::from_json_str(&config_json)?;
    let remote = config
        .remote
        .as_ref()
        .ok_or_else(|| HeartTrackError::ConfigError("remote is not configured".into()))?;
    let store = RemoteVitalsStore::connect(remote)?;

    let listener: Arc<dyn DashboardListener> = Arc::from(listener);
    let hook: Arc<sync::RenderHook> = Arc::new(move |view: &DashboardView| {
        listener.on_dashboard_changed(view.clone().into());
    });
    let dashboard = RemoteDashboard::mount_with_hook(store, Some(hook))?;

    Ok(Arc::new(DashboardHandle {
        dashboard,
        history_limit: config.history_limit,
    }))
}

/// Host-side re-render hook for the dashboard.
#[uniffi::export(callback_interface)]
pub trait DashboardListener: Send + Sync {
    fn on_dashboard_changed(&self, view: FfiDashboardView);
}

// =========================================================================
// Main API Objects
// =========================================================================

/// Thread-safe local tracker wrapper for FFI.
#[derive(uniffi::Object)]
pub struct LocalTrackerHandle {
    tracker: Mutex<LocalTracker>,
}

#[uniffi::export]
impl LocalTrackerHandle {
    /// Submit one reading.
    pub fn submit(
        &self,
        heart_rate: String,
        blood_pressure: String,
        notes: String,
    ) -> Result<FfiSubmitResult, HeartTrackError> {
        let mut tracker = self.tracker.lock()?;
        let mut form = LocalVitalsForm::with_fields(LocalVitalsFields {
            heart_rate,
            blood_pressure,
            notes,
        });
        let submission = tracker.submit(&mut form);

        let mut result = FfiSubmitResult::new(&submission.outcome, form.take_notice());
        result.alert_message = submission.alert_message;
        Ok(result)
    }

    /// History rows, newest first.
    pub fn history(&self) -> Result<Vec<FfiHistoryRow>, HeartTrackError> {
        let tracker = self.tracker.lock()?;
        Ok(tracker
            .history_table()
            .rows
            .into_iter()
            .map(Into::into)
            .collect())
    }

    /// Trend points, oldest first.
    pub fn trend(&self) -> Result<Vec<FfiTrendPoint>, HeartTrackError> {
        let tracker = self.tracker.lock()?;
        Ok(tracker
            .trend_chart()
            .points
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub fn stats(&self) -> Result<Option<FfiSummaryStats>, HeartTrackError> {
        let tracker = self.tracker.lock()?;
        Ok(tracker.stats().map(Into::into))
    }

    /// Rows for readings outside the alert thresholds.
    pub fn alerts(&self) -> Result<Vec<FfiHistoryRow>, HeartTrackError> {
        let tracker = self.tracker.lock()?;
        let alerts: Vec<LocalVitalsRecord> = tracker.alerts().into_iter().cloned().collect();
        Ok(HistoryTable::from_records(&alerts)
            .rows
            .into_iter()
            .map(Into::into)
            .collect())
    }

    pub fn export_csv(&self) -> Result<String, HeartTrackError> {
        let tracker = self.tracker.lock()?;
        Ok(tracker.export().to_csv())
    }

    pub fn export_json(&self) -> Result<String, HeartTrackError> {
        let tracker = self.tracker.lock()?;
        Ok(tracker.export().to_json()?)
    }
}

/// Thread-safe remote dashboard wrapper for FFI.
///
/// `RemoteDashboard` synchronizes internally and calls the listener with no
/// lock held, so the listener may call back into this handle.
#[derive(uniffi::Object)]
pub struct DashboardHandle {
    dashboard: RemoteDashboard<RemoteVitalsStore>,
    history_limit: usize,
}

#[uniffi::export]
impl DashboardHandle {
    /// Submit one reading to the remote store.
    pub fn submit(
        &self,
        heart_rate: String,
        blood_pressure: String,
        cholesterol: String,
        glucose: String,
    ) -> FfiSubmitResult {
        let mut form = RemoteVitalsForm::with_fields(RemoteVitalsFields {
            heart_rate,
            blood_pressure,
            cholesterol,
            glucose,
        });
        let outcome = self.dashboard.submit(&mut form);
        FfiSubmitResult::new(&outcome, form.take_notice())
    }

    pub fn view(&self) -> FfiDashboardView {
        self.dashboard.view().into()
    }

    /// Remote history as CSV, newest first.
    pub fn export_csv(&self) -> Result<String, HeartTrackError> {
        let documents = self.dashboard.store().history(self.history_limit)?;
        Ok(export::RemoteHistoryExport::new(documents).to_csv())
    }

    /// Stop live updates.
    pub fn close(&self) {
        self.dashboard.unmount();
    }

    pub fn is_connected(&self) -> bool {
        self.dashboard.is_mounted()
    }
}

// =========================================================================
// FFI Types
// =========================================================================

/// Outcome of a submit, flattened for FFI.
#[derive(Debug, Clone, PartialEq, uniffi::Enum)]
pub enum FfiSubmitStatus {
    Saved,
    Ignored,
    Invalid,
    Busy,
    Failed,
}

/// FFI-safe submit result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubmitResult {
    pub status: FfiSubmitStatus,
    /// Success or failure notice to show the user
    pub notice: Option<String>,
    /// Field that failed validation, or the write error
    pub detail: Option<String>,
    pub alert_message: Option<String>,
}

impl FfiSubmitResult {
    fn new<T>(outcome: &SubmitOutcome<T>, notice: Option<Notice>) -> Self {
        let (status, detail) = match outcome {
            SubmitOutcome::Saved(_) => (FfiSubmitStatus::Saved, None),
            SubmitOutcome::Ignored => (FfiSubmitStatus::Ignored, None),
            SubmitOutcome::Invalid(field) => (FfiSubmitStatus::Invalid, Some(field.to_string())),
            SubmitOutcome::Busy => (FfiSubmitStatus::Busy, None),
            SubmitOutcome::Failed(error) => (FfiSubmitStatus::Failed, Some(error.clone())),
        };
        let notice = notice.map(|n| match n {
            Notice::Success(text) | Notice::Error(text) => text,
        });
        Self {
            status,
            notice,
            detail,
            alert_message: None,
        }
    }
}

/// FFI-safe history row.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHistoryRow {
    pub id: i64,
    pub date: String,
    pub heart_rate: String,
    pub blood_pressure: String,
    pub notes: String,
}

impl From<views::HistoryRow> for FfiHistoryRow {
    fn from(row: views::HistoryRow) -> Self {
        Self {
            id: row.id,
            date: row.date,
            heart_rate: row.heart_rate,
            blood_pressure: row.blood_pressure,
            notes: row.notes,
        }
    }
}

/// FFI-safe trend point.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiTrendPoint {
    /// RFC 3339 timestamp
    pub date: String,
    pub heart_rate: f64,
}

impl From<views::TrendPoint> for FfiTrendPoint {
    fn from(point: views::TrendPoint) -> Self {
        Self {
            date: point.date.to_rfc3339(),
            heart_rate: point.heart_rate,
        }
    }
}

/// FFI-safe summary statistics.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSummaryStats {
    pub latest_bpm: f64,
    pub average_bpm: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    pub count: u32,
}

impl From<analytics::SummaryStats> for FfiSummaryStats {
    fn from(stats: analytics::SummaryStats) -> Self {
        Self {
            latest_bpm: stats.latest_bpm,
            average_bpm: stats.average_bpm,
            min_bpm: stats.min_bpm,
            max_bpm: stats.max_bpm,
            count: stats.count as u32,
        }
    }
}

/// FFI-safe metric card.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiMetricCard {
    pub label: String,
    /// Text to show; blank when the reading lacks this field
    pub display: String,
}

/// FFI-safe dashboard view.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDashboardView {
    /// Set when there is nothing to show yet
    pub placeholder: Option<String>,
    pub cards: Vec<FfiMetricCard>,
    pub optimistic: bool,
}

impl From<DashboardView> for FfiDashboardView {
    fn from(view: DashboardView) -> Self {
        match view {
            DashboardView::Placeholder { message } => Self {
                placeholder: Some(message),
                cards: Vec::new(),
                optimistic: false,
            },
            DashboardView::Metrics { cards, optimistic } => Self {
                placeholder: None,
                cards: cards
                    .iter()
                    .map(|card| FfiMetricCard {
                        label: card.label.clone(),
                        display: card.display(),
                    })
                    .collect(),
                optimistic,
            },
        }
    }
}
