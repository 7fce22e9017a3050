//! The document collection the remote store writes to.

use std::path::Path;
use std::sync::Mutex;

use chrono::{DateTime, Utc};

use super::{RemoteError, RemoteResult};
use crate::db::Database;
use crate::models::{RemoteVitalsDocument, RemoteVitalsInput};

/// Server side of the remote store.
///
/// `insert` owns id and timestamp assignment so concurrent writers always
/// observe non-decreasing server time.
pub trait VitalsCollection: Send + Sync {
    /// Persist `input` as a new document and return what was stored.
    fn insert(&self, input: &RemoteVitalsInput) -> RemoteResult<RemoteVitalsDocument>;

    /// Most recent document by server timestamp.
    fn latest(&self) -> RemoteResult<Option<RemoteVitalsDocument>>;

    /// Up to `limit` documents, newest first.
    fn list_recent(&self, limit: usize) -> RemoteResult<Vec<RemoteVitalsDocument>>;
}

/// Build the stored form of `input`: fresh id, server time replacing the client's.
///
/// Server time never goes below `previous`, the newest timestamp already stored.
pub fn server_document(
    input: &RemoteVitalsInput,
    previous: Option<DateTime<Utc>>,
) -> RemoteVitalsDocument {
    let now = truncate_to_micros(Utc::now());
    let timestamp = match previous {
        Some(prev) if prev > now => prev,
        _ => now,
    };

    RemoteVitalsDocument {
        id: uuid::Uuid::new_v4().to_string(),
        heart_rate: input.heart_rate,
        blood_pressure: input.blood_pressure.clone(),
        cholesterol: input.cholesterol,
        glucose: input.glucose,
        timestamp,
    }
}

/// Stored timestamps carry microsecond precision.
fn truncate_to_micros(ts: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_micros(ts.timestamp_micros()).unwrap_or(ts)
}

/// `VitalsCollection` over the SQLite document database.
pub struct SqliteCollection {
    db: Mutex<Database>,
    project_id: String,
}

impl SqliteCollection {
    /// Open the collection for `project_id` in the database at `path`.
    pub fn open<P: AsRef<Path>>(path: P, project_id: impl Into<String>) -> RemoteResult<Self> {
        Ok(Self::new(Database::open(path)?, project_id))
    }

    /// In-memory collection (for testing).
    pub fn open_in_memory(project_id: impl Into<String>) -> RemoteResult<Self> {
        Ok(Self::new(Database::open_in_memory()?, project_id))
    }

    pub fn new(db: Database, project_id: impl Into<String>) -> Self {
        Self {
            db: Mutex::new(db),
            project_id: project_id.into(),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Number of stored documents.
    pub fn count(&self) -> RemoteResult<u64> {
        let db = self.db.lock()?;
        Ok(db.count_vitals_documents(&self.project_id)?)
    }
}

impl VitalsCollection for SqliteCollection {
    fn insert(&self, input: &RemoteVitalsInput) -> RemoteResult<RemoteVitalsDocument> {
        let db = self.db.lock()?;
        let previous = db
            .latest_vitals_document(&self.project_id)?
            .map(|doc| doc.timestamp);
        let doc = server_document(input, previous);
        db.insert_vitals_document(&self.project_id, &doc)?;
        Ok(doc)
    }

    fn latest(&self) -> RemoteResult<Option<RemoteVitalsDocument>> {
        let db = self.db.lock()?;
        Ok(db.latest_vitals_document(&self.project_id)?)
    }

    fn list_recent(&self, limit: usize) -> RemoteResult<Vec<RemoteVitalsDocument>> {
        let db = self.db.lock()?;
        Ok(db.list_vitals_documents(&self.project_id, limit)?)
    }
}
