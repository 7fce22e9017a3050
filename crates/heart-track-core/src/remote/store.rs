//! The Remote Vitals Store.

use std::sync::Arc;

use tracing::{error, info};

use super::{
    LatestCallback, ListenerRegistry, RemoteError, RemoteResult, RemoteWriteError,
    SqliteCollection, Subscription, VitalsCollection,
};
use crate::config::RemoteConfig;
use crate::models::{RemoteVitalsDocument, RemoteVitalsInput};

/// Append-only vitals collection with a live "latest" query.
///
/// Clones share the collection and the listener registry, so an append
/// through any clone reaches every subscriber.
#[derive(Clone)]
pub struct RemoteVitalsStore {
    collection: Arc<dyn VitalsCollection>,
    listeners: Arc<ListenerRegistry>,
}

impl RemoteVitalsStore {
    /// Create a store over an existing collection.
    pub fn new(collection: Arc<dyn VitalsCollection>) -> Self {
        Self {
            collection,
            listeners: Arc::new(ListenerRegistry::default()),
        }
    }

    /// Connect using a static configuration.
    ///
    /// Without a `database_path` the collection lives in memory.
    pub fn connect(config: &RemoteConfig) -> RemoteResult<Self> {
        config
            .validate()
            .map_err(|e| RemoteError::InvalidConfig(e.to_string()))?;

        let collection = match &config.database_path {
            Some(path) => SqliteCollection::open(path, config.project_id.clone())?,
            None => SqliteCollection::open_in_memory(config.project_id.clone())?,
        };
        info!(project = %config.project_id, "connected to remote vitals store");
        Ok(Self::new(Arc::new(collection)))
    }

    /// Write a new document. Server time replaces `input.timestamp`.
    ///
    /// On success every live subscriber receives the new document.
    pub fn append(
        &self,
        input: &RemoteVitalsInput,
    ) -> Result<RemoteVitalsDocument, RemoteWriteError> {
        let doc = self.collection.insert(input).map_err(|e| {
            error!(error = %e, "error adding vitals");
            RemoteWriteError(e)
        })?;

        info!(doc_id = %doc.id, "vitals document written");

        // The write is durable; a notify failure must not turn it into an error
        if let Err(e) = self.listeners.notify(&doc) {
            error!(error = %e, "failed to notify latest-vitals subscribers");
        }
        Ok(doc)
    }

    /// Subscribe to the most recent document.
    ///
    /// The callback runs once immediately when a document exists, then once per
    /// later append. Keep the returned handle alive for as long as updates are
    /// wanted.
    pub fn subscribe_latest<F>(&self, callback: F) -> RemoteResult<Subscription>
    where
        F: Fn(&RemoteVitalsDocument) + Send + Sync + 'static,
    {
        let callback: Arc<LatestCallback> = Arc::new(callback);
        let (subscription, listener) = self.listeners.register(callback)?;

        // Registered before the read so no append can fall between the two
        match self.collection.latest() {
            Ok(Some(doc)) => listener.deliver(&doc),
            Ok(None) => {}
            Err(e) => {
                subscription.unsubscribe();
                return Err(e);
            }
        }
        Ok(subscription)
    }

    /// Current latest document, if any.
    pub fn latest(&self) -> RemoteResult<Option<RemoteVitalsDocument>> {
        self.collection.latest()
    }

    /// Canonical history, newest first.
    pub fn history(&self, limit: usize) -> RemoteResult<Vec<RemoteVitalsDocument>> {
        self.collection.list_recent(limit)
    }

    /// Number of live subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }
}
