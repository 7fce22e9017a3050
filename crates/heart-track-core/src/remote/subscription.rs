//! Live "latest document" subscriptions.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use chrono::{DateTime, Utc};
use tracing::debug;

use super::RemoteResult;
use crate::models::RemoteVitalsDocument;

/// Callback invoked with the newest document.
pub type LatestCallback = dyn Fn(&RemoteVitalsDocument) + Send + Sync;

/// One registered callback.
pub(crate) struct Listener {
    callback: Arc<LatestCallback>,
    active: Arc<AtomicBool>,
    /// Timestamp and id of the last document handed to the callback
    last_delivered: Mutex<Option<(DateTime<Utc>, String)>>,
}

impl Listener {
    /// Hand `doc` to the callback unless the listener was disposed or has
    /// already seen this document or a newer one.
    pub(crate) fn deliver(&self, doc: &RemoteVitalsDocument) {
        if !self.active.load(Ordering::Acquire) {
            return;
        }

        {
            let mut last = self
                .last_delivered
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some((ts, id)) = last.as_ref() {
                if doc.timestamp < *ts || doc.id == *id {
                    return;
                }
            }
            *last = Some((doc.timestamp, doc.id.clone()));
        }

        // Re-check: the subscription may have been released while we waited
        if self.active.load(Ordering::Acquire) {
            (self.callback)(doc);
        }
    }
}

/// Registry of live listeners, shared by every clone of a store.
#[derive(Default)]
pub(crate) struct ListenerRegistry {
    next_id: AtomicU64,
    listeners: Mutex<BTreeMap<u64, Arc<Listener>>>,
}

impl ListenerRegistry {
    pub(crate) fn register(
        self: &Arc<Self>,
        callback: Arc<LatestCallback>,
    ) -> RemoteResult<(Subscription, Arc<Listener>)> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let active = Arc::new(AtomicBool::new(true));
        let listener = Arc::new(Listener {
            callback,
            active: active.clone(),
            last_delivered: Mutex::new(None),
        });

        self.listeners.lock()?.insert(id, listener.clone());
        debug!(subscription = id, "latest-vitals subscription opened");

        let subscription = Subscription {
            id,
            active,
            registry: Arc::downgrade(self),
        };
        Ok((subscription, listener))
    }

    fn unregister(&self, id: u64) {
        let mut listeners = self
            .listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        listeners.remove(&id);
        debug!(subscription = id, "latest-vitals subscription closed");
    }

    /// Deliver `doc` to every active listener.
    ///
    /// Callbacks run outside the registry lock so they may subscribe,
    /// unsubscribe or append without deadlocking.
    pub(crate) fn notify(&self, doc: &RemoteVitalsDocument) -> RemoteResult<()> {
        let snapshot: Vec<Arc<Listener>> = self.listeners.lock()?.values().cloned().collect();
        for listener in snapshot {
            listener.deliver(doc);
        }
        Ok(())
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners
            .lock()
            .map(|listeners| listeners.len())
            .unwrap_or(0)
    }
}

/// Handle to a live subscription. Released by `unsubscribe` or on drop.
///
/// Once released, the callback is never invoked again.
pub struct Subscription {
    id: u64,
    active: Arc<AtomicBool>,
    registry: Weak<ListenerRegistry>,
}

impl Subscription {
    /// Release the subscription.
    pub fn unsubscribe(self) {
        // Drop does the work
    }

    /// Whether the subscription is still live.
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    fn release(&self) {
        // swap makes release happen exactly once
        if self.active.swap(false, Ordering::AcqRel) {
            if let Some(registry) = self.registry.upgrade() {
                registry.unregister(self.id);
            }
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.is_active())
            .finish()
    }
}
