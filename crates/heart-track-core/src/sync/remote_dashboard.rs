//! Remote-backed dashboard: live latest reading plus optimistic local updates.

use std::sync::{Arc, Mutex, Weak};

use tracing::{debug, info};

use crate::form::{RemoteVitalsForm, SubmitOutcome};
use crate::models::{LatestVitals, RemoteVitalsInput};
use crate::remote::Subscription;
use crate::store::LiveStore;
use crate::views::DashboardView;

/// Re-render hook, called with the new view after every change.
pub type RenderHook = dyn Fn(&DashboardView) + Send + Sync;

#[derive(Default)]
struct DashboardState {
    latest: Option<LatestVitals>,
    on_change: Option<Arc<RenderHook>>,
    /// Bumped on every applied reading
    revision: u64,
}

/// Apply a new latest reading and run the render hook outside the lock.
fn apply_latest(state: &Mutex<DashboardState>, latest: LatestVitals) {
    let (hook, view) = {
        let mut guard = state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.latest = Some(latest);
        guard.revision += 1;
        let view = DashboardView::from_latest(guard.latest.as_ref());
        (guard.on_change.clone(), view)
    };
    if let Some(hook) = hook {
        hook(&view);
    }
}

/// Dashboard over a live store.
///
/// The store's callback only holds a weak reference to the view state, so a
/// dropped dashboard is never touched by a late delivery. Every method takes
/// `&self` and no lock is held while the render hook runs, so the hook may
/// call back into the dashboard.
pub struct RemoteDashboard<S: LiveStore> {
    store: S,
    state: Arc<Mutex<DashboardState>>,
    subscription: Mutex<Option<Subscription>>,
}

impl<S> RemoteDashboard<S>
where
    S: LiveStore<Input = RemoteVitalsInput> + 'static,
    S::Record: Into<LatestVitals> + 'static,
{
    /// Subscribe to the store's latest record.
    pub fn mount(store: S) -> Result<Self, S::SubscribeError> {
        Self::mount_with_hook(store, None)
    }

    /// Subscribe, with a render hook installed before the first delivery.
    pub fn mount_with_hook(
        store: S,
        on_change: Option<Arc<RenderHook>>,
    ) -> Result<Self, S::SubscribeError> {
        let state = Arc::new(Mutex::new(DashboardState {
            on_change,
            ..DashboardState::default()
        }));

        let weak: Weak<Mutex<DashboardState>> = Arc::downgrade(&state);
        let subscription = store.subscribe_latest(move |record: &S::Record| {
            match weak.upgrade() {
                Some(state) => apply_latest(&state, record.clone().into()),
                None => debug!("latest vitals delivered after dashboard teardown, ignored"),
            }
        })?;

        info!("remote dashboard mounted");
        Ok(Self {
            store,
            state,
            subscription: Mutex::new(Some(subscription)),
        })
    }

    /// Replace the render hook.
    pub fn set_on_change(&self, hook: Option<Arc<RenderHook>>) {
        let mut guard = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.on_change = hook;
    }

    /// Latest reading currently shown.
    pub fn latest(&self) -> Option<LatestVitals> {
        let guard = self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.latest.clone()
    }

    pub fn view(&self) -> DashboardView {
        DashboardView::from_latest(self.latest().as_ref())
    }

    fn revision(&self) -> u64 {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .revision
    }

    /// Submit the form to the store. On success the dashboard shows the
    /// submitted values at once, ahead of server confirmation.
    ///
    /// Unlike an always-optimistic form, the optimistic copy is skipped when
    /// a server delivery already landed during the write: the confirmed
    /// document stays on screen instead of being replaced by the
    /// pre-submission values.
    pub fn submit(&self, form: &mut RemoteVitalsForm) -> SubmitOutcome<RemoteVitalsInput> {
        let before = self.revision();
        let outcome = form.submit(&self.store);
        if let SubmitOutcome::Saved(input) = &outcome {
            if self.revision() == before {
                apply_latest(&self.state, LatestVitals::from(input.clone()));
            } else {
                debug!("server reading arrived during submit, skipping optimistic update");
            }
        }
        outcome
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn subscription_slot(&self) -> std::sync::MutexGuard<'_, Option<Subscription>> {
        self.subscription
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn is_mounted(&self) -> bool {
        self.subscription_slot().is_some()
    }

    /// Release the live subscription. Later calls do nothing.
    pub fn unmount(&self) {
        // Taken out first so the slot lock is not held while unregistering
        let subscription = self.subscription_slot().take();
        if let Some(subscription) = subscription {
            subscription.unsubscribe();
            info!("remote dashboard unmounted");
        }
    }
}
