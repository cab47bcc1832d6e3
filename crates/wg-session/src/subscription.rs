//! State observation for session consumers

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use dashmap::DashMap;

use wg_core::ConnectionState;

/// Callback invoked with a complete state snapshot on every transition
pub type Listener = Arc<dyn Fn(&ConnectionState) + Send + Sync>;

/// Set of active listeners, keyed by a monotonically assigned id
pub(crate) struct SubscriberSet {
    listeners: DashMap<u64, Listener>,
    next_id: AtomicU64,
}

impl SubscriberSet {
    pub(crate) fn new() -> Self {
        Self {
            listeners: DashMap::new(),
            next_id: AtomicU64::new(0),
        }
    }

    pub(crate) fn insert(&self, listener: Listener) -> u64 {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        self.listeners.insert(id, listener);
        id
    }

    pub(crate) fn remove(&self, id: u64) {
        self.listeners.remove(&id);
    }

    /// Invoke every listener with the given snapshot
    ///
    /// Listeners are collected before any callback runs, so a listener may
    /// unsubscribe (itself or another subscription) mid-notification without
    /// touching a map that is being iterated.
    pub(crate) fn notify(&self, state: &ConnectionState) {
        let snapshot: Vec<Listener> = self.listeners.iter().map(|e| Arc::clone(e.value())).collect();
        for listener in snapshot {
            listener(state);
        }
    }
}

/// Handle returned by `SessionManager::subscribe`
///
/// Dropping the handle does NOT detach the listener; call
/// [`Subscription::unsubscribe`] explicitly. Unsubscribing twice, or after
/// the manager is gone, is a no-op.
pub struct Subscription {
    id: u64,
    subscribers: Weak<SubscriberSet>,
}

impl Subscription {
    pub(crate) fn new(id: u64, subscribers: Weak<SubscriberSet>) -> Self {
        Self { id, subscribers }
    }

    /// Detach the listener; idempotent and safe during notification
    pub fn unsubscribe(&self) {
        if let Some(set) = self.subscribers.upgrade() {
            set.remove(self.id);
        }
    }
}
