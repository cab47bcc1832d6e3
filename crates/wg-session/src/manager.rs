//! Connection session manager
//!
//! Owns the [`ConnectionState`] singleton and mediates every connect and
//! disconnect intent. Guards reject overlapping attempts instead of queueing
//! them; a disconnect issued while an attempt is suspended always wins, and
//! the late connect result is discarded via an attempt generation counter.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures::FutureExt;
use parking_lot::Mutex;

use wg_core::error::{ConnectError, SessionError};
use wg_core::state::FailureReason;
use wg_core::types::{Address, ConnectorId, ConnectorInfo};
use wg_core::ConnectionState;

use crate::registry::ConnectorRegistry;
use crate::subscription::{SubscriberSet, Subscription};

/// Mediates between consumers and the connector registry
///
/// Transitions happen on the calling task; the only suspension points are
/// the connector's own connect/disconnect futures. Guard checks handle
/// intents that arrive while an attempt is suspended.
pub struct SessionManager {
    registry: Arc<ConnectorRegistry>,
    current: Mutex<Current>,
    subscribers: Arc<SubscriberSet>,
}

/// Exclusive session state, guarded by the manager's lock
struct Current {
    state: ConnectionState,
    /// Generation counter; a connect result whose attempt number no longer
    /// matches is stale and must not touch the state.
    attempt: u64,
}

impl SessionManager {
    /// Create a manager over a fixed registry
    pub fn new(registry: Arc<ConnectorRegistry>) -> Self {
        Self {
            registry,
            current: Mutex::new(Current {
                state: ConnectionState::Disconnected,
                attempt: 0,
            }),
            subscribers: Arc::new(SubscriberSet::new()),
        }
    }

    /// The registry this manager dispatches to
    pub fn registry(&self) -> &ConnectorRegistry {
        &self.registry
    }

    /// Connector snapshots in display order, for consumers
    pub fn connectors(&self) -> Vec<ConnectorInfo> {
        self.registry.list()
    }

    /// Synchronous snapshot of the current state
    pub fn current_state(&self) -> ConnectionState {
        self.current.lock().state.clone()
    }

    /// Register a listener invoked with a snapshot on every transition
    pub fn subscribe(
        &self,
        listener: impl Fn(&ConnectionState) + Send + Sync + 'static,
    ) -> Subscription {
        let id = self.subscribers.insert(Arc::new(listener));
        Subscription::new(id, Arc::downgrade(&self.subscribers))
    }

    /// Establish a session via the given connector
    ///
    /// Rejected with the state unchanged when the id is unknown, the
    /// connector is unavailable in this environment, an attempt is already
    /// in flight (for any connector), or a session is already established.
    /// An accepted attempt transitions to `Connecting`, awaits the
    /// connector, and always lands in `Connected` or `Failed`. If a
    /// disconnect superseded the attempt while it was suspended, the
    /// result is discarded and `AttemptSuperseded` is returned instead.
    pub async fn connect(&self, connector_id: &ConnectorId) -> Result<Address, SessionError> {
        let connector = self.registry.find(connector_id)?;

        // Probe before dispatch; an unavailable connector should not have
        // been offered, and must not consume the attempt slot.
        if !connector.is_available() {
            return Err(SessionError::ConnectorUnavailable(connector_id.clone()));
        }

        let (attempt, snapshot) = {
            let mut current = self.current.lock();
            match &current.state {
                ConnectionState::Connecting {
                    connector_id: in_flight,
                } => {
                    return Err(SessionError::AlreadyConnecting(in_flight.clone()));
                }
                ConnectionState::Connected {
                    connector_id: active,
                    ..
                } => {
                    return Err(SessionError::AlreadyConnected(active.clone()));
                }
                ConnectionState::Disconnected | ConnectionState::Failed { .. } => {}
            }
            current.attempt += 1;
            current.state = ConnectionState::Connecting {
                connector_id: connector_id.clone(),
            };
            (current.attempt, current.state.clone())
        };
        self.subscribers.notify(&snapshot);
        tracing::debug!(connector = %connector_id, attempt, "connect attempt started");

        // A panicking connector future must land in Failed, not leave the
        // manager stuck in Connecting.
        let result = match AssertUnwindSafe(connector.connect()).catch_unwind().await {
            Ok(result) => result,
            Err(_) => Err(ConnectError::Provider(anyhow::anyhow!(
                "connector panicked during connect"
            ))),
        };

        let snapshot = {
            let mut current = self.current.lock();
            if current.attempt != attempt {
                tracing::debug!(
                    connector = %connector_id,
                    attempt,
                    "discarding superseded connect result"
                );
                return Err(SessionError::AttemptSuperseded);
            }
            current.state = match &result {
                Ok(address) => ConnectionState::Connected {
                    connector_id: connector_id.clone(),
                    address: address.clone(),
                },
                Err(err) => ConnectionState::Failed {
                    connector_id: connector_id.clone(),
                    reason: FailureReason::from(err),
                },
            };
            current.state.clone()
        };
        self.subscribers.notify(&snapshot);

        match result {
            Ok(address) => {
                tracing::info!(connector = %connector_id, address = %address.short(), "wallet connected");
                Ok(address)
            }
            Err(err) => {
                tracing::warn!(connector = %connector_id, "connect failed: {}", err);
                Err(SessionError::Connector(err))
            }
        }
    }

    /// Tear down the current session, if any
    ///
    /// Legal from every state; a no-op (with no notification) when already
    /// disconnected. Any in-flight attempt is invalidated first, so a late
    /// connect result cannot resurrect a session. The connector's own
    /// teardown runs after the transition and is best-effort.
    pub async fn disconnect(&self) {
        let (connector_id, snapshot) = {
            let mut current = self.current.lock();
            let connector_id = match current.state.connector_id() {
                Some(id) => id.clone(),
                None => return,
            };
            current.attempt += 1;
            current.state = ConnectionState::Disconnected;
            (connector_id, current.state.clone())
        };
        self.subscribers.notify(&snapshot);
        tracing::info!(connector = %connector_id, "wallet disconnected");

        if let Ok(connector) = self.registry.find(&connector_id) {
            connector.disconnect().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use wg_core::state::FailureKind;
    use wg_core::Connector;

    enum Outcome {
        Ok(&'static str),
        Rejected,
        Panic,
    }

    /// Scripted connector: pops one outcome per connect call, optionally
    /// holding each call at a gate until the test releases it.
    struct MockConnector {
        id: ConnectorId,
        name: String,
        available: bool,
        script: Mutex<VecDeque<Outcome>>,
        gate: Option<Arc<Notify>>,
        connect_calls: AtomicUsize,
        disconnect_calls: AtomicUsize,
    }

    impl MockConnector {
        fn with_script(id: &str, script: Vec<Outcome>) -> Arc<Self> {
            Arc::new(Self {
                id: ConnectorId::new(id),
                name: format!("Mock {}", id),
                available: true,
                script: Mutex::new(script.into()),
                gate: None,
                connect_calls: AtomicUsize::new(0),
                disconnect_calls: AtomicUsize::new(0),
            })
        }

        fn ok(id: &str, address: &'static str) -> Arc<Self> {
            Self::with_script(id, vec![Outcome::Ok(address)])
        }

        fn rejecting(id: &str) -> Arc<Self> {
            Self::with_script(id, vec![Outcome::Rejected])
        }

        fn unavailable(id: &str) -> Arc<Self> {
            Arc::new(Self {
                id: ConnectorId::new(id),
                name: format!("Mock {}", id),
                available: false,
                script: Mutex::new(VecDeque::new()),
                gate: None,
                connect_calls: AtomicUsize::new(0),
                disconnect_calls: AtomicUsize::new(0),
            })
        }

        /// Connector whose connect call blocks until the returned gate is
        /// notified.
        fn gated(id: &str, address: &'static str) -> (Arc<Self>, Arc<Notify>) {
            let gate = Arc::new(Notify::new());
            let connector = Arc::new(Self {
                id: ConnectorId::new(id),
                name: format!("Mock {}", id),
                available: true,
                script: Mutex::new(vec![Outcome::Ok(address)].into()),
                gate: Some(Arc::clone(&gate)),
                connect_calls: AtomicUsize::new(0),
                disconnect_calls: AtomicUsize::new(0),
            });
            (connector, gate)
        }

        fn connect_calls(&self) -> usize {
            self.connect_calls.load(Ordering::SeqCst)
        }

        fn disconnect_calls(&self) -> usize {
            self.disconnect_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Connector for MockConnector {
        fn id(&self) -> &ConnectorId {
            &self.id
        }

        fn display_name(&self) -> &str {
            &self.name
        }

        fn is_available(&self) -> bool {
            self.available
        }

        async fn connect(&self) -> Result<Address, ConnectError> {
            self.connect_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(gate) = &self.gate {
                gate.notified().await;
            }
            match self.script.lock().pop_front().expect("mock script exhausted") {
                Outcome::Ok(address) => Ok(Address::new(address).expect("mock address")),
                Outcome::Rejected => Err(ConnectError::UserRejected),
                Outcome::Panic => panic!("mock connector exploded"),
            }
        }

        async fn disconnect(&self) {
            self.disconnect_calls.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn manager_with(connectors: Vec<Arc<MockConnector>>) -> SessionManager {
        let mut registry = ConnectorRegistry::new();
        for connector in connectors {
            registry
                .register(connector as Arc<dyn Connector>)
                .expect("unique test connector ids");
        }
        SessionManager::new(Arc::new(registry))
    }

    /// Subscribe a recorder that appends every snapshot it observes.
    fn record(manager: &SessionManager) -> Arc<Mutex<Vec<ConnectionState>>> {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        manager.subscribe(move |state| sink.lock().push(state.clone()));
        seen
    }

    fn cid(id: &str) -> ConnectorId {
        ConnectorId::new(id)
    }

    // ------------------------------------------------------------------
    // Registry
    // ------------------------------------------------------------------

    #[test]
    fn test_registry_list_preserves_registration_order() {
        let manager = manager_with(vec![
            MockConnector::ok("injected", "0xabc"),
            MockConnector::unavailable("walletconnect"),
        ]);

        let infos = manager.connectors();
        assert_eq!(infos.len(), 2);
        assert_eq!(infos[0].id, "injected");
        assert!(infos[0].available);
        assert_eq!(infos[1].id, "walletconnect");
        assert!(!infos[1].available);
    }

    #[test]
    fn test_registry_rejects_duplicate_id() {
        let mut registry = ConnectorRegistry::new();
        registry
            .register(MockConnector::ok("injected", "0xabc") as Arc<dyn Connector>)
            .unwrap();

        let result = registry.register(MockConnector::ok("injected", "0xdef") as Arc<dyn Connector>);
        assert!(result.is_err());
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_registry_find_unknown_id_fails_without_dispatch() {
        let connector = MockConnector::ok("injected", "0xabc");
        let manager = manager_with(vec![Arc::clone(&connector)]);

        let result = manager.registry().find(&cid("ledger"));
        assert!(matches!(result, Err(SessionError::ConnectorNotFound(_))));
        assert_eq!(connector.connect_calls(), 0);
    }

    // ------------------------------------------------------------------
    // connect()
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_initial_state_is_disconnected() {
        let manager = manager_with(vec![MockConnector::ok("injected", "0xabc")]);
        assert_eq!(manager.current_state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_connect_success_transitions_through_connecting() {
        let manager = manager_with(vec![MockConnector::ok("injected", "0xAbC123DEF4567890")]);
        let seen = record(&manager);

        let address = manager.connect(&cid("injected")).await.unwrap();
        assert_eq!(address.as_str(), "0xabc123def4567890");

        let seen = seen.lock();
        assert_eq!(seen.len(), 2, "exactly two notifications expected");
        assert!(matches!(
            &seen[0],
            ConnectionState::Connecting { connector_id } if connector_id == &cid("injected")
        ));
        assert!(matches!(
            &seen[1],
            ConnectionState::Connected { connector_id, address }
                if connector_id == &cid("injected") && address.as_str() == "0xabc123def4567890"
        ));
    }

    #[tokio::test]
    async fn test_connect_unknown_id_leaves_state_unchanged() {
        let manager = manager_with(vec![MockConnector::ok("injected", "0xabc")]);
        let seen = record(&manager);

        let err = manager.connect(&cid("ledger")).await.unwrap_err();
        assert!(matches!(err, SessionError::ConnectorNotFound(id) if id == cid("ledger")));
        assert_eq!(manager.current_state(), ConnectionState::Disconnected);
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_connect_unavailable_connector_is_rejected_before_dispatch() {
        let connector = MockConnector::unavailable("walletconnect");
        let manager = manager_with(vec![Arc::clone(&connector)]);
        let seen = record(&manager);

        let err = manager.connect(&cid("walletconnect")).await.unwrap_err();
        assert!(matches!(err, SessionError::ConnectorUnavailable(_)));
        assert_eq!(manager.current_state(), ConnectionState::Disconnected);
        assert_eq!(connector.connect_calls(), 0);
        assert!(seen.lock().is_empty());
    }

    #[tokio::test]
    async fn test_connect_while_connecting_is_rejected_without_second_dispatch() {
        let (connector, gate) = MockConnector::gated("injected", "0xabc");
        let manager = Arc::new(manager_with(vec![Arc::clone(&connector)]));

        let pending = tokio::spawn({
            let manager = Arc::clone(&manager);
            async move { manager.connect(&cid("injected")).await }
        });
        while !manager.current_state().is_connecting() {
            tokio::task::yield_now().await;
        }

        // Same id: idempotent re-entry is rejected, not queued
        let err = manager.connect(&cid("injected")).await.unwrap_err();
        assert!(matches!(err, SessionError::AlreadyConnecting(id) if id == cid("injected")));
        assert!(manager.current_state().is_connecting());

        gate.notify_one();
        let address = pending.await.unwrap().unwrap();
        assert_eq!(address.as_str(), "0xabc");
        assert_eq!(connector.connect_calls(), 1, "guard must not dispatch twice");
    }

    #[tokio::test]
    async fn test_connect_while_connected_requires_disconnect_first() {
        let manager = manager_with(vec![
            MockConnector::ok("injected", "0xabc"),
            MockConnector::ok("walletconnect", "0xdef"),
        ]);

        manager.connect(&cid("injected")).await.unwrap();
        let err = manager.connect(&cid("walletconnect")).await.unwrap_err();
        assert!(matches!(err, SessionError::AlreadyConnected(id) if id == cid("injected")));
        assert!(manager.current_state().is_connected());
    }

    #[tokio::test]
    async fn test_user_rejection_lands_in_failed_and_retry_succeeds() {
        let connector = MockConnector::with_script(
            "injected",
            vec![Outcome::Rejected, Outcome::Ok("0xabc")],
        );
        let manager = manager_with(vec![Arc::clone(&connector)]);
        let seen = record(&manager);

        let err = manager.connect(&cid("injected")).await.unwrap_err();
        assert!(matches!(
            err,
            SessionError::Connector(ConnectError::UserRejected)
        ));
        match manager.current_state() {
            ConnectionState::Failed { connector_id, reason } => {
                assert_eq!(connector_id, cid("injected"));
                assert_eq!(reason.kind, FailureKind::UserRejected);
            }
            other => panic!("expected Failed, got {:?}", other),
        }

        // Failed is not terminal: a retry is legal and can succeed
        manager.connect(&cid("injected")).await.unwrap();
        assert!(manager.current_state().is_connected());

        let states: Vec<String> = seen.lock().iter().map(|s| s.to_string()).collect();
        assert_eq!(states, ["connecting", "failed", "connecting", "connected"]);
    }

    #[tokio::test]
    async fn test_panicking_connector_lands_in_failed() {
        let connector = MockConnector::with_script("injected", vec![Outcome::Panic]);
        let manager = manager_with(vec![connector]);

        let err = manager.connect(&cid("injected")).await.unwrap_err();
        assert!(matches!(err, SessionError::Connector(ConnectError::Provider(_))));
        match manager.current_state() {
            ConnectionState::Failed { reason, .. } => {
                assert_eq!(reason.kind, FailureKind::Provider);
            }
            other => panic!("expected Failed, got {:?}", other),
        }
    }

    // ------------------------------------------------------------------
    // disconnect()
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_disconnect_from_disconnected_is_silent_noop() {
        let manager = manager_with(vec![MockConnector::ok("injected", "0xabc")]);
        let seen = record(&manager);

        manager.disconnect().await;
        manager.disconnect().await;

        assert_eq!(manager.current_state(), ConnectionState::Disconnected);
        assert!(seen.lock().is_empty(), "no redundant notifications");
    }

    #[tokio::test]
    async fn test_disconnect_tears_down_connected_session() {
        let connector = MockConnector::ok("injected", "0xabc");
        let manager = manager_with(vec![Arc::clone(&connector)]);
        let seen = record(&manager);

        manager.connect(&cid("injected")).await.unwrap();
        manager.disconnect().await;

        assert_eq!(manager.current_state(), ConnectionState::Disconnected);
        assert_eq!(connector.disconnect_calls(), 1);
        assert_eq!(seen.lock().len(), 3);

        // Second disconnect: no extra notification, no extra teardown
        manager.disconnect().await;
        assert_eq!(seen.lock().len(), 3);
        assert_eq!(connector.disconnect_calls(), 1);
    }

    #[tokio::test]
    async fn test_disconnect_clears_failed_state() {
        let manager = manager_with(vec![MockConnector::rejecting("injected")]);

        let _ = manager.connect(&cid("injected")).await;
        assert!(matches!(
            manager.current_state(),
            ConnectionState::Failed { .. }
        ));

        manager.disconnect().await;
        assert_eq!(manager.current_state(), ConnectionState::Disconnected);
    }

    #[tokio::test]
    async fn test_disconnect_wins_over_pending_connect() {
        let (connector, gate) = MockConnector::gated("injected", "0xabc");
        let manager = Arc::new(manager_with(vec![Arc::clone(&connector)]));
        let seen = record(&manager);

        let pending = tokio::spawn({
            let manager = Arc::clone(&manager);
            async move { manager.connect(&cid("injected")).await }
        });
        while !manager.current_state().is_connecting() {
            tokio::task::yield_now().await;
        }

        manager.disconnect().await;
        assert_eq!(manager.current_state(), ConnectionState::Disconnected);

        // Release the pending connect; its success must be discarded
        gate.notify_one();
        let err = pending.await.unwrap().unwrap_err();
        assert!(matches!(err, SessionError::AttemptSuperseded));
        assert_eq!(manager.current_state(), ConnectionState::Disconnected);

        let states: Vec<String> = seen.lock().iter().map(|s| s.to_string()).collect();
        assert_eq!(
            states,
            ["connecting", "disconnected"],
            "a stale success must never surface as Connected"
        );
    }

    // ------------------------------------------------------------------
    // subscribe()
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_multiple_subscribers_observe_independently() {
        let manager = manager_with(vec![MockConnector::ok("injected", "0xabc")]);
        let first = record(&manager);
        let second = record(&manager);

        manager.connect(&cid("injected")).await.unwrap();

        assert_eq!(first.lock().len(), 2);
        assert_eq!(second.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_unsubscribe_stops_notifications_and_is_idempotent() {
        let manager = manager_with(vec![MockConnector::with_script(
            "injected",
            vec![Outcome::Ok("0xabc"), Outcome::Ok("0xdef")],
        )]);

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let subscription = manager.subscribe(move |state| sink.lock().push(state.clone()));

        manager.connect(&cid("injected")).await.unwrap();
        assert_eq!(seen.lock().len(), 2);

        subscription.unsubscribe();
        subscription.unsubscribe();

        manager.disconnect().await;
        manager.connect(&cid("injected")).await.unwrap();
        assert_eq!(seen.lock().len(), 2, "detached listener saw no further states");
    }

    #[tokio::test]
    async fn test_unsubscribe_during_notification_is_safe() {
        let manager = manager_with(vec![MockConnector::ok("injected", "0xabc")]);

        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let seen = Arc::new(Mutex::new(0usize));
        let (slot_ref, seen_ref) = (Arc::clone(&slot), Arc::clone(&seen));
        let subscription = manager.subscribe(move |_| {
            *seen_ref.lock() += 1;
            // Detach ourselves from inside the callback
            if let Some(subscription) = slot_ref.lock().take() {
                subscription.unsubscribe();
            }
        });
        *slot.lock() = Some(subscription);

        manager.connect(&cid("injected")).await.unwrap();
        assert_eq!(*seen.lock(), 1, "listener detached after its first snapshot");
    }
}
