//! Connector registry

use std::sync::Arc;

use wg_core::error::{RegistryError, SessionError};
use wg_core::types::{ConnectorId, ConnectorInfo};
use wg_core::Connector;

/// Fixed, ordered list of available wallet connectors
///
/// Built once at application start from static configuration; display order
/// is registration order and never changes during a session. Availability
/// is probed per snapshot, so an entry can flip between usable and disabled
/// without the list itself changing.
pub struct ConnectorRegistry {
    connectors: Vec<Arc<dyn Connector>>,
}

impl ConnectorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            connectors: Vec::new(),
        }
    }

    /// Register a connector at the end of the display order
    ///
    /// Ids must be unique; re-registering an id is rejected rather than
    /// silently replacing the earlier connector.
    pub fn register(&mut self, connector: Arc<dyn Connector>) -> Result<(), RegistryError> {
        if self.get(connector.id()).is_some() {
            return Err(RegistryError::AlreadyRegistered(connector.id().clone()));
        }
        tracing::debug!(connector = %connector.id(), "connector registered");
        self.connectors.push(connector);
        Ok(())
    }

    /// Snapshot of all connectors in registration order
    pub fn list(&self) -> Vec<ConnectorInfo> {
        self.connectors
            .iter()
            .map(|c| ConnectorInfo {
                id: c.id().to_string(),
                display_name: c.display_name().to_string(),
                available: c.is_available(),
            })
            .collect()
    }

    /// Look up a connector by id
    pub fn get(&self, id: &ConnectorId) -> Option<Arc<dyn Connector>> {
        self.connectors
            .iter()
            .find(|c| c.id() == id)
            .map(Arc::clone)
    }

    /// Look up a connector by id, failing with `ConnectorNotFound`
    pub fn find(&self, id: &ConnectorId) -> Result<Arc<dyn Connector>, SessionError> {
        self.get(id)
            .ok_or_else(|| SessionError::ConnectorNotFound(id.clone()))
    }

    /// Number of registered connectors
    pub fn len(&self) -> usize {
        self.connectors.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.connectors.is_empty()
    }
}

impl Default for ConnectorRegistry {
    fn default() -> Self {
        Self::new()
    }
}
