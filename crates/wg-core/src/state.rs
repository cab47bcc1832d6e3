//! Connection session state

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::ConnectError;
use crate::types::{Address, ConnectorId};

/// Classification of a failed connect attempt
///
/// Stored in [`ConnectionState::Failed`] so state snapshots stay cheaply
/// cloneable. The live error (with its full source chain) is returned to
/// the caller that issued the attempt; `detail` keeps the rendered chain
/// for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub detail: String,
}

/// Error kind of a failed connect attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureKind {
    /// User declined in their wallet UI
    UserRejected,
    /// Connector cannot run in this environment
    Unavailable,
    /// Provider did not answer in time
    Timeout,
    /// Any other provider failure
    Provider,
}

impl From<&ConnectError> for FailureReason {
    fn from(err: &ConnectError) -> Self {
        let kind = match err {
            ConnectError::UserRejected => FailureKind::UserRejected,
            ConnectError::Unavailable => FailureKind::Unavailable,
            ConnectError::Timeout(_) => FailureKind::Timeout,
            ConnectError::Provider(_) => FailureKind::Provider,
        };
        // Render the whole chain so nothing is lost in the snapshot
        let detail = match err {
            ConnectError::Provider(source) => format!("{:#}", source),
            other => other.to_string(),
        };
        Self { kind, detail }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.detail)
    }
}

/// Current state of the wallet connection session
///
/// Exactly one variant is active at a time; the session manager owns the
/// value exclusively and hands out clones.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectionState {
    /// No session; the initial state, re-enterable indefinitely
    #[default]
    Disconnected,
    /// A connect attempt is in flight for this connector
    Connecting { connector_id: ConnectorId },
    /// A session is established
    Connected {
        connector_id: ConnectorId,
        address: Address,
    },
    /// The last attempt for this connector failed; not terminal
    Failed {
        connector_id: ConnectorId,
        reason: FailureReason,
    },
}

impl ConnectionState {
    /// Check whether a session is established
    pub fn is_connected(&self) -> bool {
        matches!(self, ConnectionState::Connected { .. })
    }

    /// Check whether an attempt is in flight
    pub fn is_connecting(&self) -> bool {
        matches!(self, ConnectionState::Connecting { .. })
    }

    /// Connector associated with the current state, if any
    pub fn connector_id(&self) -> Option<&ConnectorId> {
        match self {
            ConnectionState::Disconnected => None,
            ConnectionState::Connecting { connector_id }
            | ConnectionState::Connected { connector_id, .. }
            | ConnectionState::Failed { connector_id, .. } => Some(connector_id),
        }
    }

    /// Address of the established session, if any
    pub fn address(&self) -> Option<&Address> {
        match self {
            ConnectionState::Connected { address, .. } => Some(address),
            _ => None,
        }
    }
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectionState::Disconnected => write!(f, "disconnected"),
            ConnectionState::Connecting { .. } => write!(f, "connecting"),
            ConnectionState::Connected { .. } => write!(f, "connected"),
            ConnectionState::Failed { .. } => write!(f, "failed"),
        }
    }
}
