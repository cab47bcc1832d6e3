//! The connector contract

use async_trait::async_trait;

use crate::error::ConnectError;
use crate::types::{Address, ConnectorId};

/// Abstraction over one wallet/provider integration
///
/// A connector owns its wire protocol end to end; the session manager only
/// sees this contract. Implementations must be cheap to probe: the
/// availability check may inspect the host environment but must not block
/// or fail.
#[async_trait]
pub trait Connector: Send + Sync {
    /// Unique, stable identifier for this connector
    fn id(&self) -> &ConnectorId;

    /// Human-readable name for display
    fn display_name(&self) -> &str;

    /// Whether this connector can run in the current environment
    ///
    /// An unavailable connector stays listed; consumers disable it.
    fn is_available(&self) -> bool;

    /// Establish a session and return the authenticated account address
    async fn connect(&self) -> Result<Address, ConnectError>;

    /// Tear down any provider-side session state
    ///
    /// Best-effort: implementations swallow and log their own failures.
    async fn disconnect(&self);
}
