//! wg-connectors: Wallet connector implementations
//!
//! Each connector adapts one provider technology to the [`Connector`]
//! contract: the environment-injected JSON-RPC provider and the
//! WalletConnect-style relay. The connectors own their wire details; the
//! session manager only sees the contract.

pub mod backoff;
pub mod injected;
pub mod walletconnect;

pub use backoff::PollBackoff;
pub use injected::InjectedConnector;
pub use walletconnect::WalletConnectConnector;

use std::sync::Arc;

use wg_core::config::GateConfig;
use wg_core::error::RegistryError;
use wg_core::Connector;
use wg_session::ConnectorRegistry;

/// Build the standard connector registry from configuration
///
/// Registration order is display order: injected provider first, then
/// WalletConnect. Connectors that cannot run in this environment are still
/// registered; they report unavailable and consumers disable them.
pub fn default_registry(config: &GateConfig) -> Result<ConnectorRegistry, RegistryError> {
    let mut registry = ConnectorRegistry::new();
    registry.register(Arc::new(InjectedConnector::new(&config.injected)) as Arc<dyn Connector>)?;
    registry.register(
        Arc::new(WalletConnectConnector::new(&config.walletconnect)) as Arc<dyn Connector>,
    )?;
    Ok(registry)
}
