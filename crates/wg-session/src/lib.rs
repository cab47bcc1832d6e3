//! wg-session: Connector registry and connection session manager
//!
//! This crate owns the single source of truth for wallet connection state.
//! Consumers issue connect/disconnect intents to the [`SessionManager`],
//! which dispatches to a connector from the [`ConnectorRegistry`], guards
//! against overlapping attempts, and publishes state snapshots to
//! subscribers.

pub mod manager;
pub mod registry;
pub mod subscription;

pub use manager::SessionManager;
pub use registry::ConnectorRegistry;
pub use subscription::Subscription;
