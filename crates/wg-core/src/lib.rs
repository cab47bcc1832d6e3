//! wg-core: Core abstractions and configuration for walletgate
//!
//! This crate provides the shared types, the connector contract, and the
//! configuration structures used by the session manager, the connector
//! implementations, and the CLI.

pub mod config;
pub mod error;
pub mod state;
pub mod traits;
pub mod types;

pub use error::WgError;
pub use state::ConnectionState;
pub use traits::Connector;
pub use types::{Address, ConnectorId, ConnectorInfo};
