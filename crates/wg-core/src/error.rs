//! Core error types for walletgate

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

use crate::types::ConnectorId;

/// Top-level error type for the walletgate ecosystem
#[derive(Error, Debug)]
pub enum WgError {
    /// Registry error
    #[error("Registry error: {0}")]
    Registry(#[from] RegistryError),

    /// Session error
    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    /// Connector error
    #[error("Connector error: {0}")]
    Connect(#[from] ConnectError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Registry-related errors
#[derive(Error, Debug)]
pub enum RegistryError {
    /// A connector with this id is already registered
    #[error("Connector already registered: {0}")]
    AlreadyRegistered(ConnectorId),
}

/// Session manager errors
#[derive(Error, Debug)]
pub enum SessionError {
    /// Requested connector id is not in the registry
    #[error("Connector not found: {0}")]
    ConnectorNotFound(ConnectorId),

    /// A connect attempt is already in flight
    #[error("Already connecting via {0}")]
    AlreadyConnecting(ConnectorId),

    /// A session is already established; disconnect first
    #[error("Already connected via {0}")]
    AlreadyConnected(ConnectorId),

    /// Connector is not usable in this environment
    #[error("Connector unavailable: {0}")]
    ConnectorUnavailable(ConnectorId),

    /// The attempt was superseded by a disconnect while it was in flight
    #[error("Connect attempt superseded by a disconnect")]
    AttemptSuperseded,

    /// The connector's connect operation failed
    #[error("Connect failed: {0}")]
    Connector(#[from] ConnectError),
}

/// Errors raised by a connector's connect operation
#[derive(Error, Debug)]
pub enum ConnectError {
    /// The user declined the request in their wallet UI
    #[error("Connection request rejected by user")]
    UserRejected,

    /// The connector cannot run in this environment
    #[error("Connector is not available in this environment")]
    Unavailable,

    /// The provider did not answer in time
    #[error("Connection attempt timed out after {0:?}")]
    Timeout(Duration),

    /// Any other provider failure; the raw error is retained
    #[error("Provider error: {0}")]
    Provider(#[source] anyhow::Error),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Config file not found
    #[error("Config file not found: {0}")]
    NotFound(PathBuf),

    /// Invalid configuration
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// TOML parse error
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// TOML serialize error
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(String),
}
