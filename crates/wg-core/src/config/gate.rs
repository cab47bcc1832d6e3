//! Application configuration

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::serde_utils::duration_secs;

/// Environment variable consulted when no injected provider URL is configured
pub const INJECTED_URL_ENV: &str = "WALLETGATE_INJECTED_URL";

/// Top-level configuration for walletgate
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GateConfig {
    /// Injected provider connector
    pub injected: InjectedConfig,

    /// WalletConnect relay connector
    pub walletconnect: WalletConnectConfig,

    /// Email/password authentication endpoint
    pub auth: AuthConfig,
}

/// Configuration for the injected provider connector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InjectedConfig {
    /// JSON-RPC endpoint of the host-injected provider.
    ///
    /// When unset, the `WALLETGATE_INJECTED_URL` environment variable is
    /// consulted; the connector reports unavailable if neither is present.
    pub provider_url: Option<String>,

    /// Timeout for the account request
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for InjectedConfig {
    fn default() -> Self {
        Self {
            provider_url: None,
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl InjectedConfig {
    /// Resolve the provider URL, falling back to the environment
    pub fn resolved_provider_url(&self) -> Option<String> {
        self.provider_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .map(String::from)
            .or_else(|| {
                std::env::var(INJECTED_URL_ENV)
                    .ok()
                    .filter(|url| !url.trim().is_empty())
            })
    }
}

/// Configuration for the WalletConnect relay connector
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConnectConfig {
    /// Project identifier issued by the relay operator.
    ///
    /// The connector reports unavailable until this is set.
    pub project_id: Option<String>,

    /// Relay base URL
    pub relay_url: String,

    /// How long to wait for the user to approve the pairing
    #[serde(with = "duration_secs")]
    pub pairing_timeout: Duration,

    /// Backoff between pairing status polls
    pub poll: BackoffConfig,
}

impl Default for WalletConnectConfig {
    fn default() -> Self {
        Self {
            project_id: None,
            relay_url: "https://relay.walletconnect.org".to_string(),
            pairing_timeout: Duration::from_secs(300),
            poll: BackoffConfig::default(),
        }
    }
}

/// Backoff configuration for pairing status polls
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BackoffConfig {
    /// Initial delay
    #[serde(with = "duration_secs")]
    pub initial: Duration,

    /// Maximum delay
    #[serde(with = "duration_secs")]
    pub max: Duration,

    /// Multiplier for each poll
    pub multiplier: f64,

    /// Jitter factor (0.0 to 1.0)
    pub jitter: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            initial: Duration::from_secs(2),
            max: Duration::from_secs(10),
            multiplier: 1.5,
            jitter: 0.25,
        }
    }
}

/// Configuration for the authentication endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Login endpoint accepting `{ email, password }`
    pub endpoint: String,

    /// Timeout for the login request
    #[serde(with = "duration_secs")]
    pub request_timeout: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:5001/login".to_string(),
            request_timeout: Duration::from_secs(15),
        }
    }
}
