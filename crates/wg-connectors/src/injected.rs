//! Environment-injected provider connector
//!
//! Adapter for a wallet provider the host environment exposes as a JSON-RPC
//! endpoint (the `window.ethereum` analog outside a browser). The connect
//! handshake is a single `eth_requestAccounts` call; everything past that
//! request belongs to the provider.

use anyhow::anyhow;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

use wg_core::config::InjectedConfig;
use wg_core::error::ConnectError;
use wg_core::types::{Address, ConnectorId};
use wg_core::Connector;

/// EIP-1193: the user rejected the request
const USER_REJECTED_CODE: i64 = 4001;

/// Connector for a host-injected wallet provider
pub struct InjectedConnector {
    id: ConnectorId,
    display_name: String,
    config: InjectedConfig,
    http: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct RpcResponse {
    #[serde(default)]
    result: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<RpcError>,
}

#[derive(Debug, Deserialize)]
struct RpcError {
    code: i64,
    message: String,
}

impl InjectedConnector {
    /// Create the connector from configuration
    pub fn new(config: &InjectedConfig) -> Self {
        Self {
            id: ConnectorId::new("injected"),
            display_name: "Injected".to_string(),
            config: config.clone(),
            http: reqwest::Client::new(),
        }
    }

    async fn rpc_call(
        &self,
        url: &str,
        method: &str,
        params: serde_json::Value,
    ) -> Result<RpcResponse, ConnectError> {
        let body = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": method,
            "params": params,
        });

        let response = self
            .http
            .post(url)
            .json(&body)
            .timeout(self.config.request_timeout)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ConnectError::Timeout(self.config.request_timeout)
                } else {
                    ConnectError::Provider(
                        anyhow::Error::new(e).context(format!("provider request to {} failed", url)),
                    )
                }
            })?;

        response
            .json::<RpcResponse>()
            .await
            .map_err(|e| {
                ConnectError::Provider(anyhow::Error::new(e).context("malformed provider response"))
            })
    }
}

/// Classify a JSON-RPC error from the provider
fn classify_rpc_error(code: i64, message: &str) -> ConnectError {
    if code == USER_REJECTED_CODE {
        ConnectError::UserRejected
    } else {
        ConnectError::Provider(anyhow!("provider error {}: {}", code, message))
    }
}

/// Extract the first account from an `eth_requestAccounts` result
fn first_account(result: &serde_json::Value) -> Option<Address> {
    result
        .as_array()?
        .first()?
        .as_str()
        .and_then(Address::new)
}

#[async_trait]
impl Connector for InjectedConnector {
    fn id(&self) -> &ConnectorId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn is_available(&self) -> bool {
        self.config.resolved_provider_url().is_some()
    }

    async fn connect(&self) -> Result<Address, ConnectError> {
        let url = self
            .config
            .resolved_provider_url()
            .ok_or(ConnectError::Unavailable)?;

        tracing::debug!(url = %url, "requesting accounts from injected provider");
        let response = self.rpc_call(&url, "eth_requestAccounts", json!([])).await?;

        if let Some(error) = response.error {
            return Err(classify_rpc_error(error.code, &error.message));
        }

        response
            .result
            .as_ref()
            .and_then(first_account)
            .ok_or_else(|| ConnectError::Provider(anyhow!("provider returned no accounts")))
    }

    async fn disconnect(&self) {
        let Some(url) = self.config.resolved_provider_url() else {
            return;
        };

        // Revoking the account permission is a courtesy; a provider that
        // does not support it just leaves the permission in place.
        match self
            .rpc_call(&url, "wallet_revokePermissions", json!([{ "eth_accounts": {} }]))
            .await
        {
            Ok(_) => tracing::debug!("provider permissions revoked"),
            Err(e) => tracing::debug!("permission revoke ignored: {}", e),
        }
    }
}
