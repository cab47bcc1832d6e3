//! WalletConnect relay connector
//!
//! Adapter for a WalletConnect-compatible relay. The connector creates a
//! pairing on the relay, surfaces the pairing URI for the user's mobile
//! wallet, and polls the pairing status until it is approved, rejected, or
//! expired. The relay protocol itself lives behind the relay's HTTP
//! surface; this connector only speaks to that boundary.

use std::time::Duration;

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use wg_core::config::WalletConnectConfig;
use wg_core::error::ConnectError;
use wg_core::types::{Address, ConnectorId};
use wg_core::Connector;

use crate::backoff::PollBackoff;

/// Connector for WalletConnect-compatible mobile wallets
pub struct WalletConnectConnector {
    id: ConnectorId,
    display_name: String,
    config: WalletConnectConfig,
    http: reqwest::Client,
    /// Topic of the approved pairing, kept for teardown
    active_topic: Mutex<Option<String>>,
}

#[derive(Debug, Serialize)]
struct PairingRequest<'a> {
    topic: &'a str,
    project_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct PairingCreated {
    uri: String,
}

/// Pairing status reported by the relay
#[derive(Debug, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
enum PairingStatus {
    Pending,
    Approved { accounts: Vec<String> },
    Rejected,
    Expired,
}

impl WalletConnectConnector {
    /// Create the connector from configuration
    pub fn new(config: &WalletConnectConfig) -> Self {
        Self {
            id: ConnectorId::new("walletconnect"),
            display_name: "WalletConnect".to_string(),
            config: config.clone(),
            http: reqwest::Client::new(),
            active_topic: Mutex::new(None),
        }
    }

    fn pairing_url(&self, topic: Option<&str>) -> String {
        let base = self.config.relay_url.trim_end_matches('/');
        match topic {
            Some(topic) => format!("{}/pairing/{}", base, topic),
            None => format!("{}/pairing", base),
        }
    }

    async fn create_pairing(
        &self,
        topic: &str,
        project_id: &str,
    ) -> Result<PairingCreated, ConnectError> {
        self.http
            .post(self.pairing_url(None))
            .json(&PairingRequest { topic, project_id })
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| ConnectError::Provider(anyhow::Error::new(e).context("pairing request failed")))?
            .json::<PairingCreated>()
            .await
            .map_err(|e| ConnectError::Provider(anyhow::Error::new(e).context("malformed relay response")))
    }

    async fn poll_status(&self, topic: &str) -> Result<PairingStatus, anyhow::Error> {
        self.http
            .get(self.pairing_url(Some(topic)))
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .context("pairing status poll failed")?
            .json::<PairingStatus>()
            .await
            .context("malformed pairing status")
    }

    /// Wait for the user to approve the pairing in their wallet
    async fn await_approval(&self, topic: &str) -> Result<Address, ConnectError> {
        let deadline = tokio::time::Instant::now() + self.config.pairing_timeout;
        let mut backoff = PollBackoff::from_config(&self.config.poll);

        loop {
            let now = tokio::time::Instant::now();
            if now >= deadline {
                return Err(ConnectError::Timeout(self.config.pairing_timeout));
            }
            let delay = backoff.next_delay().min(deadline - now);
            tokio::time::sleep(delay).await;

            match self.poll_status(topic).await {
                Ok(PairingStatus::Pending) => continue,
                Ok(PairingStatus::Approved { accounts }) => {
                    return accounts
                        .first()
                        .and_then(|raw| caip_account_address(raw))
                        .ok_or_else(|| {
                            ConnectError::Provider(anyhow!("relay approved pairing with no accounts"))
                        });
                }
                Ok(PairingStatus::Rejected) => return Err(ConnectError::UserRejected),
                Ok(PairingStatus::Expired) => {
                    return Err(ConnectError::Timeout(self.config.pairing_timeout));
                }
                Err(e) => {
                    // Transient relay hiccups are retried until the deadline
                    tracing::debug!(topic = %topic, "pairing poll failed, retrying: {:#}", e);
                }
            }
        }
    }
}

/// Extract the bare address from a CAIP-10 account identifier
///
/// Relays report accounts as `eip155:1:0xabc…`; a bare address is passed
/// through untouched.
fn caip_account_address(raw: &str) -> Option<Address> {
    Address::new(raw.rsplit(':').next().unwrap_or(raw))
}

#[async_trait]
impl Connector for WalletConnectConnector {
    fn id(&self) -> &ConnectorId {
        &self.id
    }

    fn display_name(&self) -> &str {
        &self.display_name
    }

    fn is_available(&self) -> bool {
        self.config
            .project_id
            .as_deref()
            .map(|id| !id.trim().is_empty())
            .unwrap_or(false)
    }

    async fn connect(&self) -> Result<Address, ConnectError> {
        let project_id = self
            .config
            .project_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or(ConnectError::Unavailable)?;

        let topic = Uuid::new_v4().to_string();
        let created = self.create_pairing(&topic, project_id).await?;
        tracing::info!(topic = %topic, uri = %created.uri, "approve the connection in your wallet");

        let address = self.await_approval(&topic).await?;
        *self.active_topic.lock() = Some(topic);
        Ok(address)
    }

    async fn disconnect(&self) {
        let Some(topic) = self.active_topic.lock().take() else {
            return;
        };

        let result = self
            .http
            .delete(self.pairing_url(Some(&topic)))
            .send()
            .await
            .and_then(|r| r.error_for_status());
        match result {
            Ok(_) => tracing::debug!(topic = %topic, "pairing deleted"),
            Err(e) => tracing::debug!(topic = %topic, "pairing delete ignored: {}", e),
        }
    }
}
