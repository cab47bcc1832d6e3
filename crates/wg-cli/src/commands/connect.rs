//! Connect command implementation
//!
//! This is the UI binding layer in terminal form: it subscribes before
//! issuing the connect intent so every transition is rendered, holds the
//! session until Ctrl-C, then disconnects.

use std::sync::Arc;

use anyhow::{bail, Result};

use wg_connectors::default_registry;
use wg_core::config::GateConfig;
use wg_core::types::ConnectorId;
use wg_session::SessionManager;

use crate::output::{format_state, print_error, print_info, print_success};

/// Execute the connect command
pub async fn connect_command(config: &GateConfig, connector: Option<&str>) -> Result<()> {
    let registry = Arc::new(default_registry(config)?);
    let manager = SessionManager::new(registry);

    let target = match connector {
        Some(id) => ConnectorId::new(id),
        None => first_available(&manager)?,
    };

    let subscription = manager.subscribe(|state| println!("  {}", format_state(state)));

    match manager.connect(&target).await {
        Ok(address) => {
            print_success(&format!("Connected: {}", address));
            print_info("Press Ctrl-C to disconnect");

            tokio::signal::ctrl_c().await?;
            manager.disconnect().await;
            subscription.unsubscribe();
            Ok(())
        }
        Err(e) => {
            subscription.unsubscribe();
            print_error(&format!("Connection failed: {}", e));
            Err(e.into())
        }
    }
}

/// Pick the first connector the environment supports
fn first_available(manager: &SessionManager) -> Result<ConnectorId> {
    let Some(info) = manager.connectors().into_iter().find(|c| c.available) else {
        bail!(
            "No connector is available in this environment. \
             Run 'walletgate status' to see what is missing."
        );
    };
    Ok(ConnectorId::new(info.id))
}
