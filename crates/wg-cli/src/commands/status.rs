//! Status command implementation

use std::path::PathBuf;

use anyhow::Result;

use wg_connectors::default_registry;
use wg_core::config::{self, GateConfig};

use crate::output::format_connectors;

/// Execute the status command
pub fn status_command(config_path: Option<&PathBuf>, config: &GateConfig) -> Result<()> {
    let path = config_path
        .cloned()
        .unwrap_or_else(config::default_config_path);
    let registry = default_registry(config)?;

    println!(
        "Configuration: {} ({})",
        path.display(),
        if path.exists() { "loaded" } else { "defaults" }
    );
    println!("Auth endpoint: {}", config.auth.endpoint);
    println!("Relay: {}", config.walletconnect.relay_url);
    println!();
    println!("{}", format_connectors(&registry.list()));

    Ok(())
}
