//! Connectors command implementation

use anyhow::Result;

use wg_connectors::default_registry;
use wg_core::config::GateConfig;

use crate::output::format_connectors;

/// Execute the connectors command
pub fn connectors_command(config: &GateConfig) -> Result<()> {
    let registry = default_registry(config)?;

    println!("Wallet Connectors:");
    println!("{}", format_connectors(&registry.list()));

    Ok(())
}
