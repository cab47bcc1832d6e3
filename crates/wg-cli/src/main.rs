//! walletgate CLI
//!
//! Terminal front end for the wallet connection stack:
//! - list wallet connectors and their availability
//! - connect a wallet, watch state transitions, disconnect on Ctrl-C
//! - log in with email/password against the configured endpoint
//! - manage configuration

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use walletgate::commands;
use wg_core::config::{self, GateConfig};

#[derive(Parser)]
#[command(name = "walletgate")]
#[command(author, version, about = "Wallet connection gateway for dapp front ends")]
#[command(propagate_version = true)]
struct Cli {
    /// Path to configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List wallet connectors and their availability
    /// Alias: ls
    #[command(alias = "ls")]
    Connectors,

    /// Connect a wallet and hold the session until Ctrl-C
    Connect {
        /// Connector id (defaults to the first available connector)
        connector: Option<String>,
    },

    /// Show configuration and connector availability
    Status,

    /// Log in with email and password
    Login {
        /// Account email address
        #[arg(short, long)]
        email: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Show current configuration
    Show,
    /// Get specific config value
    Get { key: String },
    /// Set config value
    Set { key: String, value: String },
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    let log_level = match (cli.quiet, cli.verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "info",
        (false, 2) => "debug",
        (false, _) => "trace",
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| log_level.into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    match cli.command {
        Commands::Connectors => {
            let config = load_effective_config(cli.config.as_ref())?;
            commands::connectors_command(&config)
        }

        Commands::Connect { connector } => {
            let config = load_effective_config(cli.config.as_ref())?;
            commands::connect_command(&config, connector.as_deref()).await
        }

        Commands::Status => {
            let config = load_effective_config(cli.config.as_ref())?;
            commands::status_command(cli.config.as_ref(), &config)
        }

        Commands::Login { email } => {
            let config = load_effective_config(cli.config.as_ref())?;
            commands::login_command(&config, &email).await
        }

        // Config management works on the file directly and must not
        // require it to exist yet
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config_show(cli.config.as_ref()),
            ConfigAction::Get { key } => commands::config_get(cli.config.as_ref(), &key),
            ConfigAction::Set { key, value } => {
                commands::config_set(cli.config.as_ref(), &key, &value)
            }
            ConfigAction::Path => {
                println!("{}", config::default_config_path().display());
                Ok(())
            }
        },
    }
}

/// Load configuration
///
/// An explicitly passed path must exist and parse; the default path is
/// optional and falls back to defaults when missing or unreadable.
fn load_effective_config(path: Option<&PathBuf>) -> Result<GateConfig> {
    match path {
        Some(path) => config::load_config(path)
            .with_context(|| format!("Failed to load config from {:?}", path)),
        None => {
            let default_path = config::default_config_path();
            if default_path.exists() {
                Ok(config::load_config(&default_path).unwrap_or_else(|e| {
                    tracing::warn!("Failed to load config from {:?}: {}", default_path, e);
                    GateConfig::default()
                }))
            } else {
                Ok(GateConfig::default())
            }
        }
    }
}
