//! Login command implementation

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use wg_auth::{AuthClient, AuthError, Credentials};
use wg_core::config::GateConfig;

use crate::output::{print_error, print_success};

/// Execute the login command
pub async fn login_command(config: &GateConfig, email: &str) -> Result<()> {
    let password = prompt_password().context("Failed to read password")?;

    let client = AuthClient::new(&config.auth);
    match client.login(&Credentials::new(email, password)).await {
        Ok(_token) => {
            // The token stays in memory for the lifetime of the session;
            // nothing is written to disk.
            print_success("Login successful");
            Ok(())
        }
        Err(e @ AuthError::InvalidCredentials { .. }) => {
            print_error(&e.to_string());
            Err(e.into())
        }
        Err(e) => {
            print_error(&format!("Login failed: {}", e));
            Err(e.into())
        }
    }
}

/// Prompt for the password on stdin
fn prompt_password() -> io::Result<String> {
    print!("Password: ");
    io::stdout().flush()?;

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}
