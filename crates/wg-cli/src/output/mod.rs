//! Output formatting utilities for the CLI

use tabled::{
    settings::Style,
    Table, Tabled,
};

use wg_core::types::ConnectorInfo;
use wg_core::ConnectionState;

/// Format the connector list as an ASCII table
///
/// Unavailable connectors stay listed but are marked disabled, so the user
/// sees what exists in principle and what their environment supports.
pub fn format_connectors(connectors: &[ConnectorInfo]) -> String {
    if connectors.is_empty() {
        return "No connectors registered".to_string();
    }

    #[derive(Tabled)]
    struct ConnectorRow {
        #[tabled(rename = "ID")]
        id: String,
        #[tabled(rename = "NAME")]
        name: String,
        #[tabled(rename = "AVAILABLE")]
        available: String,
    }

    let rows: Vec<ConnectorRow> = connectors
        .iter()
        .map(|c| ConnectorRow {
            id: c.id.clone(),
            name: c.display_name.clone(),
            available: if c.available {
                "yes".to_string()
            } else {
                "no (disabled)".to_string()
            },
        })
        .collect();

    Table::new(rows).with(Style::rounded()).to_string()
}

/// Render a state snapshot as a single status line
pub fn format_state(state: &ConnectionState) -> String {
    match state {
        ConnectionState::Disconnected => "Disconnected".to_string(),
        ConnectionState::Connecting { connector_id } => {
            format!("Connecting via {}...", connector_id)
        }
        ConnectionState::Connected {
            connector_id,
            address,
        } => format!("Connected via {}: {}", connector_id, address.short()),
        ConnectionState::Failed {
            connector_id,
            reason,
        } => format!("Connection via {} failed: {}", connector_id, reason),
    }
}

/// Print a success message in green with a checkmark prefix
pub fn print_success(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Green),
        Print("✓ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an error message in red with an X prefix
pub fn print_error(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Red),
        Print("✗ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print a warning message in yellow with a warning symbol prefix
pub fn print_warning(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stderr = std::io::stderr();
    let _ = crossterm::execute!(
        stderr,
        SetForegroundColor(Color::Yellow),
        Print("⚠ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}

/// Print an informational message in cyan with an info symbol prefix
pub fn print_info(msg: &str) {
    use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};

    let mut stdout = std::io::stdout();
    let _ = crossterm::execute!(
        stdout,
        SetForegroundColor(Color::Cyan),
        Print("ℹ "),
        ResetColor,
        Print(msg),
        Print("\n")
    );
}
