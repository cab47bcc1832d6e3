//! Core domain types

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique, stable identifier for a wallet connector
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConnectorId(pub String);

impl ConnectorId {
    /// Create a new connector ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConnectorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for ConnectorId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for ConnectorId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Normalized account address produced by a successful connect
///
/// Guaranteed non-empty by construction. Hex-style `0x…` addresses are
/// lowercased so the same account always compares equal regardless of the
/// checksum casing a provider happens to return.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Normalize and validate a raw account identifier
    ///
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        let normalized = if trimmed.starts_with("0x") || trimmed.starts_with("0X") {
            trimmed.to_lowercase()
        } else {
            trimmed.to_string()
        };
        Some(Self(normalized))
    }

    /// Get the full address string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Elided form for display (`0x1234...7890`)
    pub fn short(&self) -> String {
        const PREFIX: usize = 6;
        const SUFFIX: usize = 4;
        let s = &self.0;
        // Non-hex identifiers may not split cleanly on byte offsets
        if s.len() <= PREFIX + SUFFIX + 3
            || !s.is_char_boundary(PREFIX)
            || !s.is_char_boundary(s.len() - SUFFIX)
        {
            return s.clone();
        }
        format!("{}...{}", &s[..PREFIX], &s[s.len() - SUFFIX..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Connector descriptor snapshot for consumers
///
/// Produced by the registry; `available` reflects the environment probe at
/// the time of the snapshot. Consumers should disable (not hide) entries
/// with `available == false`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectorInfo {
    pub id: String,
    pub display_name: String,
    pub available: bool,
}
