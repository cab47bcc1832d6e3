//! Opaque authentication token

use std::fmt;

/// Token returned by the authentication endpoint
///
/// Opaque to this application: it is held in memory for the lifetime of
/// the session and attached to requests by whoever owns one. The `Debug`
/// impl is redacted so tokens never leak into logs.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(String);

impl AuthToken {
    /// Wrap a raw token string
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Access the raw token for request headers
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AuthToken(***)")
    }
}
