//! Authentication endpoint client

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use wg_core::config::AuthConfig;

use crate::token::AuthToken;

/// Errors from the login call
#[derive(Error, Debug)]
pub enum AuthError {
    /// The endpoint rejected the credentials
    #[error("Login rejected: {message}")]
    InvalidCredentials { message: String },

    /// Transport-level failure reaching the endpoint
    #[error("Authentication endpoint error: {0}")]
    Endpoint(#[from] reqwest::Error),

    /// The endpoint answered with something other than a login response
    #[error("Malformed response from authentication endpoint")]
    Malformed,
}

/// Login form credentials
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Response payload from the login endpoint
#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    message: String,
    #[serde(default)]
    token: Option<String>,
}

/// Client for the email/password authentication endpoint
pub struct AuthClient {
    endpoint: String,
    request_timeout: std::time::Duration,
    http: reqwest::Client,
}

impl AuthClient {
    /// Create a client from configuration
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            endpoint: config.endpoint.clone(),
            request_timeout: config.request_timeout,
            http: reqwest::Client::new(),
        }
    }

    /// Post credentials and return the opaque token on success
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthToken, AuthError> {
        tracing::debug!(endpoint = %self.endpoint, email = %credentials.email, "login attempt");

        let response = self
            .http
            .post(&self.endpoint)
            .json(credentials)
            .timeout(self.request_timeout)
            .send()
            .await?;

        let status_ok = response.status().is_success();
        let body: LoginResponse = response.json().await.map_err(|_| AuthError::Malformed)?;
        evaluate(status_ok, body)
    }
}

/// Decide the login outcome from status and body
///
/// The endpoint may answer 200 with only a message on bad credentials, so
/// the presence of a token is the real success signal.
fn evaluate(status_ok: bool, body: LoginResponse) -> Result<AuthToken, AuthError> {
    match body.token {
        Some(token) if status_ok && !token.is_empty() => Ok(AuthToken::new(token)),
        _ => Err(AuthError::InvalidCredentials {
            message: if body.message.is_empty() {
                "login failed".to_string()
            } else {
                body.message
            },
        }),
    }
}
