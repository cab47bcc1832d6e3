//! wg-auth: Email/password authentication adapter
//!
//! Posts credentials to the configured authentication endpoint and holds
//! the opaque token it returns. Completely independent of wallet session
//! state; the two identities never interact.

mod client;
mod token;

pub use client::{AuthClient, AuthError, Credentials};
pub use token::AuthToken;
