// Authentication: identity provider client, session context and metadata seed.
// The session context is owned per client session; there is no global auth state.

pub mod client;
pub mod handlers;
pub mod session;

use thiserror::Error;

pub use client::{IdentityProvider, SupabaseAuth};
pub use session::{Principal, SessionContext};

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authentication service is not configured")]
    NotConfigured,

    #[error("Session token was rejected")]
    InvalidSession,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Auth API error (status {status}): {message}")]
    Api { status: u16, message: String },
}
