//! Authentication error types.

use thiserror::Error;

/// Errors that can occur during token verification or password hashing.
#[derive(Debug, Error)]
pub enum AuthError {
    /// The token was rejected by the identity provider.
    #[error("invalid or expired token")]
    InvalidToken,

    /// The identity provider could not be reached or returned garbage.
    #[error("identity provider request failed: {0}")]
    Provider(#[from] reqwest::Error),

    /// The identity provider answered with an unexpected status.
    #[error("identity provider returned status {0}")]
    ProviderStatus(u16),

    /// A static token entry could not be parsed.
    #[error("invalid static token entry: {0}")]
    InvalidStaticToken(String),

    /// Neither an API key nor static tokens are configured.
    #[error("no token verifier configured")]
    NotConfigured,

    /// Password hashing failed.
    #[error("password hashing failed")]
    PasswordHash,
}
