//! Bearer token verification and password hashing.
//!
//! Credentials are issued by an external identity provider; this service only
//! checks them. Two verifiers exist:
//!
//! - [`IdentityToolkitVerifier`] - resolves an ID token through the identity
//!   toolkit `accounts:lookup` REST endpoint
//! - [`StaticTokenVerifier`] - fixed token table for tests and local development

mod error;
mod password;

pub use error::AuthError;
pub use password::{Argon2Hasher, PasswordHasher};

use std::collections::HashMap;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use url::Url;

/// Identity attached to a verified bearer token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerifiedIdentity {
    /// Subject id at the identity provider.
    pub uid: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

/// Validates a bearer token and yields the caller's identity.
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Verify `token`.
    ///
    /// Returns `AuthError::InvalidToken` if the provider rejects the token.
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError>;
}

// =============================================================================
// Identity Toolkit
// =============================================================================

/// Verifier backed by the identity toolkit REST API.
pub struct IdentityToolkitVerifier {
    client: reqwest::Client,
    lookup_url: Url,
}

impl std::fmt::Debug for IdentityToolkitVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdentityToolkitVerifier")
            .field("lookup_url", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LookupRequest<'a> {
    id_token: &'a str,
}

#[derive(Deserialize)]
struct LookupResponse {
    #[serde(default)]
    users: Vec<LookupUser>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LookupUser {
    local_id: String,
    email: Option<String>,
    display_name: Option<String>,
}

impl IdentityToolkitVerifier {
    /// Create a verifier for the given API base URL and web API key.
    #[must_use]
    pub fn new(client: reqwest::Client, base_url: &Url, api_key: &SecretString) -> Self {
        let mut lookup_url = base_url.clone();
        let path = format!("{}/accounts:lookup", base_url.path().trim_end_matches('/'));
        lookup_url.set_path(&path);
        lookup_url
            .query_pairs_mut()
            .clear()
            .append_pair("key", api_key.expose_secret());

        Self { client, lookup_url }
    }
}

#[async_trait]
impl TokenVerifier for IdentityToolkitVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        let response = self
            .client
            .post(self.lookup_url.clone())
            .json(&LookupRequest { id_token: token })
            .send()
            .await?;

        let status = response.status();
        // The provider answers 400 for malformed, expired, and revoked tokens.
        if status == reqwest::StatusCode::BAD_REQUEST {
            return Err(AuthError::InvalidToken);
        }
        if !status.is_success() {
            return Err(AuthError::ProviderStatus(status.as_u16()));
        }

        let body: LookupResponse = response.json().await?;
        let user = body.users.into_iter().next().ok_or(AuthError::InvalidToken)?;

        Ok(VerifiedIdentity {
            uid: user.local_id,
            email: user.email,
            name: user.display_name,
        })
    }
}

// =============================================================================
// Static tokens
// =============================================================================

/// Verifier with a fixed token table.
#[derive(Default, Clone)]
pub struct StaticTokenVerifier {
    tokens: HashMap<String, VerifiedIdentity>,
}

impl std::fmt::Debug for StaticTokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StaticTokenVerifier")
            .field("tokens", &self.tokens.len())
            .finish()
    }
}

impl StaticTokenVerifier {
    /// Create an empty verifier that rejects every token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accept `token` as the given identity.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>, identity: VerifiedIdentity) -> Self {
        self.tokens.insert(token.into(), identity);
        self
    }

    /// Parse a table of the form `token=uid:email,token2=uid2:email2`.
    ///
    /// The email part is optional (`token=uid`).
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidStaticToken` for an entry without a token or uid.
    pub fn parse(table: &str) -> Result<Self, AuthError> {
        let mut verifier = Self::new();

        for entry in table.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (token, subject) = entry
                .split_once('=')
                .ok_or_else(|| AuthError::InvalidStaticToken(redact_entry(entry)))?;
            let (uid, email) = match subject.split_once(':') {
                Some((uid, email)) => (uid.trim(), Some(email.trim())),
                None => (subject.trim(), None),
            };

            let token = token.trim();
            if token.is_empty() || uid.is_empty() {
                return Err(AuthError::InvalidStaticToken(redact_entry(entry)));
            }

            verifier.tokens.insert(
                token.to_owned(),
                VerifiedIdentity {
                    uid: uid.to_owned(),
                    email: email.filter(|e| !e.is_empty()).map(str::to_owned),
                    name: None,
                },
            );
        }

        Ok(verifier)
    }
}

/// Drop the token part of a static entry before it reaches an error message.
fn redact_entry(entry: &str) -> String {
    entry
        .split_once('=')
        .map_or_else(|| "[REDACTED]".to_owned(), |(_, subject)| format!("[REDACTED]={subject}"))
}

#[async_trait]
impl TokenVerifier for StaticTokenVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, AuthError> {
        self.tokens.get(token).cloned().ok_or(AuthError::InvalidToken)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_verifier_parse() {
        let verifier = StaticTokenVerifier::parse("t1=u1:a@x.com, t2=u2").unwrap();

        let first = verifier.verify("t1").await.unwrap();
        assert_eq!(first.uid, "u1");
        assert_eq!(first.email.as_deref(), Some("a@x.com"));

        let second = verifier.verify("t2").await.unwrap();
        assert_eq!(second.uid, "u2");
        assert_eq!(second.email, None);

        assert!(matches!(
            verifier.verify("nope").await,
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_static_verifier_rejects_bad_entries() {
        assert!(StaticTokenVerifier::parse("no-equals").is_err());
        assert!(StaticTokenVerifier::parse("=u1").is_err());
        assert!(StaticTokenVerifier::parse("t1=").is_err());
    }

    #[test]
    fn test_static_verifier_errors_hide_tokens() {
        let Err(err) = StaticTokenVerifier::parse("supersecret=") else {
            panic!("expected error")
        };
        assert!(!err.to_string().contains("supersecret"));
    }

    #[test]
    fn test_lookup_url() {
        let base = Url::parse("https://identitytoolkit.googleapis.com/v1").unwrap();
        let verifier = IdentityToolkitVerifier::new(
            reqwest::Client::new(),
            &base,
            &SecretString::from("k3y"),
        );
        assert_eq!(
            verifier.lookup_url.as_str(),
            "https://identitytoolkit.googleapis.com/v1/accounts:lookup?key=k3y"
        );
        assert!(!format!("{verifier:?}").contains("k3y"));
    }
}
