//! Authentication extractors for admin.
//!
//! Callers authenticate with `Authorization: Bearer <token>`. The token is
//! checked by the configured [`TokenVerifier`](crate::services::TokenVerifier);
//! admin routes additionally resolve the caller's user document and require
//! the `admin` role.

use axum::{
    Json,
    extract::{FromRef, FromRequestParts},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;

use optimile_core::User;

use crate::db::StoreError;
use crate::error::{AppError, set_sentry_user};
use crate::services::{AuthError, VerifiedIdentity};
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn handler(RequireAuth(identity): RequireAuth) -> impl IntoResponse {
///     format!("Hello, {}!", identity.uid)
/// }
/// ```
pub struct RequireAuth(pub VerifiedIdentity);

/// Extractor that requires a valid bearer token belonging to an admin user.
///
/// The caller's user document is found by the token's uid, falling back to
/// the token's email.
///
/// # Example
///
/// ```rust,ignore
/// async fn admin_handler(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse {
///     format!("Hello admin {}!", admin.id)
/// }
/// ```
pub struct RequireAdmin(pub User);

/// Error returned when a request fails authentication or authorization.
#[derive(Debug)]
pub enum AuthRejection {
    /// No bearer token on the request.
    MissingToken,
    /// The verifier rejected the token.
    InvalidToken,
    /// No user document matches the token.
    ProfileNotFound,
    /// The user is not an admin.
    NotAdmin,
    /// The profile lookup failed.
    Store(StoreError),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::MissingToken => (
                StatusCode::UNAUTHORIZED,
                "Missing Authorization Bearer token",
            ),
            Self::InvalidToken => (StatusCode::UNAUTHORIZED, "Invalid or expired token"),
            Self::ProfileNotFound => (
                StatusCode::FORBIDDEN,
                "User not found (uid/email not matched)",
            ),
            Self::NotAdmin => (StatusCode::FORBIDDEN, "Admin only"),
            Self::Store(e) => return AppError::Store(e).into_response(),
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Extract the bearer token from the `Authorization` header.
///
/// The scheme is matched case-insensitively and the token is trimmed.
fn bearer_token(parts: &Parts) -> Option<&str> {
    let header = parts.headers.get(AUTHORIZATION)?.to_str().ok()?;
    let (scheme, token) = header.trim_start().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }

    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

impl<S> FromRequestParts<S> for RequireAuth
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(parts) else {
            tracing::debug!(method = %parts.method, uri = %parts.uri, "Missing bearer token");
            return Err(AuthRejection::MissingToken);
        };

        let state = AppState::from_ref(state);
        match state.verifier().verify(token).await {
            Ok(identity) => Ok(Self(identity)),
            Err(AuthError::InvalidToken) => Err(AuthRejection::InvalidToken),
            Err(e) => {
                tracing::warn!(error = %e, "Token verification failed");
                Err(AuthRejection::InvalidToken)
            }
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let RequireAuth(identity) = RequireAuth::from_request_parts(parts, state).await?;

        let state = AppState::from_ref(state);
        let Some(profile) = state
            .users()
            .find_profile(&identity)
            .await
            .map_err(AuthRejection::Store)?
        else {
            tracing::info!(uid = %identity.uid, "Admin check: no matching user document");
            return Err(AuthRejection::ProfileNotFound);
        };

        if !profile.is_admin() {
            tracing::info!(
                uid = %identity.uid,
                user_id = %profile.id,
                role = ?profile.role,
                "Admin check failed"
            );
            return Err(AuthRejection::NotAdmin);
        }

        set_sentry_user(profile.id.as_str(), profile.email.as_deref());
        Ok(Self(profile))
    }
}
