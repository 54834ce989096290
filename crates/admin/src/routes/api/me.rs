//! Caller profile and logout.

use axum::{
    Json, Router,
    extract::State,
    routing::{get, post},
};
use serde::Serialize;
use tracing::instrument;

use super::MessageResponse;
use crate::{error::AppError, middleware::RequireAuth, state::AppState};

/// Build the session router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/me", get(me))
        .route("/api/logout", post(logout))
}

/// Profile of the authenticated caller.
#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub role: Option<String>,
}

/// Return the caller's profile.
///
/// Uses the stored user document when one matches the token and falls back
/// to the token's own claims with a `null` role.
///
/// # Errors
///
/// Returns an error if the profile lookup fails.
#[instrument(skip(identity, state), fields(uid = %identity.uid))]
pub async fn me(
    RequireAuth(identity): RequireAuth,
    State(state): State<AppState>,
) -> Result<Json<MeResponse>, AppError> {
    let Some(profile) = state.users().find_profile(&identity).await? else {
        return Ok(Json(MeResponse {
            id: identity.uid,
            name: identity.name,
            email: identity.email,
            role: None,
        }));
    };

    Ok(Json(MeResponse {
        id: profile.id.into_inner(),
        name: non_blank(profile.name),
        email: non_blank(profile.email).or(identity.email),
        role: non_blank(profile.role),
    }))
}

/// Acknowledge a logout. Tokens are held by the client, so there is nothing to revoke.
pub async fn logout() -> Json<MessageResponse> {
    Json(MessageResponse::new("Logged out (client token cleared)"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
