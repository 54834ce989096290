//! User management handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::{get, put},
};
use serde::Serialize;
use tracing::instrument;

use optimile_core::{User, UserId};

use super::MessageResponse;
use crate::{
    error::AppError,
    middleware::RequireAdmin,
    services::{NewUser, UserUpdate},
    state::AppState,
};

/// Build the users router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/users", get(list_users).post(create_user))
        .route("/api/users/{id}", put(update_user).delete(delete_user))
}

/// Response for a created user.
#[derive(Debug, Serialize)]
pub struct CreatedResponse {
    pub id: UserId,
}

/// All users. Password hashes are never included.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn list_users(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.users().list().await?))
}

/// Create a user.
///
/// # Errors
///
/// Returns 400 for invalid input, 409 if the email is taken.
#[instrument(skip(admin, state, body), fields(admin_id = %admin.id))]
pub async fn create_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedResponse>), AppError> {
    let Json(input) = body?;
    let id = state.users().create(input).await?;
    Ok((StatusCode::CREATED, Json(CreatedResponse { id })))
}

/// Update a user.
///
/// # Errors
///
/// Returns 400 for invalid input, 404 if the user does not exist, 409 if the
/// email belongs to another user.
#[instrument(skip(admin, state, body), fields(admin_id = %admin.id))]
pub async fn update_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(input) = body?;
    state.users().update(&id, input).await?;
    Ok(Json(MessageResponse::new("User updated")))
}

/// Delete a user. Deleting a missing user succeeds.
///
/// # Errors
///
/// Returns an error if the store fails.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn delete_user(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.users().delete(&id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}
