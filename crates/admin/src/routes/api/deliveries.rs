//! Delivery listing.

use axum::{Json, Router, extract::State, routing::get};
use serde_json::Value;
use tracing::instrument;

use optimile_core::records::DELIVERIES_COLLECTION;

use crate::{db::Document, error::AppError, middleware::RequireAdmin, state::AppState};

/// Build the deliveries router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/deliveries", get(list_deliveries))
}

/// All delivery documents, passed through unchanged with their `id`.
///
/// # Errors
///
/// Returns an error if the store cannot be read.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn list_deliveries(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<Value>>, AppError> {
    let docs = state.store().list(DELIVERIES_COLLECTION).await?;
    Ok(Json(docs.into_iter().map(Document::into_json).collect()))
}
