//! Package status lookup.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::get,
};
use tracing::instrument;

use optimile_core::PackageStatus;

use crate::{
    error::AppError, middleware::RequireAdmin, services::lookup_package_status, state::AppState,
};

/// Build the packages router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/package-status/{package_id}", get(package_status))
}

/// Status of a package by document id or package identifier.
///
/// An unknown package is a successful response with `found: false`.
///
/// # Errors
///
/// Returns 400 for a blank identifier, or an error if the store fails.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn package_status(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(package_id): Path<String>,
) -> Result<Json<PackageStatus>, AppError> {
    let package_id = package_id.trim();
    if package_id.is_empty() {
        return Err(AppError::BadRequest("packageId is required".to_string()));
    }

    Ok(Json(lookup_package_status(state.store(), package_id).await?))
}
