//! Dashboard statistics.

use axum::{Json, Router, extract::State, routing::get};
use tracing::instrument;

use optimile_core::{DashboardStats, compute_dashboard_stats};

use super::load_snapshot;
use crate::{error::AppError, middleware::RequireAdmin, state::AppState};

/// Build the stats router.
pub fn router() -> Router<AppState> {
    Router::new().route("/api/stats", get(stats))
}

/// Aggregate driver and package counts.
///
/// # Errors
///
/// Returns an error if the snapshots cannot be read.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn stats(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<DashboardStats>, AppError> {
    let (users, deliveries) = load_snapshot(state.store()).await?;
    Ok(Json(compute_dashboard_stats(&users, &deliveries)))
}
