//! Health check handlers.

use axum::{Json, Router, extract::State, http::StatusCode, routing::get};
use serde::Serialize;

use crate::state::AppState;

/// Build the health router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/api/health", get(health))
        .route("/health/ready", get(readiness))
}

/// Liveness response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub message: &'static str,
}

/// Liveness health check endpoint.
///
/// Returns OK if the server is running. Does not check dependencies.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        ok: true,
        message: "Server is running",
    })
}

/// Readiness health check endpoint.
///
/// Verifies document store connectivity before returning OK.
/// Returns 503 Service Unavailable if the store is not reachable.
pub async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.store().ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use serde_json::Value;

    use super::super::api::test_support::{app, degraded_app};

    #[tokio::test]
    async fn test_readiness_ok_when_store_answers() {
        let (status, _) = app().await.get("/health/ready", None).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_readiness_unavailable_when_ping_fails() {
        let app = degraded_app().await;

        let (status, body) = app.get("/health/ready", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body, Value::Null);

        // Liveness does not touch the store.
        let (status, _) = app.get("/health", None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
