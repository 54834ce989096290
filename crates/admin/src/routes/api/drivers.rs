//! Driver handlers.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    routing::{get, put},
};
use tracing::instrument;

use optimile_core::{DriverOverview, DriverSummary, build_driver_roster, summarize_drivers};

use super::{MessageResponse, load_snapshot};
use crate::{error::AppError, middleware::RequireAdmin, services::DriverUpdate, state::AppState};

/// Build the drivers router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/drivers", get(list_drivers))
        .route("/api/drivers/{id}", put(update_driver).delete(delete_driver))
        .route("/api/drivers-with-deliveries", get(drivers_with_deliveries))
}

/// Drivers with the number of deliveries each completed.
///
/// # Errors
///
/// Returns an error if the snapshots cannot be read.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn list_drivers(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<DriverOverview>>, AppError> {
    let (users, deliveries) = load_snapshot(state.store()).await?;
    Ok(Json(summarize_drivers(&users, &deliveries)))
}

/// Drivers with their assigned deliveries and counts.
///
/// # Errors
///
/// Returns an error if the snapshots cannot be read.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn drivers_with_deliveries(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
) -> Result<Json<Vec<DriverSummary>>, AppError> {
    let (users, deliveries) = load_snapshot(state.store()).await?;
    let roster = build_driver_roster(&users, &deliveries);
    tracing::debug!(drivers = roster.len(), deliveries = deliveries.len(), "Roster built");
    Ok(Json(roster))
}

/// Update a driver profile. The user's role becomes `driver`.
///
/// # Errors
///
/// Returns 400 for invalid input, 404 if the user does not exist, 409 if the
/// email belongs to another user.
#[instrument(skip(admin, state, body), fields(admin_id = %admin.id))]
pub async fn update_driver(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<DriverUpdate>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let Json(input) = body?;
    state.users().update_driver(&id, input).await?;
    Ok(Json(MessageResponse::new("Driver updated")))
}

/// Delete a driver. Deleting a missing driver succeeds.
///
/// # Errors
///
/// Returns an error if the store fails.
#[instrument(skip(admin, state), fields(admin_id = %admin.id))]
pub async fn delete_driver(
    RequireAdmin(admin): RequireAdmin,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.users().delete(&id).await?;
    Ok(Json(MessageResponse::new("Driver deleted")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use axum::http::{Method, StatusCode};
    use serde_json::json;

    use super::super::test_support::{ADMIN_TOKEN, app, degraded_app, object};
    use crate::db::DocumentStore;

    async fn seeded() -> super::super::test_support::TestApp {
        let app = app().await;
        app.store
            .insert(
                "users",
                "driver-2",
                object(json!({"role": "driver", "email": "", "name": ""})),
            )
            .await;
        for (id, body) in [
            ("d1", json!({"driver_id": "driver-1", "status": "pending"})),
            ("d2", json!({"driver_email": "DEE@x.com", "completed_at": "2026-06-02T10:00:00Z"})),
            ("d3", json!({"driver_id": "driver-1", "status": "done"})),
            ("d4", json!({"status": "done"})),
        ] {
            app.store.insert("deliveries", id, object(body)).await;
        }
        app
    }

    #[tokio::test]
    async fn test_drivers_with_deliveries() {
        let app = seeded().await;

        let (status, body) = app.get("/api/drivers-with-deliveries", Some(ADMIN_TOKEN)).await;

        assert_eq!(status, StatusCode::OK);
        let roster = body.as_array().unwrap();
        assert_eq!(roster.len(), 2);

        assert_eq!(roster[0]["id"], "driver-1");
        assert_eq!(roster[0]["assignedCount"], 3);
        assert_eq!(roster[0]["deliveredCount"], 2);
        let ids: Vec<&str> = roster[0]["deliveries"]
            .as_array()
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect();
        assert_eq!(ids, vec!["d1", "d2", "d3"]);

        assert_eq!(
            roster[1],
            json!({
                "id": "driver-2",
                "name": "-",
                "email": "-",
                "phone": "-",
                "assignedCount": 0,
                "deliveredCount": 0,
                "deliveries": [],
            })
        );
    }

    #[tokio::test]
    async fn test_list_drivers() {
        let app = seeded().await;

        let (status, body) = app.get("/api/drivers", Some(ADMIN_TOKEN)).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body[0],
            json!({
                "id": "driver-1",
                "name": "Dee",
                "email": "dee@x.com",
                "phone": "555",
                "packagesDelivered": 2,
            })
        );
    }

    #[tokio::test]
    async fn test_update_driver() {
        let app = seeded().await;

        let (status, body) = app
            .send(
                Method::PUT,
                "/api/drivers/driver-2",
                Some(ADMIN_TOKEN),
                Some(json!({"name": "Eve", "email": " EVE@x.com ", "phone": " 777 "})),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Driver updated"}));

        let doc = app.store.get("users", "driver-2").await.unwrap().unwrap();
        assert_eq!(doc.data.get("email"), Some(&json!("eve@x.com")));
        assert_eq!(doc.data.get("phone"), Some(&json!("777")));
        assert_eq!(doc.data.get("role"), Some(&json!("driver")));

        let (status, body) = app
            .send(Method::PUT, "/api/drivers/driver-2", Some(ADMIN_TOKEN), Some(json!({"name": "Eve"})))
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({"error": "name and email required"}));
    }

    #[tokio::test]
    async fn test_delete_driver() {
        let app = seeded().await;

        let (status, body) = app
            .send(Method::DELETE, "/api/drivers/driver-2", Some(ADMIN_TOKEN), None)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": "Driver deleted"}));
        assert!(app.store.get("users", "driver-2").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_roster_deliveries_match_delivery_listing() {
        let app = app().await;
        app.store
            .insert(
                "deliveries",
                "d1",
                object(json!({"driver_email": "dee@x.com", "driver_id": 7, "status": null, "stops": [1, 2]})),
            )
            .await;

        let (_, roster) = app.get("/api/drivers-with-deliveries", Some(ADMIN_TOKEN)).await;
        let (_, listing) = app.get("/api/deliveries", Some(ADMIN_TOKEN)).await;

        assert_eq!(roster[0]["assignedCount"], 1);
        assert_eq!(roster[0]["deliveries"][0], listing[0]);
        assert_eq!(listing[0]["driver_id"], 7);
        assert_eq!(listing[0]["stops"], json!([1, 2]));
    }

    #[tokio::test]
    async fn test_roster_store_failure_is_500_without_partial_roster() {
        let app = degraded_app().await;
        app.store
            .insert("deliveries", "d1", object(json!({"driver_id": "driver-1"})))
            .await;

        let (status, body) = app
            .get("/api/drivers-with-deliveries", Some(ADMIN_TOKEN))
            .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({"error": "Database error: data corruption: store offline"})
        );
    }
}
