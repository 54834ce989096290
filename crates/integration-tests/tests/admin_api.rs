//! End-to-end admin API flows over HTTP.
//!
//! Each test starts its own server on an ephemeral port backed by the
//! in-memory document store and static bearer tokens.

use optimile_integration_tests::{ADMIN_TOKEN, DRIVER_TOKEN, TestContext};
use reqwest::StatusCode;
use serde_json::{Value, json};

async fn get(ctx: &TestContext, path: &str, token: &str) -> (StatusCode, Value) {
    let resp = ctx
        .client
        .get(ctx.url(path))
        .bearer_auth(token)
        .send()
        .await
        .expect("Failed to send request");
    let status = resp.status();
    let body = resp.json().await.unwrap_or(Value::Null);
    (status, body)
}

async fn create_driver(ctx: &TestContext, name: &str, email: &str) -> String {
    let resp = ctx
        .client
        .post(ctx.url("/api/users"))
        .bearer_auth(ADMIN_TOKEN)
        .json(&json!({
            "name": name,
            "email": email,
            "phone": " 0790000000 ",
            "role": "driver",
            "password": "secret-pass",
        }))
        .send()
        .await
        .expect("Failed to create driver");

    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = resp.json().await.expect("Failed to read response");
    body["id"].as_str().expect("id in response").to_string()
}

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::start().await.expect("Failed to start server");

    let resp = ctx
        .client
        .get(ctx.url("/api/health"))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.expect("Failed to read response");
    assert_eq!(body, json!({"ok": true, "message": "Server is running"}));
}

#[tokio::test]
async fn test_admin_routes_require_token() {
    let ctx = TestContext::start().await.expect("Failed to start server");

    let resp = ctx
        .client
        .get(ctx.url("/api/stats"))
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let (status, body) = get(&ctx, "/api/stats", "not-a-token").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body, json!({"error": "Invalid or expired token"}));
}

#[tokio::test]
async fn test_driver_roster_stats_and_package_status() {
    let ctx = TestContext::start().await.expect("Failed to start server");

    let ana = create_driver(&ctx, "Ana", "Ana@Optimile.test").await;
    let omar = create_driver(&ctx, "Omar", "omar@optimile.test").await;

    // Matched by id, matched by email only, unassigned.
    ctx.seed_delivery(
        "d1",
        json!({"driver_id": ana, "status": "done", "package_id": "PKG-1"}),
    )
    .await;
    ctx.seed_delivery(
        "d2",
        json!({"driver_email": " ANA@optimile.test", "status": "pending", "packageId": "PKG-2"}),
    )
    .await;
    ctx.seed_delivery(
        "d3",
        json!({"driver_id": "someone-else", "status": "pending", "completed_at": "2026-03-02T09:00:00Z", "package": "PKG-3"}),
    )
    .await;

    let (status, roster) = get(&ctx, "/api/drivers-with-deliveries", ADMIN_TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(roster.as_array().map(Vec::len), Some(2));

    assert_eq!(roster[0]["id"], ana.as_str());
    assert_eq!(roster[0]["email"], "ana@optimile.test");
    assert_eq!(roster[0]["phone"], "0790000000");
    assert_eq!(roster[0]["assignedCount"], 2);
    assert_eq!(roster[0]["deliveredCount"], 1);

    assert_eq!(roster[1]["id"], omar.as_str());
    assert_eq!(roster[1]["assignedCount"], 0);
    assert_eq!(roster[1]["deliveries"], json!([]));

    let (status, stats) = get(&ctx, "/api/stats", ADMIN_TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["totalDrivers"], 2);
    assert_eq!(stats["totalPackages"], 3);
    assert_eq!(stats["pendingPackages"], 2);
    assert_eq!(stats["deliveredPackages"], 2);

    let (_, pkg) = get(&ctx, "/api/package-status/PKG-1", ADMIN_TOKEN).await;
    assert_eq!(pkg, json!({"found": true, "id": "d1", "status": "delivered"}));

    let (_, pkg) = get(&ctx, "/api/package-status/PKG-2", ADMIN_TOKEN).await;
    assert_eq!(pkg["status"], "pending");

    let (_, pkg) = get(&ctx, "/api/package-status/NOPE", ADMIN_TOKEN).await;
    assert_eq!(pkg, json!({"found": false, "status": null}));
}

#[tokio::test]
async fn test_driver_token_resolves_profile_by_email() {
    let ctx = TestContext::start().await.expect("Failed to start server");

    // No user document yet: claims only, no role.
    let (status, me) = get(&ctx, "/api/me", DRIVER_TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], "firebase-uid-7");
    assert_eq!(me["role"], Value::Null);

    let id = create_driver(&ctx, "New Driver", "New.Driver@optimile.test").await;

    let (status, me) = get(&ctx, "/api/me", DRIVER_TOKEN).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], id.as_str());
    assert_eq!(me["role"], "driver");

    // Drivers are not admins.
    let (status, body) = get(&ctx, "/api/drivers", DRIVER_TOKEN).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body, json!({"error": "Admin only"}));
}

#[tokio::test]
async fn test_deleted_driver_leaves_deliveries_unassigned() {
    let ctx = TestContext::start().await.expect("Failed to start server");

    let id = create_driver(&ctx, "Ana", "ana@optimile.test").await;
    ctx.seed_delivery("d1", json!({"driver_id": id, "status": "done"}))
        .await;

    let resp = ctx
        .client
        .delete(ctx.url(&format!("/api/drivers/{id}")))
        .bearer_auth(ADMIN_TOKEN)
        .send()
        .await
        .expect("Failed to delete driver");
    assert_eq!(resp.status(), StatusCode::OK);

    let (_, roster) = get(&ctx, "/api/drivers-with-deliveries", ADMIN_TOKEN).await;
    assert_eq!(roster, json!([]));

    let (_, deliveries) = get(&ctx, "/api/deliveries", ADMIN_TOKEN).await;
    assert_eq!(deliveries.as_array().map(Vec::len), Some(1));
}
