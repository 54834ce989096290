//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                     - Liveness check
//! GET    /api/health                 - Liveness check
//! GET    /health/ready               - Readiness check (document store)
//!
//! # Session (bearer token)
//! GET    /api/me                     - Caller profile
//! POST   /api/logout                 - Client-side logout acknowledgement
//!
//! # Dashboard (admin only)
//! GET    /api/stats                  - Aggregate driver and package counts
//!
//! # Users (admin only)
//! GET    /api/users                  - List users
//! POST   /api/users                  - Create user
//! PUT    /api/users/{id}             - Update user
//! DELETE /api/users/{id}             - Delete user
//!
//! # Drivers (admin only)
//! GET    /api/drivers                - Drivers with delivered counts
//! PUT    /api/drivers/{id}           - Update driver
//! DELETE /api/drivers/{id}           - Delete driver
//! GET    /api/drivers-with-deliveries - Drivers with assigned deliveries
//!
//! # Deliveries (admin only)
//! GET    /api/deliveries             - List deliveries
//! GET    /api/package-status/{id}    - Package status lookup
//! ```

pub mod api;
pub mod health;

use axum::Router;

use crate::state::AppState;

/// Build the complete application router (without layers or state).
pub fn routes() -> Router<AppState> {
    Router::new().merge(health::router()).merge(api::router())
}
