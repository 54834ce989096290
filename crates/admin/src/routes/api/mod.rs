//! JSON API route handlers.
//!
//! Every handler under `/api` except `health` and `logout` sits behind a
//! bearer token; all but `me` additionally require an admin.

pub mod deliveries;
pub mod drivers;
pub mod me;
pub mod packages;
pub mod stats;
pub mod users;

use axum::Router;
use serde::Serialize;

use optimile_core::records::{DELIVERIES_COLLECTION, USERS_COLLECTION};
use optimile_core::{Delivery, User};

use crate::db::{DocumentStore, StoreError, into_records};
use crate::state::AppState;

/// Build the complete API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(me::router())
        .merge(stats::router())
        .merge(users::router())
        .merge(drivers::router())
        .merge(deliveries::router())
        .merge(packages::router())
}

/// Confirmation body for writes.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

impl MessageResponse {
    #[must_use]
    pub const fn new(message: &'static str) -> Self {
        Self { message }
    }
}

/// Read full user and delivery snapshots concurrently.
async fn load_snapshot(
    store: &dyn DocumentStore,
) -> Result<(Vec<User>, Vec<Delivery>), StoreError> {
    let (users, deliveries) = tokio::try_join!(
        store.list(USERS_COLLECTION),
        store.list(DELIVERIES_COLLECTION)
    )?;

    Ok((into_records(users)?, into_records(deliveries)?))
}
