//! Integration tests for the Optimile admin API.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (memory store, static tokens)
//! cargo test -p optimile-integration-tests
//!
//! # Postgres-backed tests
//! OPTIMILE_DATABASE_URL=postgres://... cargo test -p optimile-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `admin_api` - End-to-end API flows over HTTP
//! - `document_store` - `PgDocumentStore` against a real database

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::net::SocketAddr;
use std::sync::Arc;

use optimile_admin::config::AdminConfig;
use optimile_admin::db::MemoryDocumentStore;
use optimile_admin::server::build_router;
use optimile_admin::services::{Argon2Hasher, AuthError, StaticTokenVerifier};
use optimile_admin::state::AppState;
use serde_json::{Map, Value};

/// Token table for the test server's identity verifier.
pub const STATIC_TOKENS: &str =
    "admin-token=admin-1:boss@optimile.test,driver-token=firebase-uid-7:new.driver@optimile.test";

/// Bearer token of the seeded admin.
pub const ADMIN_TOKEN: &str = "admin-token";

/// Bearer token whose identity has no user document until one is created
/// for `new.driver@optimile.test`.
pub const DRIVER_TOKEN: &str = "driver-token";

/// Errors that can occur while starting the test server.
#[derive(Debug, thiserror::Error)]
pub enum StartError {
    #[error("Failed to bind test server: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// A running admin server on an ephemeral port.
pub struct TestContext {
    pub client: reqwest::Client,
    pub addr: SocketAddr,
    pub store: Arc<MemoryDocumentStore>,
}

impl TestContext {
    /// Start a server with a memory store seeded with one admin.
    ///
    /// # Errors
    ///
    /// Returns an error if the listener cannot be bound.
    pub async fn start() -> Result<Self, StartError> {
        let store = Arc::new(MemoryDocumentStore::new());
        store
            .insert(
                "users",
                "admin-1",
                object(serde_json::json!({
                    "name": "Boss",
                    "email": "boss@optimile.test",
                    "role": "admin",
                })),
            )
            .await;

        let verifier = StaticTokenVerifier::parse(STATIC_TOKENS)?;
        let state = AppState::new(
            AdminConfig::in_memory(STATIC_TOKENS),
            store.clone(),
            Arc::new(verifier),
            Arc::new(Argon2Hasher),
        );

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = build_router(state);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                tracing::error!(error = %e, %addr, "Test server stopped");
            }
        });

        Ok(Self {
            client: reqwest::Client::new(),
            addr,
            store,
        })
    }

    /// Absolute URL for a path on the test server.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{path}", self.addr)
    }

    /// Seed a delivery document written by another system.
    pub async fn seed_delivery(&self, id: &str, body: Value) {
        self.store.insert("deliveries", id, object(body)).await;
    }
}

/// Unwrap a JSON object literal into its map.
#[must_use]
pub fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}
