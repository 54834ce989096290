//! Document store port and adapters.
//!
//! All persistent state lives in two schemaless collections, `users` and
//! `deliveries`. Route handlers see the store only through the
//! [`DocumentStore`] trait so tests can run against [`MemoryDocumentStore`].
//!
//! # Adapters
//!
//! - [`PgDocumentStore`] - `PostgreSQL` JSONB table `documents`
//! - [`MemoryDocumentStore`] - process-local map for tests and local development
//!
//! # Migrations
//!
//! Migrations are stored in `crates/admin/migrations/` and run via:
//! ```bash
//! cargo run -p optimile-cli -- migrate
//! ```

pub mod memory;
pub mod postgres;

use std::time::Duration;

use async_trait::async_trait;
use secrecy::ExposeSecret;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use optimile_core::records::from_document;

pub use memory::MemoryDocumentStore;
pub use postgres::PgDocumentStore;

/// Errors that can occur during document store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the store is corrupted or does not fit the expected shape.
    #[error("data corruption: {0}")]
    DataCorruption(String),

    /// The document to update does not exist.
    #[error("document not found: {collection}/{id}")]
    NotFound {
        /// Collection that was searched.
        collection: String,
        /// Requested document id.
        id: String,
    },
}

/// A stored document: its id and JSON object body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub data: Map<String, Value>,
}

impl Document {
    /// Deserialize the document into a typed record.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::DataCorruption` if the body does not fit `T`.
    pub fn into_record<T: DeserializeOwned>(self) -> Result<T, StoreError> {
        let id = self.id;
        from_document(&id, self.data)
            .map_err(|e| StoreError::DataCorruption(format!("document {id}: {e}")))
    }

    /// The document body with its id merged in under `id`.
    #[must_use]
    pub fn into_json(self) -> Value {
        let mut data = self.data;
        data.insert("id".to_owned(), Value::String(self.id));
        Value::Object(data)
    }
}

/// Deserialize a list of documents into typed records.
///
/// # Errors
///
/// Returns `StoreError::DataCorruption` on the first document that does not fit `T`.
pub fn into_records<T: DeserializeOwned>(docs: Vec<Document>) -> Result<Vec<T>, StoreError> {
    docs.into_iter().map(Document::into_record).collect()
}

/// Access to schemaless document collections.
///
/// `list` and `find_by_field` return documents in creation order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Every document in the collection.
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError>;

    /// A single document by id.
    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError>;

    /// Documents whose `field` is the string `value`, at most `limit` of them.
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError>;

    /// Insert a document under a fresh id and return the id.
    async fn add(&self, collection: &str, data: Map<String, Value>) -> Result<String, StoreError>;

    /// Merge `data` into an existing document.
    ///
    /// Returns `StoreError::NotFound` if the document does not exist.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StoreError>;

    /// Delete a document. Deleting a missing document succeeds.
    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError>;

    /// Check that the store is reachable.
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Generate a document id.
fn new_document_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Remove a client-supplied `id` key; the document id is assigned by the store.
fn strip_id(mut data: Map<String, Value>) -> Map<String, Value> {
    data.remove("id");
    data
}

/// Create a `PostgreSQL` connection pool with sensible defaults.
///
/// # Arguments
///
/// * `database_url` - `PostgreSQL` connection string (wrapped in `SecretString`)
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &secrecy::SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(2)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use optimile_core::User;
    use serde_json::json;

    use super::*;

    fn doc(id: &str, body: Value) -> Document {
        let Value::Object(data) = body else {
            panic!("body must be an object")
        };
        Document {
            id: id.to_owned(),
            data,
        }
    }

    #[test]
    fn test_into_json_merges_id() {
        let json = doc("d1", json!({"status": "pending"})).into_json();
        assert_eq!(json, json!({"id": "d1", "status": "pending"}));
    }

    #[test]
    fn test_into_record_reports_corruption() {
        let err = doc("u1", json!({"extra": 1}))
            .into_record::<std::collections::HashMap<String, String>>()
            .unwrap_err();
        assert!(matches!(err, StoreError::DataCorruption(msg) if msg.contains("u1")));
    }

    #[test]
    fn test_into_records() {
        let users: Vec<User> = into_records(vec![
            doc("u1", json!({"role": "driver"})),
            doc("u2", json!({"role": "admin"})),
        ])
        .unwrap();
        assert_eq!(users.len(), 2);
        assert!(users[0].is_driver());
    }

    #[test]
    fn test_strip_id() {
        let Value::Object(data) = json!({"id": "x", "name": "Ana"}) else {
            unreachable!()
        };
        assert_eq!(strip_id(data).len(), 1);
    }
}
