//! Package status lookup.

use optimile_core::records::DELIVERIES_COLLECTION;
use optimile_core::{Delivery, PackageStatus};

use crate::db::{DocumentStore, StoreError};

/// Delivery fields that may carry an application-level package id, in lookup order.
pub const PACKAGE_ID_FIELDS: [&str; 3] = ["package_id", "packageId", "package"];

/// Find a delivery by package identifier and report its status.
///
/// The identifier is tried as a document id first, then against each of
/// [`PACKAGE_ID_FIELDS`] in order. The first match wins.
///
/// # Errors
///
/// Returns `StoreError` if the store fails or the matched document is malformed.
#[tracing::instrument(skip(store))]
pub async fn lookup_package_status(
    store: &dyn DocumentStore,
    package_id: &str,
) -> Result<PackageStatus, StoreError> {
    if let Some(doc) = store.get(DELIVERIES_COLLECTION, package_id).await? {
        let delivery: Delivery = doc.into_record()?;
        return Ok(PackageStatus::found(&delivery));
    }

    for field in PACKAGE_ID_FIELDS {
        let mut docs = store
            .find_by_field(DELIVERIES_COLLECTION, field, package_id, 1)
            .await?;
        if let Some(doc) = docs.pop() {
            tracing::debug!(field, delivery_id = %doc.id, "Package matched by field");
            let delivery: Delivery = doc.into_record()?;
            return Ok(PackageStatus::found(&delivery));
        }
    }

    Ok(PackageStatus::not_found())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Map, Value, json};

    use super::*;
    use crate::db::MemoryDocumentStore;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn test_lookup_by_document_id() {
        let store = MemoryDocumentStore::new();
        store
            .insert(DELIVERIES_COLLECTION, "PKG1", object(json!({"status": "done"})))
            .await;

        let status = lookup_package_status(&store, "PKG1").await.unwrap();
        assert!(status.found);
        assert_eq!(status.id.unwrap().as_str(), "PKG1");
        assert_eq!(status.status.as_deref(), Some("delivered"));
    }

    #[tokio::test]
    async fn test_lookup_by_alternate_field() {
        let store = MemoryDocumentStore::new();
        store
            .insert(
                DELIVERIES_COLLECTION,
                "d7",
                object(json!({"package_id": "X9", "status": "Pending"})),
            )
            .await;

        let status = lookup_package_status(&store, "X9").await.unwrap();
        assert_eq!(status.id.unwrap().as_str(), "d7");
        assert_eq!(status.status.as_deref(), Some("pending"));
    }

    #[tokio::test]
    async fn test_lookup_follows_field_order() {
        let store = MemoryDocumentStore::new();
        store
            .insert(DELIVERIES_COLLECTION, "by-package", object(json!({"package": "Z1"})))
            .await;
        store
            .insert(
                DELIVERIES_COLLECTION,
                "by-camel",
                object(json!({"packageId": "Z1", "completed_at": "2026-05-01T10:00:00Z"})),
            )
            .await;

        let status = lookup_package_status(&store, "Z1").await.unwrap();
        assert_eq!(status.id.unwrap().as_str(), "by-camel");
        assert_eq!(status.status.as_deref(), Some("delivered"));
    }

    #[tokio::test]
    async fn test_lookup_not_found() {
        let store = MemoryDocumentStore::new();
        let status = lookup_package_status(&store, "missing").await.unwrap();
        assert_eq!(status, PackageStatus::not_found());
    }
}
