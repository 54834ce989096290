//! In-memory document store.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::{Map, Value};
use tokio::sync::RwLock;

use super::{Document, DocumentStore, StoreError, new_document_id, strip_id};

/// Document store held in process memory.
///
/// Documents keep insertion order within a collection. Contents are lost
/// when the process exits.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Document>>>,
}

impl MemoryDocumentStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a document under a caller-chosen id.
    ///
    /// Used to seed collections written by other systems, such as deliveries.
    pub async fn insert(&self, collection: &str, id: &str, data: Map<String, Value>) {
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_owned()).or_default();
        let data = strip_id(data);

        match docs.iter_mut().find(|doc| doc.id == id) {
            Some(existing) => existing.data = data,
            None => docs.push(Document {
                id: id.to_owned(),
                data,
            }),
        }
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|doc| doc.id == id))
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        Ok(docs
            .iter()
            .filter(|doc| matches!(doc.data.get(field), Some(Value::String(s)) if s == value))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn add(&self, collection: &str, data: Map<String, Value>) -> Result<String, StoreError> {
        let id = new_document_id();
        let mut collections = self.collections.write().await;
        collections
            .entry(collection.to_owned())
            .or_default()
            .push(Document {
                id: id.clone(),
                data: strip_id(data),
            });
        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        let doc = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|doc| doc.id == id))
            .ok_or_else(|| StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            })?;

        doc.data.extend(strip_id(data));
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        let mut collections = self.collections.write().await;
        if let Some(docs) = collections.get_mut(collection) {
            docs.retain(|doc| doc.id != id);
        }
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => Map::new(),
        }
    }

    #[tokio::test]
    async fn test_add_then_get() {
        let store = MemoryDocumentStore::new();
        let id = store
            .add("users", object(json!({"name": "Ana", "id": "ignored"})))
            .await
            .unwrap();

        let doc = store.get("users", &id).await.unwrap().unwrap();
        assert_eq!(doc.id, id);
        assert_eq!(doc.data.get("name"), Some(&json!("Ana")));
        assert!(doc.data.get("id").is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_insertion_order() {
        let store = MemoryDocumentStore::new();
        store.insert("deliveries", "b", Map::new()).await;
        store.insert("deliveries", "a", Map::new()).await;

        let ids: Vec<String> = store
            .list("deliveries")
            .await
            .unwrap()
            .into_iter()
            .map(|d| d.id)
            .collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert!(store.list("users").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_find_by_field_matches_strings_only() {
        let store = MemoryDocumentStore::new();
        store.insert("deliveries", "d1", object(json!({"package_id": 42}))).await;
        store.insert("deliveries", "d2", object(json!({"package_id": "42"}))).await;
        store.insert("deliveries", "d3", object(json!({"package_id": "42"}))).await;

        let found = store
            .find_by_field("deliveries", "package_id", "42", 1)
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, "d2");
    }

    #[tokio::test]
    async fn test_update_merges_fields() {
        let store = MemoryDocumentStore::new();
        store
            .insert("users", "u1", object(json!({"name": "Ana", "phone": "1"})))
            .await;

        store
            .update("users", "u1", object(json!({"phone": "2"})))
            .await
            .unwrap();

        let doc = store.get("users", "u1").await.unwrap().unwrap();
        assert_eq!(doc.data.get("name"), Some(&json!("Ana")));
        assert_eq!(doc.data.get("phone"), Some(&json!("2")));
    }

    #[tokio::test]
    async fn test_update_missing_document() {
        let store = MemoryDocumentStore::new();
        let err = store.update("users", "nope", Map::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let store = MemoryDocumentStore::new();
        store.insert("users", "u1", Map::new()).await;

        store.delete("users", "u1").await.unwrap();
        store.delete("users", "u1").await.unwrap();
        store.delete("missing", "u1").await.unwrap();

        assert!(store.get("users", "u1").await.unwrap().is_none());
    }
}
