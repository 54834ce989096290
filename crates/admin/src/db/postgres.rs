//! `PostgreSQL` document store.
//!
//! Every collection shares the `documents` table; bodies are JSONB objects.
//! Queries are built at runtime so the crate compiles without a live database.

use async_trait::async_trait;
use serde_json::{Map, Value};
use sqlx::PgPool;
use sqlx::types::Json;

use super::{Document, DocumentStore, StoreError, new_document_id, strip_id};

/// Internal row type for `documents` queries.
#[derive(Debug, sqlx::FromRow)]
struct DocumentRow {
    id: String,
    data: Json<Value>,
}

impl TryFrom<DocumentRow> for Document {
    type Error = StoreError;

    fn try_from(row: DocumentRow) -> Result<Self, Self::Error> {
        match row.data.0 {
            Value::Object(data) => Ok(Self { id: row.id, data }),
            other => Err(StoreError::DataCorruption(format!(
                "document {} is not an object: {other}",
                row.id
            ))),
        }
    }
}

fn into_documents(rows: Vec<DocumentRow>) -> Result<Vec<Document>, StoreError> {
    rows.into_iter().map(Document::try_from).collect()
}

/// Document store backed by the `documents` table.
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    /// Create a store over an existing pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// The underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    async fn list(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        let rows = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data
            FROM documents
            WHERE collection = $1
            ORDER BY created_at, id
            ",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        into_documents(rows)
    }

    async fn get(&self, collection: &str, id: &str) -> Result<Option<Document>, StoreError> {
        let row = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data
            FROM documents
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Document::try_from).transpose()
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
        limit: usize,
    ) -> Result<Vec<Document>, StoreError> {
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = sqlx::query_as::<_, DocumentRow>(
            r"
            SELECT id, data
            FROM documents
            WHERE collection = $1 AND data -> $2 = to_jsonb($3::text)
            ORDER BY created_at, id
            LIMIT $4
            ",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        into_documents(rows)
    }

    async fn add(&self, collection: &str, data: Map<String, Value>) -> Result<String, StoreError> {
        let id = new_document_id();
        sqlx::query(
            r"
            INSERT INTO documents (collection, id, data)
            VALUES ($1, $2, $3)
            ",
        )
        .bind(collection)
        .bind(&id)
        .bind(Json(Value::Object(strip_id(data))))
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
    ) -> Result<(), StoreError> {
        let result = sqlx::query(
            r"
            UPDATE documents
            SET data = data || $3, updated_at = now()
            WHERE collection = $1 AND id = $2
            ",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(Value::Object(strip_id(data))))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound {
                collection: collection.to_owned(),
                id: id.to_owned(),
            });
        }
        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
