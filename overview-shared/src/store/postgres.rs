/// PostgreSQL document store
///
/// # Schema
///
/// ```sql
/// CREATE TABLE documents (
///     collection VARCHAR(64) NOT NULL,
///     id VARCHAR(255) NOT NULL,
///     body JSONB NOT NULL,
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
///     PRIMARY KEY (collection, id)
/// );
/// ```

use async_trait::async_trait;
use serde_json::Value;
use sqlx::{types::Json, PgPool};
use tracing::debug;

use super::{document_id, DocumentStore, StoreError, StoreResult};
use crate::db::pool::health_check;

/// Document store backed by the `documents` table
#[derive(Debug, Clone)]
pub struct PgDocumentStore {
    pool: PgPool,
}

impl PgDocumentStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Rows written by hand may lack an `id` in the body; the key column is authoritative
fn with_row_id(id: String, mut body: Value) -> Value {
    if let Value::Object(map) = &mut body {
        if !map.get("id").is_some_and(Value::is_string) {
            map.insert("id".to_string(), Value::String(id));
        }
    }
    body
}

#[async_trait]
impl DocumentStore for PgDocumentStore {
    fn backend(&self) -> &'static str {
        "postgres"
    }

    async fn ping(&self) -> StoreResult<()> {
        health_check(&self.pool).await?;
        Ok(())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let rows: Vec<(String, Json<Value>)> = sqlx::query_as(
            "SELECT id, body FROM documents WHERE collection = $1 ORDER BY created_at, id",
        )
        .bind(collection)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(id, Json(body))| with_row_id(id, body))
            .collect())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let row: Option<(Json<Value>,)> =
            sqlx::query_as("SELECT body FROM documents WHERE collection = $1 AND id = $2")
                .bind(collection)
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Value>> {
        let row: Option<(Json<Value>,)> = sqlx::query_as(
            "SELECT body FROM documents
             WHERE collection = $1 AND body->>$2 = $3
             ORDER BY created_at
             LIMIT 1",
        )
        .bind(collection)
        .bind(field)
        .bind(value)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|(Json(body),)| body))
    }

    async fn insert(&self, collection: &str, doc: Value) -> StoreResult<Value> {
        let id = document_id(collection, &doc)?.to_string();

        let result = sqlx::query("INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)")
            .bind(collection)
            .bind(&id)
            .bind(Json(&doc))
            .execute(&self.pool)
            .await;

        match result {
            Ok(_) => {
                debug!(collection, id = %id, "Inserted document");
                Ok(doc)
            }
            Err(sqlx::Error::Database(e)) if e.is_unique_violation() => {
                Err(StoreError::DuplicateId {
                    collection: collection.to_string(),
                    id,
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn replace(&self, collection: &str, id: &str, doc: Value) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE documents SET body = $3, updated_at = NOW()
             WHERE collection = $1 AND id = $2",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&doc))
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn upsert(&self, collection: &str, doc: Value) -> StoreResult<()> {
        let id = document_id(collection, &doc)?;

        sqlx::query(
            "INSERT INTO documents (collection, id, body) VALUES ($1, $2, $3)
             ON CONFLICT (collection, id)
             DO UPDATE SET body = EXCLUDED.body, updated_at = NOW()",
        )
        .bind(collection)
        .bind(id)
        .bind(Json(&doc))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1 AND id = $2")
            .bind(collection)
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear(&self, collection: &str) -> StoreResult<u64> {
        let result = sqlx::query("DELETE FROM documents WHERE collection = $1")
            .bind(collection)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
