/// Document store abstraction
///
/// Dashboard records are schemaless JSON documents grouped in named
/// collections and addressed by a string `id` field. The server and the
/// admin CLI only talk to the [`DocumentStore`] trait; the startup routine
/// decides which implementation backs it.
///
/// # Implementations
///
/// - [`postgres::PgDocumentStore`]: one JSONB row per document in PostgreSQL
/// - [`memory::MemoryDocumentStore`]: process-local, used by tests
///
/// # Example
///
/// ```
/// use overview_shared::store::{memory::MemoryDocumentStore, DocumentStore};
/// use serde_json::json;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryDocumentStore::new();
/// store.insert("clients", json!({"id": "c_1", "name": "Acme"})).await?;
///
/// let clients = store.list("clients").await?;
/// assert_eq!(clients.len(), 1);
/// # Ok(())
/// # }
/// ```

pub mod memory;
pub mod postgres;
pub mod snapshot;

use async_trait::async_trait;
use serde_json::Value;

/// Error type for store operations
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A document with this id already exists
    #[error("Document '{id}' already exists in '{collection}'")]
    DuplicateId { collection: String, id: String },

    /// Document has no usable `id` field
    #[error("Document in '{collection}' has no string id")]
    MissingId { collection: String },

    /// Record could not be converted to or from JSON
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Reads the `id` of a document
pub fn document_id<'a>(collection: &str, doc: &'a Value) -> StoreResult<&'a str> {
    doc.get("id")
        .and_then(Value::as_str)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| StoreError::MissingId {
            collection: collection.to_string(),
        })
}

/// Collection-oriented JSON document storage
///
/// Documents keep insertion order within a collection. Ids are unique per
/// collection.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Short backend name for logs and health output
    fn backend(&self) -> &'static str;

    /// Checks that the backend is reachable
    async fn ping(&self) -> StoreResult<()>;

    /// All documents of a collection
    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>>;

    /// One document by id
    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>>;

    /// First document whose top-level string `field` equals `value`
    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Value>>;

    /// Inserts a new document
    ///
    /// Fails with [`StoreError::DuplicateId`] if the id is taken.
    async fn insert(&self, collection: &str, doc: Value) -> StoreResult<Value>;

    /// Replaces the document with `id`; returns `false` when there is none
    async fn replace(&self, collection: &str, id: &str, doc: Value) -> StoreResult<bool>;

    /// Inserts or replaces by the document's id
    async fn upsert(&self, collection: &str, doc: Value) -> StoreResult<()>;

    /// Deletes by id; returns whether something was deleted
    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool>;

    /// Removes every document of a collection, returning how many
    async fn clear(&self, collection: &str) -> StoreResult<u64>;
}
