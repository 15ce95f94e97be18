/// In-memory document store
///
/// Collections are vectors kept in insertion order behind a single
/// `tokio::sync::RwLock`. Nothing is persisted; this backs the test suites
/// of the API and the admin CLI.

use std::collections::HashMap;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;

use super::{document_id, DocumentStore, StoreError, StoreResult};

#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn has_id(doc: &Value, id: &str) -> bool {
    doc.get("id").and_then(Value::as_str) == Some(id)
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn list(&self, collection: &str) -> StoreResult<Vec<Value>> {
        let collections = self.collections.read().await;
        Ok(collections.get(collection).cloned().unwrap_or_default())
    }

    async fn get(&self, collection: &str, id: &str) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| has_id(d, id)))
            .cloned())
    }

    async fn find_by_field(
        &self,
        collection: &str,
        field: &str,
        value: &str,
    ) -> StoreResult<Option<Value>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| {
                docs.iter()
                    .find(|d| d.get(field).and_then(Value::as_str) == Some(value))
            })
            .cloned())
    }

    async fn insert(&self, collection: &str, doc: Value) -> StoreResult<Value> {
        let id = document_id(collection, &doc)?.to_string();

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        if docs.iter().any(|d| has_id(d, &id)) {
            return Err(StoreError::DuplicateId {
                collection: collection.to_string(),
                id,
            });
        }

        docs.push(doc.clone());
        Ok(doc)
    }

    async fn replace(&self, collection: &str, id: &str, doc: Value) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;

        match collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| has_id(d, id)))
        {
            Some(slot) => {
                *slot = doc;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn upsert(&self, collection: &str, doc: Value) -> StoreResult<()> {
        let id = document_id(collection, &doc)?.to_string();

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();

        match docs.iter_mut().find(|d| has_id(d, &id)) {
            Some(slot) => *slot = doc,
            None => docs.push(doc),
        }

        Ok(())
    }

    async fn delete(&self, collection: &str, id: &str) -> StoreResult<bool> {
        let mut collections = self.collections.write().await;

        let Some(docs) = collections.get_mut(collection) else {
            return Ok(false);
        };

        let before = docs.len();
        docs.retain(|d| !has_id(d, id));
        Ok(docs.len() < before)
    }

    async fn clear(&self, collection: &str) -> StoreResult<u64> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .remove(collection)
            .map(|docs| docs.len() as u64)
            .unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_insert_and_list_keep_order() {
        let store = MemoryDocumentStore::new();
        store.insert("clients", json!({"id": "c_2", "name": "B"})).await.unwrap();
        store.insert("clients", json!({"id": "c_1", "name": "A"})).await.unwrap();

        let ids: Vec<String> = store
            .list("clients")
            .await
            .unwrap()
            .iter()
            .map(|d| d["id"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["c_2", "c_1"]);
        assert!(store.list("events").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_insert_rejects_duplicates_and_missing_ids() {
        let store = MemoryDocumentStore::new();
        store.insert("tasks", json!({"id": "t_1"})).await.unwrap();

        assert!(matches!(
            store.insert("tasks", json!({"id": "t_1"})).await,
            Err(StoreError::DuplicateId { .. })
        ));
        assert!(matches!(
            store.insert("tasks", json!({"title": "no id"})).await,
            Err(StoreError::MissingId { .. })
        ));

        // Same id in another collection is fine
        store.insert("events", json!({"id": "t_1"})).await.unwrap();
    }

    #[tokio::test]
    async fn test_replace_upsert_delete() {
        let store = MemoryDocumentStore::new();

        assert!(!store.replace("tasks", "t_1", json!({"id": "t_1"})).await.unwrap());

        store.upsert("tasks", json!({"id": "t_1", "v": 1})).await.unwrap();
        store.upsert("tasks", json!({"id": "t_1", "v": 2})).await.unwrap();
        assert_eq!(store.list("tasks").await.unwrap().len(), 1);

        assert!(store.replace("tasks", "t_1", json!({"id": "t_1", "v": 3})).await.unwrap());
        assert_eq!(store.get("tasks", "t_1").await.unwrap().unwrap()["v"], 3);

        assert!(store.delete("tasks", "t_1").await.unwrap());
        assert!(!store.delete("tasks", "t_1").await.unwrap());
        assert!(store.get("tasks", "t_1").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_field_and_clear() {
        let store = MemoryDocumentStore::new();
        store
            .insert("users", json!({"id": "a_1", "email": "ana@example.com"}))
            .await
            .unwrap();

        let found = store
            .find_by_field("users", "email", "ana@example.com")
            .await
            .unwrap();
        assert_eq!(found.unwrap()["id"], "a_1");
        assert!(store
            .find_by_field("users", "email", "bob@example.com")
            .await
            .unwrap()
            .is_none());

        assert_eq!(store.clear("users").await.unwrap(), 1);
        assert_eq!(store.clear("users").await.unwrap(), 0);
    }
}
