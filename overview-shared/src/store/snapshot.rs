/// Loading, reconciling and importing whole-store snapshots
///
/// [`reconcile_store`] is the load path used by the snapshot endpoint and
/// the admin `migrate` command: it reads every collection, runs the legacy
/// assignee migration, and writes back only what the migration changed.
///
/// Documents that do not match their model are skipped with a warning
/// rather than failing the whole load; they stay untouched in the store.

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tracing::{info, warn};

use super::{DocumentStore, StoreResult};
use crate::{
    migration::{merge_snapshots, migrate_snapshot, Migrated},
    models::{
        collection::Collection,
        snapshot::{PartialSnapshot, StoreSnapshot},
    },
};

/// How an imported snapshot combines with stored data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportMode {
    /// Drop every stored record first
    #[default]
    Replace,

    /// Upsert imported records by id, keep the rest
    Merge,
}

async fn load_records<T: DeserializeOwned>(
    store: &dyn DocumentStore,
    collection: Collection,
) -> StoreResult<Vec<T>> {
    let docs = store.list(collection.as_str()).await?;
    let mut records = Vec::with_capacity(docs.len());

    for doc in docs {
        let id = doc
            .get("id")
            .and_then(|v| v.as_str())
            .unwrap_or("<none>")
            .to_string();

        match serde_json::from_value(doc) {
            Ok(record) => records.push(record),
            Err(e) => warn!(
                collection = %collection,
                id = %id,
                error = %e,
                "Skipping document that does not match its model"
            ),
        }
    }

    Ok(records)
}

/// Reads every collection as it is stored, without migrating
pub async fn load_snapshot(store: &dyn DocumentStore) -> StoreResult<StoreSnapshot> {
    Ok(StoreSnapshot {
        clients: load_records(store, Collection::Clients).await?,
        subprojects: load_records(store, Collection::Subprojects).await?,
        tasks: load_records(store, Collection::Tasks).await?,
        collaborators: load_records(store, Collection::Collaborators).await?,
        events: load_records(store, Collection::Events).await?,
    })
}

/// Loads, migrates, and persists the migration's changes
pub async fn reconcile_store(store: &dyn DocumentStore) -> StoreResult<Migrated> {
    let loaded = load_snapshot(store).await?;
    let migrated = migrate_snapshot(loaded.into());

    persist_changes(store, &migrated).await?;

    Ok(migrated)
}

async fn persist_changes(store: &dyn DocumentStore, migrated: &Migrated) -> StoreResult<()> {
    let report = &migrated.report;
    if report.is_empty() {
        return Ok(());
    }

    for collaborator in migrated
        .snapshot
        .collaborators
        .iter()
        .filter(|c| report.created_collaborators.contains(&c.id))
    {
        store
            .upsert(
                Collection::Collaborators.as_str(),
                serde_json::to_value(collaborator)?,
            )
            .await?;
    }

    for task in migrated
        .snapshot
        .tasks
        .iter()
        .filter(|t| report.relinked_tasks.contains(&t.id))
    {
        store
            .upsert(Collection::Tasks.as_str(), serde_json::to_value(task)?)
            .await?;
    }

    info!(
        created_collaborators = report.created_collaborators.len(),
        relinked_tasks = report.relinked_tasks.len(),
        "Persisted legacy assignee migration"
    );

    Ok(())
}

/// Writes an imported snapshot into the store
///
/// The result is always migrated. In [`ImportMode::Replace`] every served
/// collection is cleared first, including those absent from the input.
pub async fn import_snapshot(
    store: &dyn DocumentStore,
    input: PartialSnapshot,
    mode: ImportMode,
) -> StoreResult<Migrated> {
    let migrated = match mode {
        ImportMode::Replace => {
            for collection in Collection::ALL {
                store.clear(collection.as_str()).await?;
            }
            migrate_snapshot(input)
        }
        ImportMode::Merge => {
            let base = load_snapshot(store).await?;
            merge_snapshots(base, input)
        }
    };

    for collection in Collection::ALL {
        for doc in migrated.snapshot.documents(collection)? {
            store.upsert(collection.as_str(), doc).await?;
        }
    }

    info!(
        mode = ?mode,
        records = migrated.snapshot.len(),
        created_collaborators = migrated.report.created_collaborators.len(),
        "Imported snapshot"
    );

    Ok(migrated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::task::tests::task_doc;
    use crate::store::memory::MemoryDocumentStore;
    use serde_json::json;

    async fn seeded_store() -> MemoryDocumentStore {
        let store = MemoryDocumentStore::new();
        store.insert("tasks", task_doc("t_1", Some("Maria"))).await.unwrap();
        store.insert("tasks", task_doc("t_2", Some("Kevin"))).await.unwrap();
        store
            .insert("collaborators", json!({"id": "u_kevin00", "name": "kevin", "area": "DEV"}))
            .await
            .unwrap();
        store
    }

    #[tokio::test]
    async fn test_reconcile_persists_only_changes() {
        let store = seeded_store().await;

        let migrated = reconcile_store(&store).await.unwrap();
        assert_eq!(migrated.report.created_collaborators.len(), 1);
        assert_eq!(migrated.report.relinked_tasks, vec!["t_1", "t_2"]);

        let collaborators = store.list("collaborators").await.unwrap();
        assert_eq!(collaborators.len(), 2);
        assert_eq!(collaborators[1]["name"], "Maria");
        assert_eq!(collaborators[1]["area"], "PROJETOS");

        let kevin_task = store.get("tasks", "t_2").await.unwrap().unwrap();
        assert_eq!(kevin_task["assigneeId"], "u_kevin00");

        let again = reconcile_store(&store).await.unwrap();
        assert!(again.report.is_empty());
        assert_eq!(store.list("collaborators").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_load_skips_invalid_documents() {
        let store = seeded_store().await;
        store
            .insert("tasks", json!({"id": "t_bad", "title": "no status"}))
            .await
            .unwrap();

        let snapshot = load_snapshot(&store).await.unwrap();
        assert_eq!(snapshot.tasks.len(), 2);

        // Still stored
        assert!(store.get("tasks", "t_bad").await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_import_replace_clears_everything() {
        let store = seeded_store().await;
        store
            .insert("clients", json!({"id": "c_old", "name": "Old"}))
            .await
            .unwrap();

        let input: PartialSnapshot = serde_json::from_value(json!({
            "clients": [{"id": "c_new", "name": "New"}]
        }))
        .unwrap();

        let migrated = import_snapshot(&store, input, ImportMode::Replace).await.unwrap();
        assert_eq!(migrated.snapshot.clients.len(), 1);

        let clients = store.list("clients").await.unwrap();
        assert_eq!(clients, vec![json!({"id": "c_new", "name": "New"})]);
        assert!(store.list("tasks").await.unwrap().is_empty());
        assert!(store.list("collaborators").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_import_merge_keeps_existing_records() {
        let store = seeded_store().await;

        let input: PartialSnapshot = serde_json::from_value(json!({
            "collaborators": [{"id": "u_kevin00", "name": "Kevin S.", "area": "DEV"}],
            "tasks": [task_doc("t_3", Some("Kevin S."))]
        }))
        .unwrap();

        let migrated = import_snapshot(&store, input, ImportMode::Merge).await.unwrap();

        let tasks = store.list("tasks").await.unwrap();
        assert_eq!(tasks.len(), 3);
        assert_eq!(
            store.get("tasks", "t_3").await.unwrap().unwrap()["assigneeId"],
            "u_kevin00"
        );
        assert_eq!(
            store.get("collaborators", "u_kevin00").await.unwrap().unwrap()["name"],
            "Kevin S."
        );

        // t_1 ("Maria") gets a new collaborator, t_2 ("Kevin") no longer matches the renamed one
        assert_eq!(migrated.report.created_collaborators.len(), 2);
    }

    #[test]
    fn test_import_mode_parses_lowercase() {
        assert_eq!(
            serde_json::from_value::<ImportMode>(json!("merge")).unwrap(),
            ImportMode::Merge
        );
        assert_eq!(ImportMode::default(), ImportMode::Replace);
    }
}
