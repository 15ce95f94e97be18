/// Store snapshots
///
/// A [`StoreSnapshot`] is the whole dashboard in one value, as exported by
/// `GET /api/snapshot` and the admin `export` command. A
/// [`PartialSnapshot`] is what an import file may contain: any collection
/// may be missing.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    client::Client, collaborator::Collaborator, collection::Collection, event::Event,
    subproject::Subproject, task::Task,
};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreSnapshot {
    pub clients: Vec<Client>,
    pub subprojects: Vec<Subproject>,
    pub tasks: Vec<Task>,
    pub collaborators: Vec<Collaborator>,
    pub events: Vec<Event>,
}

/// Snapshot input with optional collections
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clients: Option<Vec<Client>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subprojects: Option<Vec<Subproject>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks: Option<Vec<Task>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collaborators: Option<Vec<Collaborator>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub events: Option<Vec<Event>>,
}

impl StoreSnapshot {
    /// Total number of records
    pub fn len(&self) -> usize {
        self.clients.len()
            + self.subprojects.len()
            + self.tasks.len()
            + self.collaborators.len()
            + self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Documents of one collection, serialized
    pub fn documents(&self, collection: Collection) -> Result<Vec<Value>, serde_json::Error> {
        fn to_values<T: Serialize>(records: &[T]) -> Result<Vec<Value>, serde_json::Error> {
            records.iter().map(serde_json::to_value).collect()
        }

        match collection {
            Collection::Clients => to_values(&self.clients),
            Collection::Subprojects => to_values(&self.subprojects),
            Collection::Tasks => to_values(&self.tasks),
            Collection::Collaborators => to_values(&self.collaborators),
            Collection::Events => to_values(&self.events),
        }
    }
}

impl From<StoreSnapshot> for PartialSnapshot {
    fn from(snapshot: StoreSnapshot) -> Self {
        Self {
            clients: Some(snapshot.clients),
            subprojects: Some(snapshot.subprojects),
            tasks: Some(snapshot.tasks),
            collaborators: Some(snapshot.collaborators),
            events: Some(snapshot.events),
        }
    }
}
