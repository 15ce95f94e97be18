/// The collections served by the collection API
///
/// Anything not in [`Collection::ALL`] is unknown to the API and answers
/// 404. In particular the `users` collection is never listed.

use std::{fmt, str::FromStr};

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use super::{
    client::Client, collaborator::Collaborator, event::Event, subproject::Subproject, task::Task,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Clients,
    Subprojects,
    Tasks,
    Collaborators,
    Events,
}

/// Returned when a path names a collection outside the allow-list
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown collection: {0}")]
pub struct UnknownCollection(pub String);

impl Collection {
    /// Every served collection, in snapshot order
    pub const ALL: [Collection; 5] = [
        Collection::Clients,
        Collection::Subprojects,
        Collection::Tasks,
        Collection::Collaborators,
        Collection::Events,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Clients => "clients",
            Collection::Subprojects => "subprojects",
            Collection::Tasks => "tasks",
            Collection::Collaborators => "collaborators",
            Collection::Events => "events",
        }
    }

    /// First letter of the collection name, used for generated ids
    pub fn id_prefix(&self) -> char {
        match self {
            Collection::Clients => 'c',
            Collection::Subprojects => 's',
            Collection::Tasks => 't',
            Collection::Collaborators => 'c',
            Collection::Events => 'e',
        }
    }

    /// Validates a document against the collection's model
    ///
    /// Returns the normalized document: known fields re-serialized in their
    /// canonical form, unknown fields kept as they were.
    pub fn validate(&self, doc: Value) -> Result<Value, serde_json::Error> {
        match self {
            Collection::Clients => normalize::<Client>(doc),
            Collection::Subprojects => normalize::<Subproject>(doc),
            Collection::Tasks => normalize::<Task>(doc),
            Collection::Collaborators => normalize::<Collaborator>(doc),
            Collection::Events => normalize::<Event>(doc),
        }
    }
}

fn normalize<T: DeserializeOwned + Serialize>(doc: Value) -> Result<Value, serde_json::Error> {
    let typed: T = serde_json::from_value(doc)?;
    serde_json::to_value(typed)
}

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Collection::ALL
            .into_iter()
            .find(|c| c.as_str() == s)
            .ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
