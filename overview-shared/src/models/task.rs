/// Task model
///
/// Tasks used to name their assignee as free text (`assignee`). Newer
/// records reference a collaborator by id (`assigneeId`); the migration in
/// [`crate::migration`] converts the former into the latter. Both fields are
/// kept so older front-ends still display something.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{client::Priority, Record};

/// Workflow column of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TaskStatus {
    #[serde(rename = "Pendente")]
    Pending,

    #[serde(rename = "Em andamento")]
    InProgress,

    #[serde(rename = "Aguardando cliente")]
    WaitingOnClient,

    #[serde(rename = "Concluída")]
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WorkType {
    Site,
    App,
    #[serde(rename = "SEO")]
    Seo,
    Infra,
    #[serde(rename = "Outros")]
    Other,
}

/// Where a demand came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemandOrigin {
    #[serde(rename = "Cliente")]
    Client,

    #[serde(rename = "Interno")]
    Internal,

    #[serde(rename = "Outro projeto")]
    OtherProject,
}

/// A unit of work inside a subproject
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,

    pub title: String,

    pub status: TaskStatus,

    pub priority: Priority,

    /// Legacy free-text assignee name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<String>,

    /// Weak reference to a collaborator id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,

    pub work_type: WorkType,

    pub origin: DemandOrigin,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Link to another subproject
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation_id: Option<String>,

    pub subproject_id: String,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Task {
    /// Whether the task already references a collaborator
    ///
    /// An empty `assigneeId` counts as no reference.
    pub fn has_assignee(&self) -> bool {
        self.assignee_id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Legacy assignee name, trimmed, when it is not blank
    pub fn legacy_assignee(&self) -> Option<&str> {
        self.assignee
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

impl Record for Task {
    fn id(&self) -> &str {
        &self.id
    }
}
