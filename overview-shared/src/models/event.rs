/// Timeline event model
///
/// Events are the timeline of a client: meetings, deliveries, blockers and
/// so on. `owner` is the legacy free-text responsible person; `owners` holds
/// collaborator ids.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    #[serde(rename = "Reunião")]
    Meeting,

    #[serde(rename = "Cobrança")]
    FollowUp,

    #[serde(rename = "Aprovação")]
    Approval,

    #[serde(rename = "Entrega")]
    Delivery,

    #[serde(rename = "Decisão")]
    Decision,

    #[serde(rename = "Bloqueio")]
    Blocker,

    #[serde(rename = "Atualização")]
    Update,

    #[serde(rename = "Risco")]
    Risk,

    #[serde(rename = "Alinhamento interno")]
    InternalAlignment,

    #[serde(rename = "Contato sem retorno")]
    NoResponse,
}

/// Who the next move is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PendingFrom {
    #[serde(rename = "Cliente")]
    Client,

    #[serde(rename = "Equipe")]
    Team,

    #[serde(rename = "Ambos")]
    Both,

    #[serde(rename = "Nenhum")]
    Nobody,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: String,

    /// When the entry was recorded
    pub created_at: String,

    /// When the event happened, if different
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub when: Option<String>,

    #[serde(rename = "type")]
    pub kind: EventType,

    /// Short line shown on the timeline
    pub summary: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,

    pub client_id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subproject_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owners: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pending_from: Option<PendingFrom>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub follow_up_at: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_alert: Option<bool>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Event {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_event_type_field_is_named_type() {
        let event: Event = serde_json::from_value(json!({
            "id": "e_1",
            "createdAt": "2024-05-02T10:00:00Z",
            "type": "Alinhamento interno",
            "summary": "Kickoff",
            "clientId": "c_1",
            "owners": ["u_1", "u_2"],
            "pendingFrom": "Equipe",
            "isAlert": true
        }))
        .unwrap();

        assert_eq!(event.kind, EventType::InternalAlignment);
        assert_eq!(event.pending_from, Some(PendingFrom::Team));
        assert_eq!(event.owners.as_deref().map(<[String]>::len), Some(2));
        assert_eq!(event.is_alert, Some(true));

        let back = serde_json::to_value(&event).unwrap();
        assert_eq!(back["type"], "Alinhamento interno");
        assert!(back.get("kind").is_none());
    }

    #[test]
    fn test_event_requires_summary() {
        let result: Result<Event, _> = serde_json::from_value(json!({
            "id": "e_1",
            "createdAt": "2024-05-02T10:00:00Z",
            "type": "Risco",
            "clientId": "c_1"
        }));
        assert!(result.is_err());
    }
}
