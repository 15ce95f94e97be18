/// Subproject model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubprojectStatus {
    #[serde(rename = "Ativo")]
    Active,

    #[serde(rename = "Pausado")]
    Paused,

    #[serde(rename = "Concluído")]
    Done,
}

/// A project within a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subproject {
    pub id: String,

    pub name: String,

    /// Owning client; not enforced
    pub client_id: String,

    pub status: SubprojectStatus,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,

    /// Deadline
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Subproject {
    fn id(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_subproject_roundtrip_keeps_unknown_fields() {
        let doc = json!({
            "id": "s_1",
            "name": "Site",
            "clientId": "c_1",
            "status": "Concluído",
            "endDate": "2024-12-01",
            "budget": 1200
        });

        let subproject: Subproject = serde_json::from_value(doc.clone()).unwrap();
        assert_eq!(subproject.status, SubprojectStatus::Done);
        assert_eq!(subproject.extra.get("budget"), Some(&json!(1200)));
        assert_eq!(serde_json::to_value(&subproject).unwrap(), doc);
    }

    #[test]
    fn test_subproject_requires_client() {
        let result: Result<Subproject, _> =
            serde_json::from_value(json!({"id": "s_1", "name": "Site", "status": "Ativo"}));
        assert!(result.is_err());
    }
}
