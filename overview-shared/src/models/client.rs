/// Client model
///
/// ```json
/// {
///   "id": "c_k3j9x0a",
///   "name": "Padaria Central",
///   "priority": "Alta",
///   "health": "Atenção",
///   "color": "#22c55e"
/// }
/// ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Record;

/// Priority shared by clients and tasks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Priority {
    #[serde(rename = "Alta")]
    High,

    #[default]
    #[serde(rename = "Média")]
    Medium,

    #[serde(rename = "Baixa")]
    Low,
}

/// Account health
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Health {
    #[default]
    #[serde(rename = "Saudável")]
    Healthy,

    #[serde(rename = "Atenção")]
    Attention,

    #[serde(rename = "Crítico")]
    Critical,
}

/// An agency client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,

    pub name: String,

    /// Email or phone
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channels: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,

    /// SLA or hours per month
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contract: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health: Option<Health>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_touch: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_follow_up: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risks: Option<String>,

    /// Planned vs consumed hours, free text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month_hours: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Theme color as a hex string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Record for Client {
    fn id(&self) -> &str {
        &self.id
    }
}
