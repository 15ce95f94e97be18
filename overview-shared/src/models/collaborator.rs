/// Collaborator model

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{generate_id, Record};

/// Prefix of generated collaborator ids
pub const COLLABORATOR_ID_PREFIX: char = 'u';

/// Team area a collaborator belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Area {
    #[serde(rename = "DEV")]
    Development,

    #[serde(rename = "UX/UI")]
    Design,

    #[serde(rename = "SEO")]
    Seo,

    #[default]
    #[serde(rename = "PROJETOS")]
    Projects,

    #[serde(rename = "GESTÃO")]
    Management,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collaborator {
    pub id: String,

    pub name: String,

    #[serde(default)]
    pub area: Area,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Collaborator {
    /// New collaborator with a generated id and the default area
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: generate_id(COLLABORATOR_ID_PREFIX),
            name: name.into(),
            area: Area::default(),
            extra: Map::new(),
        }
    }
}

impl Record for Collaborator {
    fn id(&self) -> &str {
        &self.id
    }
}
