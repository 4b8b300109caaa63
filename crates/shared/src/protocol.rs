use serde::{Deserialize, Serialize};

/// One entry of the cat API's `/api/cats` listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatRecord {
    #[serde(alias = "_id")]
    pub id: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mimetype: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShareMechanism {
    Native,
    Clipboard,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShareResult {
    pub delivered: bool,
    pub mechanism: ShareMechanism,
}

impl ShareResult {
    pub fn delivered(mechanism: ShareMechanism) -> Self {
        Self {
            delivered: true,
            mechanism,
        }
    }

    pub fn not_delivered() -> Self {
        Self {
            delivered: false,
            mechanism: ShareMechanism::None,
        }
    }
}
