use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One bot configuration record.
///
/// Only the id is required; everything else is free-form JSON chosen by
/// the web interface. Older deployments used `bot_id` as the key name,
/// so both spellings are accepted on input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BotConfig {
    #[serde(alias = "bot_id")]
    pub id: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl BotConfig {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: Map::new(),
        }
    }

    pub fn with_field(mut self, key: impl Into<String>, value: Value) -> Self {
        self.fields.insert(key.into(), value);
        self
    }
}
