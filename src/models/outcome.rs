use serde::Serialize;
use serde_json::{Map, Value};

/// Status document pushed to the remote device-state store.
///
/// Written under `<device-root>/systemInfo/<feature>Status/<updatedAt>`,
/// append-only from the store's point of view. `extras` carries the
/// feature-specific fields (current default package, network type, ...)
/// flattened into the document.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRecord {
    pub is_desired_state: bool,
    pub reason: String,
    pub updated_at: i64,
    pub command_key: Option<String>,
    pub command_timestamp: i64,
    #[serde(flatten)]
    pub extras: Map<String, Value>,
}

impl OutcomeRecord {
    pub fn into_document(self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}
