use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Latest reported outcome for one feature, persisted locally.
///
/// Overwritten on every report; nothing in this crate reads it back except
/// diagnostics, but the embedding app uses it to avoid re-prompting.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FlagRecord {
    pub feature: String,
    pub is_desired: bool,
    pub reason: String,
    pub updated_at: DateTime<Utc>,
    pub command_key: Option<String>,
    pub command_ts: Option<i64>,
}
