use serde::{Deserialize, Serialize};

/// Identity of the remote command that triggered a session, if any.
///
/// Sessions can also start without a command context (e.g. a locally
/// scheduled recheck); in that case `key` is absent and `issued_at_ms`
/// carries the [`CommandContext::NO_TIMESTAMP`] sentinel. Such sessions
/// never produce a command-history update.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommandContext {
    pub key: Option<String>,
    pub issued_at_ms: i64,
}

impl CommandContext {
    /// Sentinel for "no command timestamp was supplied".
    pub const NO_TIMESTAMP: i64 = -1;

    pub fn new(key: impl Into<String>, issued_at_ms: i64) -> Self {
        Self {
            key: Some(key.into()),
            issued_at_ms,
        }
    }

    /// A session started without any triggering command.
    pub fn none() -> Self {
        Self {
            key: None,
            issued_at_ms: Self::NO_TIMESTAMP,
        }
    }

    /// True when both a non-empty key and a positive timestamp are present.
    /// Only valid contexts may be acknowledged to the command log.
    pub fn is_valid(&self) -> bool {
        matches!(&self.key, Some(key) if !key.is_empty()) && self.issued_at_ms > 0
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CommandStatus {
    Executed,
    Failed,
}

impl CommandStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CommandStatus::Executed => "executed",
            CommandStatus::Failed => "failed",
        }
    }
}

/// One entry for the remote command-history API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CommandLogEntry {
    pub device_id: String,
    pub command: String,
    pub value: Option<String>,
    pub status: CommandStatus,
    pub received_at: i64,
    pub executed_at: i64,
    pub error_message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn context_requires_key_and_positive_timestamp() {
        assert!(CommandContext::new("setDefaultSms", 1_700_000_000_000).is_valid());
        assert!(!CommandContext::none().is_valid());
        assert!(!CommandContext::new("", 1_700_000_000_000).is_valid());
        assert!(!CommandContext::new("setDefaultSms", 0).is_valid());
        assert!(!CommandContext::new("setDefaultSms", CommandContext::NO_TIMESTAMP).is_valid());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&CommandStatus::Executed).unwrap(),
            "\"executed\""
        );
        assert_eq!(CommandStatus::Failed.as_str(), "failed");
    }
}
