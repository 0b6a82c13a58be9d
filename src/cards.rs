use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum CardKind {
    /// Two-button prompt: primary launches the external flow, secondary cancels.
    ActionNeeded,
    /// Single-button card shown when the desired state already holds.
    AlreadySatisfied,
    /// Single-button card shown after the desired state was reached.
    Success,
    /// Two-button retry prompt (connectivity only).
    StillUnsatisfied,
}

/// Description of one templated overlay card.
///
/// Rendering and animation are the presenter's problem; the flow only
/// decides which card is visible and reacts to which button was pressed.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CardSpec {
    pub kind: CardKind,
    pub title: String,
    pub body: String,
    pub primary_label: String,
    pub secondary_label: Option<String>,
}

impl CardSpec {
    pub fn new(
        kind: CardKind,
        title: impl Into<String>,
        body: impl Into<String>,
        primary_label: impl Into<String>,
        secondary_label: Option<&str>,
    ) -> Self {
        Self {
            kind,
            title: title.into(),
            body: body.into(),
            primary_label: primary_label.into(),
            secondary_label: secondary_label.map(str::to_string),
        }
    }
}
