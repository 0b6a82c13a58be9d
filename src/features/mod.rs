mod connectivity;
mod messaging;

pub use connectivity::connectivity;
pub use messaging::messaging_handler;

use anyhow::Result;
use serde_json::{Map, Value};

use crate::cards::{CardKind, CardSpec};

/// What to do when the user comes back from the external screen and the
/// desired state still does not hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetryPolicy {
    /// Report failure with the given reason and end the session.
    FailImmediately { reason: &'static str },
    /// Show a retry card and let the user try again or give up.
    OfferRetry,
}

/// Card texts for one feature, in card order: action-needed, already
/// satisfied, success, and (optional) retry.
#[derive(Debug, Clone)]
pub struct CardTexts {
    pub action_title: &'static str,
    pub action_body: &'static str,
    pub action_primary: &'static str,
    pub action_secondary: &'static str,
    pub satisfied_title: &'static str,
    pub satisfied_body: &'static str,
    pub satisfied_primary: &'static str,
    pub success_title: &'static str,
    pub success_body: &'static str,
    pub success_primary: &'static str,
    pub retry_title: &'static str,
    pub retry_body: &'static str,
    pub retry_primary: &'static str,
    pub retry_secondary: &'static str,
}

/// Everything that differs between the two prompt features: naming, remote
/// path segment, reason codes, card texts, and the unsatisfied-return policy.
#[derive(Debug, Clone)]
pub struct FeatureSpec {
    pub name: &'static str,
    /// Path segment under `<device-root>/systemInfo/`.
    pub status_name: &'static str,
    /// Row key in local flag storage.
    pub flag_key: &'static str,
    pub reason_already: &'static str,
    pub reason_success: &'static str,
    pub retry: RetryPolicy,
    pub cards: CardTexts,
}

impl FeatureSpec {
    pub fn action_needed_card(&self) -> CardSpec {
        CardSpec::new(
            CardKind::ActionNeeded,
            self.cards.action_title,
            self.cards.action_body,
            self.cards.action_primary,
            Some(self.cards.action_secondary),
        )
    }

    pub fn already_satisfied_card(&self) -> CardSpec {
        CardSpec::new(
            CardKind::AlreadySatisfied,
            self.cards.satisfied_title,
            self.cards.satisfied_body,
            self.cards.satisfied_primary,
            None,
        )
    }

    pub fn success_card(&self) -> CardSpec {
        CardSpec::new(
            CardKind::Success,
            self.cards.success_title,
            self.cards.success_body,
            self.cards.success_primary,
            None,
        )
    }

    pub fn retry_card(&self) -> CardSpec {
        CardSpec::new(
            CardKind::StillUnsatisfied,
            self.cards.retry_title,
            self.cards.retry_body,
            self.cards.retry_primary,
            Some(self.cards.retry_secondary),
        )
    }
}

/// Platform side of a feature: querying and requesting the desired state.
///
/// `desired_state` must always resolve to a definite boolean; when the
/// platform cannot tell, it answers `false` ("not yet satisfied") rather
/// than erroring. `request_desired_state` may fail (e.g. the settings
/// screen cannot be opened), which the flow treats as a terminal failure.
pub trait FeatureProbe: Send + Sync {
    fn desired_state(&self) -> bool;

    fn request_desired_state(&self) -> Result<()>;

    /// Feature-specific fields merged into the remote status document,
    /// e.g. the current default package or the active network type.
    fn status_extras(&self) -> Map<String, Value> {
        Map::new()
    }
}
