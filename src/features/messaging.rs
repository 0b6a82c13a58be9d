use super::{CardTexts, FeatureSpec, RetryPolicy};

/// Default-messaging-handler prompt.
///
/// Coming back from the system chooser without the role is a dead end for
/// this feature: the chooser already offered every option, so the session
/// reports failure right away instead of re-prompting.
pub fn messaging_handler() -> FeatureSpec {
    FeatureSpec {
        name: "messaging_handler",
        status_name: "smsHandlerStatus",
        flag_key: "messaging_handler",
        reason_already: "already_default_on_open",
        reason_success: "user_set_default",
        retry: RetryPolicy::FailImmediately {
            reason: "not_default",
        },
        cards: CardTexts {
            action_title: "Set default messaging app",
            action_body: "To keep messages in sync, set this app as your default messaging app.",
            action_primary: "Set as default",
            action_secondary: "Cancel",
            satisfied_title: "Messaging is set up",
            satisfied_body: "This app is already your default messaging app.",
            satisfied_primary: "OK",
            success_title: "All set",
            success_body: "This app is now your default messaging app.",
            success_primary: "Done",
            // Never shown for this feature; kept so card texts stay total.
            retry_title: "Not set as default",
            retry_body: "This app is still not your default messaging app.",
            retry_primary: "Try again",
            retry_secondary: "Cancel",
        },
    }
}
