use super::{CardTexts, FeatureSpec, RetryPolicy};

/// Internet-connectivity prompt.
///
/// Unlike the messaging feature, coming back still offline is not terminal:
/// the user may have toggled the wrong setting, so a retry card is offered
/// and no outcome is reported until they give up or eventually succeed.
pub fn connectivity() -> FeatureSpec {
    FeatureSpec {
        name: "connectivity",
        status_name: "internetStatus",
        flag_key: "connectivity",
        reason_already: "already_connected",
        reason_success: "user_connected",
        retry: RetryPolicy::OfferRetry,
        cards: CardTexts {
            action_title: "No internet connection",
            action_body: "Turn on Wi-Fi or mobile data so this device can stay in sync.",
            action_primary: "Open settings",
            action_secondary: "Cancel",
            satisfied_title: "You're online",
            satisfied_body: "This device is already connected to the internet.",
            satisfied_primary: "OK",
            success_title: "Connected",
            success_body: "This device is back online.",
            success_primary: "Done",
            retry_title: "Still offline",
            retry_body: "No connection was detected. Check Wi-Fi or mobile data and try again.",
            retry_primary: "Try again",
            retry_secondary: "Cancel",
        },
    }
}
