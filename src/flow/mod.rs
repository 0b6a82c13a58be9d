pub mod controller;
pub mod state;

pub use controller::{FlowController, SessionPorts};
pub use state::{FlowPhase, SessionState};

/// Reason codes shared by both features. Feature-specific codes
/// (`already_*`, `user_*`, `not_default`) live on [`crate::features::FeatureSpec`].
pub const REASON_USER_CANCELLED: &str = "user_cancelled";
pub const REASON_USER_GAVE_UP: &str = "user_gave_up";
pub const REASON_NO_ACTION: &str = "no_action";
pub const REASON_LAUNCH_FAILED: &str = "launch_failed";
