use serde::Serialize;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FlowPhase {
    Init,
    ShowingInitialCard,
    AwaitingExternalAction,
    StillUnsatisfied,
    ShowingSuccessCard,
    Terminated,
}

impl Default for FlowPhase {
    fn default() -> Self {
        FlowPhase::Init
    }
}

/// Per-session state. The three booleans are monotonic latches: they only
/// ever go false -> true and are never reset, which is what keeps the
/// outcome report and the command acknowledgment at-most-once even when
/// the timeout and a focus-regain event race.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub phase: FlowPhase,
    pub already_satisfied: bool,
    pub action_requested: bool,
    pub status_synced: bool,
    pub history_updated: bool,
}

impl Default for SessionState {
    fn default() -> Self {
        Self {
            phase: FlowPhase::Init,
            already_satisfied: false,
            action_requested: false,
            status_synced: false,
            history_updated: false,
        }
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check-and-set for the outcome-report latch. Returns true exactly once.
    pub fn try_latch_status(&mut self) -> bool {
        if self.status_synced {
            return false;
        }
        self.status_synced = true;
        true
    }

    /// Check-and-set for the command-acknowledgment latch. Returns true
    /// exactly once, independently of [`Self::try_latch_status`].
    pub fn try_latch_history(&mut self) -> bool {
        if self.history_updated {
            return false;
        }
        self.history_updated = true;
        true
    }

    pub fn is_terminal(&self) -> bool {
        self.phase == FlowPhase::Terminated
    }
}
