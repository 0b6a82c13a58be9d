use std::sync::Arc;

use chrono::Utc;
use tokio::{sync::Mutex, task::JoinHandle, time};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::{
    config::AgentSettings,
    db::Database,
    features::{FeatureProbe, FeatureSpec, RetryPolicy},
    log_error, log_info, log_warn,
    models::{CommandContext, CommandLogEntry, CommandStatus, FlagRecord, OutcomeRecord},
    ports::{CardPresenter, CommandLog, DeviceStateStore},
};

use super::state::{FlowPhase, SessionState};
use super::{REASON_LAUNCH_FAILED, REASON_NO_ACTION, REASON_USER_CANCELLED, REASON_USER_GAVE_UP};

const ENABLE_LOGS: bool = true;

/// Collaborators a session talks to. The probe and presenter come from the
/// platform layer; the two remote ports wrap the database/API clients.
pub struct SessionPorts {
    pub probe: Arc<dyn FeatureProbe>,
    pub presenter: Arc<dyn CardPresenter>,
    pub state_store: Arc<dyn DeviceStateStore>,
    pub command_log: Arc<dyn CommandLog>,
    pub flags: Database,
}

/// Drives one prompt session from the initial precondition check to a
/// terminal state.
///
/// All transitions run under the single session mutex, so the no-action
/// timeout and a focus-regain event may race freely: whichever takes the
/// lock first wins, and the state latches keep the loser from reporting
/// a second outcome.
///
/// The embedding activity forwards its lifecycle into this type:
/// `start` on create, `focus_regained` on resume, `shutdown` on destroy,
/// and the two `*_selected` methods for card button presses.
#[derive(Clone)]
pub struct FlowController {
    session_id: String,
    settings: AgentSettings,
    feature: FeatureSpec,
    command: CommandContext,
    ports: Arc<SessionPorts>,
    state: Arc<Mutex<SessionState>>,
    timeout: Arc<Mutex<Option<JoinHandle<()>>>>,
    cancel: CancellationToken,
}

impl FlowController {
    pub fn new(
        settings: AgentSettings,
        feature: FeatureSpec,
        command: CommandContext,
        ports: SessionPorts,
    ) -> Self {
        Self {
            session_id: Uuid::new_v4().to_string(),
            settings,
            feature,
            command,
            ports: Arc::new(ports),
            state: Arc::new(Mutex::new(SessionState::new())),
            timeout: Arc::new(Mutex::new(None)),
            cancel: CancellationToken::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub async fn state(&self) -> SessionState {
        self.state.lock().await.clone()
    }

    pub async fn phase(&self) -> FlowPhase {
        self.state.lock().await.phase
    }

    /// Run the precondition check and show the matching initial card.
    pub async fn start(&self) {
        let satisfied = self.ports.probe.desired_state();

        let mut state = self.state.lock().await;
        if state.phase != FlowPhase::Init {
            log_warn!("[{}] start called twice; ignoring", self.session_id);
            return;
        }
        state.already_satisfied = satisfied;
        state.phase = FlowPhase::ShowingInitialCard;

        log_info!(
            "[{}] {} session started (satisfied={satisfied})",
            self.session_id,
            self.feature.name
        );

        let card = if satisfied {
            self.feature.already_satisfied_card()
        } else {
            self.feature.action_needed_card()
        };
        self.ports.presenter.show(card);
    }

    /// Primary button on whichever card is visible.
    pub async fn primary_selected(&self) {
        let mut state = self.state.lock().await;
        match state.phase {
            FlowPhase::ShowingInitialCard if state.already_satisfied => {
                self.report_outcome(&mut state, true, self.feature.reason_already)
                    .await;
                self.finish(&mut state).await;
            }
            FlowPhase::ShowingInitialCard | FlowPhase::StillUnsatisfied => {
                self.launch_external_action(&mut state).await;
            }
            FlowPhase::ShowingSuccessCard => {
                self.finish(&mut state).await;
            }
            phase => {
                log_warn!(
                    "[{}] primary press ignored in phase {phase:?}",
                    self.session_id
                );
            }
        }
    }

    /// Secondary button (cancel / give up) on a two-button card.
    pub async fn secondary_selected(&self) {
        let mut state = self.state.lock().await;
        match state.phase {
            FlowPhase::ShowingInitialCard if !state.already_satisfied => {
                self.report_outcome(&mut state, false, REASON_USER_CANCELLED)
                    .await;
                self.acknowledge(&mut state, CommandStatus::Failed, REASON_USER_CANCELLED);
                self.finish(&mut state).await;
            }
            FlowPhase::StillUnsatisfied => {
                self.report_outcome(&mut state, false, REASON_USER_GAVE_UP)
                    .await;
                self.acknowledge(&mut state, CommandStatus::Failed, REASON_USER_GAVE_UP);
                self.finish(&mut state).await;
            }
            phase => {
                log_warn!(
                    "[{}] secondary press ignored in phase {phase:?}",
                    self.session_id
                );
            }
        }
    }

    /// The app is foregrounded again after the external screen was shown.
    ///
    /// Always disarms the timeout; only while awaiting the external action
    /// does it re-run the precondition and branch on the result.
    pub async fn focus_regained(&self) {
        let mut state = self.state.lock().await;
        self.disarm_timeout().await;

        if state.phase != FlowPhase::AwaitingExternalAction {
            return;
        }

        if self.ports.probe.desired_state() {
            self.report_outcome(&mut state, true, self.feature.reason_success)
                .await;
            self.acknowledge(
                &mut state,
                CommandStatus::Executed,
                self.feature.reason_success,
            );
            state.phase = FlowPhase::ShowingSuccessCard;
            self.ports.presenter.show(self.feature.success_card());
            return;
        }

        match self.feature.retry {
            RetryPolicy::FailImmediately { reason } => {
                self.report_outcome(&mut state, false, reason).await;
                self.acknowledge(&mut state, CommandStatus::Failed, reason);
                self.finish(&mut state).await;
            }
            RetryPolicy::OfferRetry => {
                // No outcome yet; the user decides between retry and give-up.
                state.phase = FlowPhase::StillUnsatisfied;
                self.ports.presenter.show(self.feature.retry_card());
            }
        }
    }

    /// Tear the session down (activity destroyed). Disarms the timeout and
    /// abandons any in-flight acknowledgment; reports nothing and does not
    /// touch the presenter, whose surface is already going away.
    pub async fn shutdown(&self) {
        let mut state = self.state.lock().await;
        self.disarm_timeout().await;
        self.cancel.cancel();
        if !state.is_terminal() {
            log_info!("[{}] session torn down before completion", self.session_id);
            state.phase = FlowPhase::Terminated;
        }
    }

    async fn launch_external_action(&self, state: &mut SessionState) {
        state.action_requested = true;
        match self.ports.probe.request_desired_state() {
            Ok(()) => {
                state.phase = FlowPhase::AwaitingExternalAction;
                self.arm_timeout().await;
            }
            Err(err) => {
                log_error!(
                    "[{}] external action failed to launch: {err:#}",
                    self.session_id
                );
                self.report_outcome(state, false, REASON_LAUNCH_FAILED).await;
                self.acknowledge(state, CommandStatus::Failed, REASON_LAUNCH_FAILED);
                self.finish(state).await;
            }
        }
    }

    /// Report the session outcome to both sinks, at most once.
    ///
    /// The local flag write is awaited (and its failure only logged); the
    /// remote status write is fire-and-forget on a detached task.
    async fn report_outcome(&self, state: &mut SessionState, is_desired: bool, reason: &str) {
        if !state.try_latch_status() {
            log_info!(
                "[{}] outcome already reported; dropping ({is_desired}, {reason})",
                self.session_id
            );
            return;
        }

        let now = Utc::now();
        let record = FlagRecord {
            feature: self.feature.flag_key.to_string(),
            is_desired,
            reason: reason.to_string(),
            updated_at: now,
            command_key: self.command.key.clone(),
            command_ts: (self.command.issued_at_ms > 0).then_some(self.command.issued_at_ms),
        };
        if let Err(err) = self.ports.flags.upsert_flag(&record).await {
            log_error!("[{}] failed to persist outcome flag: {err:#}", self.session_id);
        }

        let updated_at = now.timestamp_millis();
        let document = OutcomeRecord {
            is_desired_state: is_desired,
            reason: reason.to_string(),
            updated_at,
            command_key: self.command.key.clone(),
            command_timestamp: self.command.issued_at_ms,
            extras: self.ports.probe.status_extras(),
        }
        .into_document();

        let path = format!(
            "{}/systemInfo/{}/{}",
            self.settings.device_root, self.feature.status_name, updated_at
        );
        let store = self.ports.state_store.clone();
        let session_id = self.session_id.clone();
        tokio::spawn(async move {
            if let Err(err) = store.write_status(&path, document).await {
                log_error!("[{session_id}] status write to {path} failed: {err:#}");
            }
        });

        log_info!(
            "[{}] outcome reported: ({is_desired}, {reason})",
            self.session_id
        );
    }

    /// Log the command result to the remote history API, at most once, and
    /// only when the session carries a valid command context. The call runs
    /// on a detached task raced against the session's cancellation token.
    fn acknowledge(&self, state: &mut SessionState, status: CommandStatus, reason: &str) {
        if !self.command.is_valid() {
            log_info!(
                "[{}] no command context; skipping acknowledgment",
                self.session_id
            );
            return;
        }
        if !state.try_latch_history() {
            return;
        }

        let entry = CommandLogEntry {
            device_id: self.settings.device_id.clone(),
            command: self.command.key.clone().unwrap_or_default(),
            value: None,
            status,
            received_at: self.command.issued_at_ms,
            executed_at: Utc::now().timestamp_millis(),
            error_message: reason.to_string(),
        };

        let command_log = self.ports.command_log.clone();
        let token = self.cancel.clone();
        let session_id = self.session_id.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = token.cancelled() => {
                    log_info!("[{session_id}] acknowledgment abandoned on teardown");
                }
                result = command_log.log_command(entry) => {
                    if let Err(err) = result {
                        log_error!("[{session_id}] command log call failed: {err:#}");
                    }
                }
            }
        });
    }

    async fn finish(&self, state: &mut SessionState) {
        if state.is_terminal() {
            return;
        }
        state.phase = FlowPhase::Terminated;
        self.disarm_timeout().await;
        self.ports.presenter.close();
        log_info!("[{}] session ended", self.session_id);
    }

    /// Schedule the no-action fallback, replacing any previous timer.
    async fn arm_timeout(&self) {
        let mut guard = self.timeout.lock().await;
        if let Some(handle) = guard.take() {
            handle.abort();
        }

        let controller = self.clone();
        let timeout = self.settings.no_action_timeout();
        let handle = tokio::spawn(async move {
            time::sleep(timeout).await;
            controller.handle_no_action().await;
        });
        *guard = Some(handle);
    }

    async fn disarm_timeout(&self) {
        if let Some(handle) = self.timeout.lock().await.take() {
            handle.abort();
        }
    }

    async fn handle_no_action(&self) {
        let mut state = self.state.lock().await;
        if state.is_terminal() || state.status_synced || !state.action_requested {
            return;
        }

        log_warn!(
            "[{}] no user action within {}ms; giving up",
            self.session_id,
            self.settings.no_action_timeout_ms
        );
        self.report_outcome(&mut state, false, REASON_NO_ACTION).await;
        self.acknowledge(&mut state, CommandStatus::Failed, REASON_NO_ACTION);
        self.finish(&mut state).await;
    }
}
