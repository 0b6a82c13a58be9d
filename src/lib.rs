//! Remote-triggered device-state prompt flow.
//!
//! A remote command asks the device to reach some state (become the default
//! messaging handler, get back online). This crate drives the resulting
//! interaction: pick the right overlay card, hand control to the external
//! system screen, watch the clock, and report the outcome exactly once to
//! local flag storage, the remote device-state store, and the command
//! history API.
//!
//! The platform pieces (precondition probes, settings intents, card
//! rendering, the concrete remote clients) are ports; see [`ports`] and
//! [`features::FeatureProbe`].

pub mod cards;
pub mod config;
pub mod db;
pub mod features;
pub mod flow;
pub mod logging;
pub mod models;
pub mod ports;

pub use cards::{CardKind, CardSpec};
pub use config::{AgentSettings, SettingsStore};
pub use db::Database;
pub use features::{connectivity, messaging_handler, FeatureProbe, FeatureSpec, RetryPolicy};
pub use flow::{FlowController, FlowPhase, SessionPorts, SessionState};
pub use models::{CommandContext, CommandLogEntry, CommandStatus, FlagRecord, OutcomeRecord};
pub use ports::{CardPresenter, CommandLog, DeviceStateStore};
