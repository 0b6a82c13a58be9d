//! Ports for the remote and UI collaborators.
//!
//! The flow controller only ever talks to these traits; the embedding app
//! supplies the concrete remote database client, command-history API client
//! and card renderer.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use crate::cards::CardSpec;
use crate::models::CommandLogEntry;

/// Write-only view of the remote device-state store.
///
/// Writes are fire-and-forget from the flow's point of view: a failed write
/// is logged and never retried, and never blocks or alters the session.
#[async_trait]
pub trait DeviceStateStore: Send + Sync {
    /// Write `document` at `path` (slash-separated, rooted at the device).
    async fn write_status(&self, path: &str, document: Value) -> Result<()>;
}

/// Remote command-history API.
#[async_trait]
pub trait CommandLog: Send + Sync {
    async fn log_command(&self, entry: CommandLogEntry) -> Result<()>;
}

/// Renders the overlay cards and tears the surface down.
///
/// Implementations dispatch to the UI layer; user button presses come back
/// into the flow through the controller's `*_selected` methods.
pub trait CardPresenter: Send + Sync {
    fn show(&self, card: CardSpec);

    /// Dismiss any visible card and release the surface. Called exactly
    /// once, when the session reaches its terminal state.
    fn close(&self);
}
