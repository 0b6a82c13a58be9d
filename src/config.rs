use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf, sync::RwLock, time::Duration};

pub const DEFAULT_NO_ACTION_TIMEOUT_MS: u64 = 60_000;

/// Ambient parameters a session needs: who this device is, where its
/// remote document tree lives, and how long to wait for the user.
///
/// Passed into the flow controller explicitly rather than read from
/// globals, so sessions stay testable without a platform runtime.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AgentSettings {
    pub device_id: String,
    /// Root of this device's subtree in the remote store, e.g. `devices/<id>`.
    pub device_root: String,
    pub no_action_timeout_ms: u64,
}

impl AgentSettings {
    pub fn new(device_id: impl Into<String>, device_root: impl Into<String>) -> Self {
        Self {
            device_id: device_id.into(),
            device_root: device_root.into(),
            no_action_timeout_ms: DEFAULT_NO_ACTION_TIMEOUT_MS,
        }
    }

    pub fn no_action_timeout(&self) -> Duration {
        Duration::from_millis(self.no_action_timeout_ms)
    }
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            device_id: String::new(),
            device_root: String::new(),
            no_action_timeout_ms: DEFAULT_NO_ACTION_TIMEOUT_MS,
        }
    }
}

/// JSON-file-backed settings, shared read-mostly across the app.
pub struct SettingsStore {
    path: PathBuf,
    data: RwLock<AgentSettings>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Result<Self> {
        let data = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read settings from {}", path.display()))?;
            serde_json::from_str(&contents).unwrap_or_default()
        } else {
            AgentSettings::default()
        };

        Ok(Self {
            path,
            data: RwLock::new(data),
        })
    }

    pub fn agent(&self) -> AgentSettings {
        self.data.read().unwrap().clone()
    }

    pub fn update_agent(&self, settings: AgentSettings) -> Result<()> {
        {
            let mut guard = self.data.write().unwrap();
            *guard = settings;
            self.persist(&guard)?;
        }
        Ok(())
    }

    fn persist(&self, data: &AgentSettings) -> Result<()> {
        let serialized = serde_json::to_string_pretty(data)?;
        fs::write(&self.path, serialized)
            .with_context(|| format!("Failed to write settings to {}", self.path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn missing_file_yields_defaults() {
        let path = std::env::temp_dir().join(format!("nudge-settings-{}.json", Uuid::new_v4()));
        let store = SettingsStore::new(path).unwrap();
        assert_eq!(store.agent().no_action_timeout_ms, DEFAULT_NO_ACTION_TIMEOUT_MS);
    }

    #[test]
    fn update_persists_and_reloads() {
        let path = std::env::temp_dir().join(format!("nudge-settings-{}.json", Uuid::new_v4()));
        let store = SettingsStore::new(path.clone()).unwrap();

        let settings = AgentSettings::new("device-42", "devices/device-42");
        store.update_agent(settings.clone()).unwrap();

        let reloaded = SettingsStore::new(path.clone()).unwrap();
        assert_eq!(reloaded.agent(), settings);

        let _ = fs::remove_file(path);
    }
}
