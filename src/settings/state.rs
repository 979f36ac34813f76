//! Persisted state - JSON file with the webhook URL and notified reminders

use fs2::FileExt;
use serde::{Deserialize, Serialize};
use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::error::{Result, SettingsError};
use super::get_app_dir;
use crate::schedule::NotifiedSet;

/// On-disk shape: `{ "webhookUrl": "...", "notifiedTasks": ["..."] }`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct State {
    #[serde(default)]
    pub webhook_url: String,

    #[serde(default)]
    pub notified_tasks: NotifiedSet,
}

impl State {
    pub fn has_webhook(&self) -> bool {
        !self.webhook_url.trim().is_empty()
    }
}

/// Reads and writes [`State`]. Every write goes through an exclusive lock on
/// a sibling `.lock` file so a running daemon and a one-off CLI command do
/// not overwrite each other.
#[derive(Debug, Clone)]
pub struct StateStore {
    path: PathBuf,
}

impl StateStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at `<app dir>/data.json`
    pub fn open_default() -> Result<Self> {
        Ok(Self::new(get_app_dir()?.join("data.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the state; a missing or empty file yields the default state
    pub fn load(&self) -> Result<State> {
        if !self.path.exists() {
            return Ok(State::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(State::default());
        }

        serde_json::from_str(&content).map_err(|source| SettingsError::InvalidState {
            path: self.path.clone(),
            source,
        })
    }

    /// Load, apply `f`, and write back while holding the lock. Returns the
    /// state as written.
    pub fn update<F>(&self, f: F) -> Result<State>
    where
        F: FnOnce(&mut State),
    {
        let lock = self.lock()?;
        let mut state = self.load()?;
        f(&mut state);
        self.write(&state)?;
        FileExt::unlock(&lock)?;
        Ok(state)
    }

    /// Record notified identifiers without touching the webhook URL on disk
    pub fn merge_notified(&self, notified: &NotifiedSet) -> Result<State> {
        self.update(|state| state.notified_tasks.merge(notified))
    }

    /// Overwrite the stored webhook URL
    pub fn set_webhook_url(&self, url: &str) -> Result<State> {
        self.update(|state| state.webhook_url = url.trim().to_string())
    }

    fn lock(&self) -> Result<File> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let lock_path = self.path.with_extension("json.lock");
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&lock_path)?;
        file.lock_exclusive()?;
        debug!("Locked {}", lock_path.display());
        Ok(file)
    }

    fn write(&self, state: &State) -> Result<()> {
        let content = serde_json::to_string_pretty(state)
            .map_err(|e| SettingsError::Serialize(e.to_string()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}
