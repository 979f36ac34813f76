//! CLI command implementations

pub mod check;
pub mod config;
pub mod definition;
pub mod notified;
pub mod scan;
pub mod watch;

pub use definition::{Cli, Commands};

use anyhow::{Context as _, Result};
use std::path::PathBuf;

use crate::service::ReminderService;
use crate::settings::{Config, StateStore};
use crate::vault::Vault;
use crate::webhook::WebhookClient;

/// Configuration and state locations resolved from global flags
pub struct Context {
    pub config: Config,
    pub config_path: Option<PathBuf>,
    pub store: StateStore,
}

impl Context {
    pub fn load(config_path: Option<PathBuf>, data_path: Option<PathBuf>) -> Result<Self> {
        let config = match &config_path {
            Some(path) => Config::load_from(path)?,
            None => Config::load()?,
        };
        let store = match data_path {
            Some(path) => StateStore::new(path),
            None => StateStore::open_default()?,
        };
        Ok(Self {
            config,
            config_path,
            store,
        })
    }

    pub fn open_vault(&self, overridden: Option<PathBuf>) -> Result<Vault> {
        let dir = self.config.vault_dir(overridden);
        Vault::open(&dir, &self.config.vault.extensions)
            .with_context(|| "Set the notes directory with --vault or `vault.path` in config.toml")
    }

    pub fn service(&self) -> Result<ReminderService> {
        let client = WebhookClient::new(self.config.card.clone())?;
        let service = ReminderService::new(self.store.clone(), client)?
            .with_retention(self.config.schedule.retention());
        Ok(service)
    }
}

/// Shorten to at most `max` characters, marking the cut with `...`
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max <= 3 {
        s.chars().take(max).collect()
    } else {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{}...", kept)
    }
}
