//! Daemon configuration (`config.toml`)

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::error::{Result, SettingsError};
use super::get_app_dir;
use crate::webhook::CardStyle;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub vault: VaultConfig,

    #[serde(default)]
    pub schedule: ScheduleConfig,

    #[serde(default)]
    pub card: CardStyle,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VaultConfig {
    /// Notes directory; the current directory when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,

    /// File extensions scanned for reminders
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            path: None,
            extensions: default_extensions(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    #[serde(default = "default_check_interval")]
    pub check_interval_secs: u64,

    /// Re-scan documents as soon as they change
    #[serde(default = "default_true")]
    pub watch: bool,

    /// Forget notified reminders this many days after their due time (0 = never)
    #[serde(default)]
    pub retention_days: u32,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            check_interval_secs: default_check_interval(),
            watch: true,
            retention_days: 0,
        }
    }
}

impl ScheduleConfig {
    pub fn check_interval(&self) -> Duration {
        Duration::from_secs(self.check_interval_secs.max(1))
    }

    pub fn retention(&self) -> Option<chrono::Duration> {
        (self.retention_days > 0).then(|| chrono::Duration::days(i64::from(self.retention_days)))
    }
}

fn default_check_interval() -> u64 {
    3 * 60
}

fn default_true() -> bool {
    true
}

pub fn config_path() -> Result<PathBuf> {
    Ok(get_app_dir()?.join("config.toml"))
}

impl Config {
    /// Load `<app dir>/config.toml`, or defaults when it does not exist
    pub fn load() -> Result<Self> {
        Self::load_from(&config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|source| SettingsError::InvalidConfig {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let content =
            toml::to_string_pretty(self).map_err(|e| SettingsError::Serialize(e.to_string()))?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Vault directory: explicit override, then config, then the current directory
    pub fn vault_dir(&self, overridden: Option<PathBuf>) -> PathBuf {
        overridden
            .or_else(|| self.vault.path.clone())
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
