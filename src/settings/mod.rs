//! Settings and persisted state
//!
//! Everything lives in one app directory:
//!   - Linux: $XDG_CONFIG_HOME/gchat-reminder/ (defaults to ~/.config/gchat-reminder/)
//!   - macOS: ~/Library/Application Support/gchat-reminder/
//!
//! `data.json` holds the webhook URL and the notified-reminder identifiers,
//! `config.toml` holds daemon options.

pub mod config;
pub mod error;
pub mod state;

pub use config::{Config, ScheduleConfig, VaultConfig};
pub use error::SettingsError;
pub use state::{State, StateStore};

use std::fs;
use std::path::PathBuf;

pub const APP_DIR_NAME: &str = "gchat-reminder";

/// Return the app directory, creating it if needed
pub fn get_app_dir() -> error::Result<PathBuf> {
    let dir = dirs::config_dir()
        .ok_or(SettingsError::NoConfigDir)?
        .join(APP_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}
