//! Top-level CLI definition

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use super::config::ConfigCommands;
use super::notified::NotifiedCommands;

#[derive(Parser)]
#[command(name = "gchat-reminder")]
#[command(about = "Post due markdown reminders to a Google Chat webhook")]
#[command(version)]
pub struct Cli {
    /// Path to config.toml (defaults to the app directory)
    #[arg(long, global = true, env = "GCHAT_REMINDER_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to the state file holding the webhook URL and notified reminders
    #[arg(long, global = true, env = "GCHAT_REMINDER_DATA")]
    pub data: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List reminders found in the vault and their state
    Scan(super::scan::ScanArgs),

    /// Scan the vault once and notify every due reminder
    Check(super::check::CheckArgs),

    /// Keep running: notify on a fixed interval and re-scan changed notes
    Watch(super::watch::WatchArgs),

    /// Show or change settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Inspect or prune the record of notified reminders
    Notified {
        #[command(subcommand)]
        command: NotifiedCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Options shared by commands that read the vault
#[derive(Args, Debug, Clone)]
pub struct VaultArgs {
    /// Notes directory (overrides `vault.path` in config.toml)
    #[arg(long, short)]
    pub vault: Option<PathBuf>,
}

/// Options shared by commands that send notifications
#[derive(Args, Debug, Clone)]
pub struct WebhookArgs {
    /// Webhook URL for this run only (the stored URL is left unchanged)
    #[arg(long, env = "GCHAT_REMINDER_WEBHOOK_URL", hide_env_values = true)]
    pub webhook_url: Option<String>,
}
