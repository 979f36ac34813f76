//! `gchat-reminder config` command implementation

use anyhow::{bail, Result};
use clap::{Args, Subcommand};

use super::Context;
use crate::settings::config::config_path;
use crate::settings::Config;

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the current settings
    Show,

    /// Set the Google Chat webhook URL (takes effect on the next check)
    SetWebhook(SetWebhookArgs),

    /// Print the settings file locations
    Path,

    /// Write a config.toml with default values
    Init(InitArgs),
}

#[derive(Args)]
pub struct SetWebhookArgs {
    /// Incoming webhook URL, e.g. https://chat.googleapis.com/v1/spaces/.../messages?key=...&token=...
    /// (pass an empty string to disable notifications)
    url: String,
}

#[derive(Args)]
pub struct InitArgs {
    /// Overwrite an existing config.toml
    #[arg(long)]
    force: bool,
}

pub async fn run(ctx: &Context, command: ConfigCommands) -> Result<()> {
    match command {
        ConfigCommands::Show => run_show(ctx),
        ConfigCommands::SetWebhook(args) => run_set_webhook(ctx, args),
        ConfigCommands::Path => run_path(ctx),
        ConfigCommands::Init(args) => run_init(ctx, args),
    }
}

fn run_show(ctx: &Context) -> Result<()> {
    let state = ctx.store.load()?;
    let config = &ctx.config;

    let webhook = if state.has_webhook() {
        redact_url(&state.webhook_url)
    } else {
        "(not set)".to_string()
    };
    println!("Webhook URL:    {}", webhook);
    println!("Notified:       {} reminders", state.notified_tasks.len());
    println!(
        "Vault:          {}",
        config.vault_dir(None).display()
    );
    println!("Extensions:     {}", config.vault.extensions.join(", "));
    println!(
        "Check interval: {}s",
        config.schedule.check_interval().as_secs()
    );
    println!(
        "Watch files:    {}",
        if config.schedule.watch { "yes" } else { "no" }
    );
    match config.schedule.retention_days {
        0 => println!("Retention:      forever"),
        days => println!("Retention:      {} days", days),
    }
    println!("Card title:     {}", config.card.title);

    Ok(())
}

fn run_set_webhook(ctx: &Context, args: SetWebhookArgs) -> Result<()> {
    let url = args.url.trim();
    if !url.is_empty() && !url.starts_with("https://") && !url.starts_with("http://") {
        bail!("Webhook URL must start with https:// (got {:?})", url);
    }

    let state = ctx.store.set_webhook_url(url)?;
    if state.has_webhook() {
        println!("Webhook URL set: {}", redact_url(&state.webhook_url));
    } else {
        println!("Webhook URL cleared; notifications will be skipped");
    }
    Ok(())
}

fn run_path(ctx: &Context) -> Result<()> {
    let config = match &ctx.config_path {
        Some(path) => path.clone(),
        None => config_path()?,
    };
    println!("config: {}", config.display());
    println!("data:   {}", ctx.store.path().display());
    Ok(())
}

fn run_init(ctx: &Context, args: InitArgs) -> Result<()> {
    let path = match &ctx.config_path {
        Some(path) => path.clone(),
        None => config_path()?,
    };
    if path.exists() && !args.force {
        bail!("{} already exists (use --force to overwrite)", path.display());
    }

    Config::default().save_to(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

/// Hide the query string, which carries the webhook key and token
fn redact_url(url: &str) -> String {
    match url.split_once('?') {
        Some((base, _)) => format!("{}?…", base),
        None => url.to_string(),
    }
}
