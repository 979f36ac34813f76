//! `gchat-reminder watch` command implementation

use anyhow::Result;
use chrono::Utc;
use clap::Args;
use std::time::Duration;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use super::definition::{VaultArgs, WebhookArgs};
use super::Context;
use crate::vault::{VaultEvent, VaultWatcher};

#[derive(Args)]
pub struct WatchArgs {
    #[command(flatten)]
    vault: VaultArgs,

    #[command(flatten)]
    webhook: WebhookArgs,

    /// Seconds between due checks (overrides `schedule.check_interval_secs`)
    #[arg(long)]
    interval: Option<u64>,

    /// Do not watch for file changes; only re-scan the vault on each check
    #[arg(long)]
    no_watch: bool,
}

pub async fn run(ctx: &Context, args: WatchArgs) -> Result<()> {
    let vault = ctx.open_vault(args.vault.vault)?;
    let service = ctx
        .service()?
        .with_webhook_override(args.webhook.webhook_url);

    let period = args
        .interval
        .map(|secs| Duration::from_secs(secs.max(1)))
        .unwrap_or_else(|| ctx.config.schedule.check_interval());
    let watching = ctx.config.schedule.watch && !args.no_watch;

    service.scan_vault(&vault).await?;

    let mut watcher = if watching {
        match VaultWatcher::start(&vault) {
            Ok(w) => Some(w),
            Err(e) => {
                warn!("File watching disabled: {:#}", e);
                None
            }
        }
    } else {
        None
    };

    info!(
        "Watching {} (check every {}s, file events {})",
        vault.root().display(),
        period.as_secs(),
        if watcher.is_some() { "on" } else { "off" }
    );

    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            _ = interval.tick() => {
                if watcher.is_none() {
                    if let Err(e) = service.scan_vault(&vault).await {
                        warn!("Vault scan failed: {:#}", e);
                    }
                }
                service.on_tick(Utc::now()).await;
            }
            Some(event) = next_event(&mut watcher) => {
                match event {
                    VaultEvent::Changed(path) => match vault.read(&path).await {
                        Ok(text) => {
                            service.on_document_changed(&path, &text).await;
                        }
                        Err(e) => warn!("{:#}", e),
                    },
                    VaultEvent::Removed(path) => {
                        service.forget_document(&path).await;
                    }
                }
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Stopping");
                break;
            }
        }
    }

    Ok(())
}

async fn next_event(watcher: &mut Option<VaultWatcher>) -> Option<VaultEvent> {
    match watcher {
        Some(w) => w.next().await,
        None => std::future::pending().await,
    }
}
