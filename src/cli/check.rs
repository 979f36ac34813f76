//! `gchat-reminder check` command implementation

use anyhow::Result;
use chrono::Utc;
use clap::Args;

use super::definition::{VaultArgs, WebhookArgs};
use super::Context;

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    vault: VaultArgs,

    #[command(flatten)]
    webhook: WebhookArgs,

    /// Report due reminders without sending or recording them
    #[arg(long)]
    dry_run: bool,
}

pub async fn run(ctx: &Context, args: CheckArgs) -> Result<()> {
    let vault = ctx.open_vault(args.vault.vault)?;
    let service = ctx
        .service()?
        .with_webhook_override(args.webhook.webhook_url)
        .with_dry_run(args.dry_run);

    service.scan_vault(&vault).await?;
    let report = service.on_tick(Utc::now()).await;

    if args.dry_run {
        println!("{} reminders due (dry run, nothing sent)", report.due);
        return Ok(());
    }

    println!(
        "{} due: {} sent, {} skipped, {} failed",
        report.due, report.sent, report.skipped, report.failed
    );
    if report.skipped > 0 {
        println!("No webhook URL configured. Set one with: gchat-reminder config set-webhook <URL>");
    }
    if report.pruned > 0 {
        println!("Pruned {} expired notified reminders", report.pruned);
    }

    Ok(())
}
