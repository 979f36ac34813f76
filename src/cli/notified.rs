//! `gchat-reminder notified` command implementation

use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Args, Subcommand};

use super::Context;

#[derive(Subcommand)]
pub enum NotifiedCommands {
    /// List identifiers of notified reminders
    List(ListArgs),

    /// Forget notified reminders due longer ago than `schedule.retention_days`
    Prune,

    /// Forget every notified reminder (all past-due reminders fire again)
    Clear,
}

#[derive(Args)]
pub struct ListArgs {
    /// Output as JSON
    #[arg(long)]
    json: bool,
}

pub async fn run(ctx: &Context, command: NotifiedCommands) -> Result<()> {
    match command {
        NotifiedCommands::List(args) => run_list(ctx, args),
        NotifiedCommands::Prune => run_prune(ctx),
        NotifiedCommands::Clear => run_clear(ctx),
    }
}

fn run_list(ctx: &Context, args: ListArgs) -> Result<()> {
    let state = ctx.store.load()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&state.notified_tasks)?);
        return Ok(());
    }

    if state.notified_tasks.is_empty() {
        println!("No notified reminders recorded.");
        return Ok(());
    }

    for id in state.notified_tasks.iter() {
        println!("{}", id);
    }
    println!("\nTotal: {} notified reminders", state.notified_tasks.len());
    Ok(())
}

fn run_prune(ctx: &Context) -> Result<()> {
    // Pruning is only safe with the window the daemon also uses to expire
    // reminders; without it a pruned reminder would fire again.
    let Some(retention) = ctx.config.schedule.retention() else {
        bail!("Set `schedule.retention_days` in config.toml before pruning");
    };
    let days = ctx.config.schedule.retention_days;
    let now = Utc::now();

    let mut removed = 0;
    ctx.store.update(|state| {
        removed = state.notified_tasks.prune(now, retention);
    })?;

    println!("Removed {} notified reminders due more than {} days ago", removed, days);
    Ok(())
}

fn run_clear(ctx: &Context) -> Result<()> {
    let mut removed = 0;
    ctx.store.update(|state| {
        removed = state.notified_tasks.len();
        state.notified_tasks.clear();
    })?;
    println!("Removed {} notified reminders", removed);
    Ok(())
}
