//! `gchat-reminder scan` command implementation

use anyhow::Result;
use chrono::{Local, Utc};
use clap::Args;
use serde::Serialize;
use std::path::Path;

use super::definition::VaultArgs;
use super::Context;
use crate::reminder::Reminder;
use crate::schedule::ReminderState;

const TABLE_COL_STATE: usize = 11;
const TABLE_COL_DUE: usize = 17;
const TABLE_COL_CONTENT: usize = 40;

#[derive(Args)]
pub struct ScanArgs {
    #[command(flatten)]
    vault: VaultArgs,

    /// Only show reminders that are due and not notified yet
    #[arg(long)]
    due: bool,

    /// Output as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct ReminderJson {
    content: String,
    due: Option<chrono::DateTime<Utc>>,
    state: ReminderState,
    file: String,
}

fn print_table_header() {
    println!(
        "{:<width_state$} {:<width_due$} {:<width_content$} FILE",
        "STATE",
        "DUE",
        "REMINDER",
        width_state = TABLE_COL_STATE,
        width_due = TABLE_COL_DUE,
        width_content = TABLE_COL_CONTENT
    );
    println!(
        "{}",
        "-".repeat(TABLE_COL_STATE + TABLE_COL_DUE + TABLE_COL_CONTENT + 8)
    );
}

fn print_table_row(root: &Path, file: &Path, reminder: &Reminder, state: ReminderState) {
    let due = reminder
        .due
        .map(|d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string());
    let file = file.strip_prefix(root).unwrap_or(file);
    println!(
        "{} {:<width_state$} {:<width_due$} {:<width_content$} {}",
        state.emoji(),
        state.label(),
        due,
        super::truncate(&reminder.content, TABLE_COL_CONTENT),
        file.display(),
        width_state = TABLE_COL_STATE - 2,
        width_due = TABLE_COL_DUE,
        width_content = TABLE_COL_CONTENT
    );
}

pub async fn run(ctx: &Context, args: ScanArgs) -> Result<()> {
    let vault = ctx.open_vault(args.vault.vault)?;
    let service = ctx.service()?;
    service.scan_vault(&vault).await?;

    let now = Utc::now();
    let notified = service.notified().await;
    let retention = ctx.config.schedule.retention();
    let mut rows: Vec<_> = service
        .reminders()
        .await
        .into_iter()
        .map(|(file, reminder)| {
            let state = notified.state_of(&reminder, now, retention);
            (file, reminder, state)
        })
        .collect();

    if args.due {
        rows.retain(|(_, _, state)| *state == ReminderState::Due);
    }

    if args.json {
        let reminders: Vec<ReminderJson> = rows
            .into_iter()
            .map(|(file, reminder, state)| ReminderJson {
                content: reminder.content,
                due: reminder.due,
                state,
                file: file.display().to_string(),
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&reminders)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("No reminders found in {}", vault.root().display());
        return Ok(());
    }

    print_table_header();
    for (file, reminder, state) in &rows {
        print_table_row(vault.root(), file, reminder, *state);
    }
    println!("\nTotal: {} reminders", rows.len());

    Ok(())
}
