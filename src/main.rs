//! gchat-reminder - Post due markdown reminders to Google Chat

use anyhow::Result;
use clap::{CommandFactory, Parser};
use clap_complete::generate;
use gchat_reminder::cli::{self, Cli, Commands, Context};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let default_filter = if std::env::var("GCHAT_REMINDER_DEBUG").is_ok() {
        "gchat_reminder=debug"
    } else {
        "gchat_reminder=info"
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Commands that need neither config nor state.
    match cli.command {
        Commands::Completion { shell } => {
            generate(shell, &mut Cli::command(), "gchat-reminder", &mut std::io::stdout());
            return Ok(());
        }
        _ => {}
    }

    let ctx = Context::load(cli.config, cli.data)?;

    match cli.command {
        Commands::Scan(args) => cli::scan::run(&ctx, args).await,
        Commands::Check(args) => cli::check::run(&ctx, args).await,
        Commands::Watch(args) => cli::watch::run(&ctx, args).await,
        Commands::Config { command } => cli::config::run(&ctx, command).await,
        Commands::Notified { command } => cli::notified::run(&ctx, command).await,
        Commands::Completion { .. } => unreachable!(),
    }
}
