mod cli;
mod commands;
mod completions;
mod error;
mod output;
mod setup;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};
use nixt_core::AppCore;
use nixt_storage::paths;
use output::OutputFormat;
use setup::{prepare_core, resolve_config};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Log to a file so command output stays clean
    let log_guard = match paths::logs_dir() {
        Ok(log_dir) => {
            let file_appender = tracing_appender::rolling::daily(log_dir, "nixt.log");
            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            let default_level = if cli.verbose { "debug" } else { "info" };
            let filter = EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(default_level));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(non_blocking)
                .with_ansi(false)
                .with_target(false)
                .with_level(true)
                .init();
            Some(guard)
        }
        Err(_) => None,
    };

    if let Err(err) = run(cli).await {
        drop(log_guard);
        error::handle_error(err);
    }
}

async fn run(cli: Cli) -> Result<()> {
    if let Commands::Completions { shell } = cli.command {
        completions::generate_completions(shell);
        return Ok(());
    }

    let config = resolve_config(&cli);
    let core = prepare_core(config).await?;
    dispatch(&core, cli.command, cli.format).await
}

async fn dispatch(core: &AppCore, command: Commands, format: OutputFormat) -> Result<()> {
    match command {
        Commands::Completions { .. } => Ok(()),
        Commands::Grant { command } => commands::grant::run(core, command, format).await,
        Commands::Dashboard { command } => commands::dashboard::run(core, command, format).await,
        Commands::Shared { command } => commands::shared::run(core, command, format).await,
        Commands::Auth { command } => commands::auth::run(core, command, format).await,
        Commands::Users { command } => commands::users::run(core, command, format).await,
        Commands::Subscriptions { command } => {
            commands::subscriptions::run(core, command, format).await
        }
        Commands::Projects { command } => commands::projects::run(core, command, format).await,
        Commands::Admins { command } => commands::admins::run(core, command, format).await,
        Commands::Prefs { command } => commands::prefs::run(core, command, format).await,
    }
}
