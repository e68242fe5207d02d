//! Parlor terminal chat client entry point.
//!
//! Binary name: `parlor`
//!
//! Parses CLI arguments, initializes tracing, the cache database and the
//! chat server client, then dispatches to the appropriate command handler.

mod cli;
mod state;

use anyhow::anyhow;
use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use parlor_observe::tracing_setup::{init_tracing, shutdown_tracing};
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,parlor=debug",
        _ => "trace",
    };
    init_tracing(filter, cli.otel).map_err(|e| anyhow!("failed to initialize tracing: {e}"))?;

    let result = run(cli).await;
    shutdown_tracing();
    result
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "parlor", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init(cli.server).await?;

    match cli.command {
        Commands::Chat {
            chat_id,
            speak,
            model,
        } => {
            cli::chat::loop_runner::run_chat_loop(&state, chat_id, speak, model).await?;
        }

        Commands::Chats => {
            cli::history::list_chats(&state, cli.json).await?;
        }

        Commands::Show { id } => {
            cli::history::show_chat(&state, &id, cli.json).await?;
        }

        Commands::New => {
            cli::history::new_chat(&state, cli.json).await?;
        }

        Commands::Theme { theme } => {
            cli::prefs::theme(&state, theme, cli.json).await?;
        }

        Commands::Sidebar => {
            cli::prefs::sidebar(&state, cli.json).await?;
        }

        Commands::Cache { action } => {
            cli::cache::handle_cache_command(action, &state, cli.json).await?;
        }

        Commands::Completions { .. } => unreachable!("handled above"),
    }

    Ok(())
}
