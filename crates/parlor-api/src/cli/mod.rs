//! CLI command definitions and dispatch for the `parlor` binary.
//!
//! Uses clap derive macros for argument parsing. `parlor chat` opens the
//! interactive session; the other commands inspect or change the cached
//! client state without entering the chat loop.

pub mod cache;
pub mod chat;
pub mod history;
pub mod prefs;

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use parlor_types::preferences::{ModelSelector, Theme};

/// Terminal chat client with spoken replies.
#[derive(Parser)]
#[command(name = "parlor", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Chat server base URL (overrides config and PARLOR_SERVER_URL).
    #[arg(long, global = true)]
    pub server: Option<String>,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start an interactive chat session.
    Chat {
        /// Open this chat instead of the last active one.
        #[arg(long = "chat")]
        chat_id: Option<String>,

        /// Speak bot replies aloud.
        #[arg(long)]
        speak: bool,

        /// Model to route messages to (gemini or azure).
        #[arg(long)]
        model: Option<ModelSelector>,
    },

    /// List chats, newest first.
    #[command(alias = "ls")]
    Chats,

    /// Print the messages of one chat.
    Show {
        /// Chat identifier.
        id: String,
    },

    /// Create a new chat on the server and make it active.
    New,

    /// Toggle the colour theme, or set it explicitly.
    Theme {
        /// Theme to switch to (light or dark).
        theme: Option<Theme>,
    },

    /// Toggle whether the chat list is shown in the chat view.
    Sidebar,

    /// Inspect the local client cache.
    Cache {
        #[command(subcommand)]
        action: cache::CacheCommand,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_chat_flags() {
        let cli = Cli::parse_from([
            "parlor", "chat", "--chat", "20240101000000", "--speak", "--model", "azure",
        ]);
        match cli.command {
            Commands::Chat {
                chat_id,
                speak,
                model,
            } => {
                assert_eq!(chat_id.as_deref(), Some("20240101000000"));
                assert!(speak);
                assert_eq!(model, Some(ModelSelector::Azure));
            }
            _ => panic!("expected chat command"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["parlor", "chats", "--json", "-vv", "--server", "http://h:1"]);
        assert!(cli.json);
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.server.as_deref(), Some("http://h:1"));
        assert!(matches!(cli.command, Commands::Chats));
    }

    #[test]
    fn test_theme_argument_is_optional() {
        let cli = Cli::parse_from(["parlor", "theme"]);
        assert!(matches!(cli.command, Commands::Theme { theme: None }));

        let cli = Cli::parse_from(["parlor", "theme", "dark"]);
        assert!(matches!(
            cli.command,
            Commands::Theme {
                theme: Some(Theme::Dark)
            }
        ));
    }

    #[test]
    fn test_unknown_model_rejected() {
        assert!(Cli::try_parse_from(["parlor", "chat", "--model", "llama"]).is_err());
    }
}
