//! Slash command parsing for the chat loop.
//!
//! Commands start with `/` and provide in-chat controls for chats, speech,
//! uploads, and display preferences.

use std::io::Write;
use std::path::PathBuf;

use console::style;
use parlor_types::preferences::ModelSelector;

/// Available slash commands in the chat loop.
#[derive(Debug, PartialEq)]
pub enum ChatCommand {
    /// Show available commands.
    Help,
    /// Clear the terminal screen.
    Clear,
    /// Exit the chat session.
    Exit,
    /// Create a new chat and switch to it.
    New,
    /// Show the full chat list.
    Chats,
    /// Switch to an existing chat.
    Open(String),
    /// Toggle spoken replies.
    Speak,
    /// Stop the reply currently being spoken.
    Stop,
    /// Show (`None`) or switch the model.
    Model(Option<ModelSelector>),
    /// Upload a file into the active chat.
    Upload(PathBuf),
    /// Dictate one message.
    Voice,
    /// Toggle light/dark rendering.
    Theme,
    /// Toggle the chat list.
    Sidebar,
    /// A known command used incorrectly.
    Invalid(String),
    /// Unknown command.
    Unknown(String),
}

/// Parse user input as a slash command.
///
/// Returns `None` if the input doesn't start with `/`.
pub fn parse(input: &str) -> Option<ChatCommand> {
    let trimmed = input.trim();
    if !trimmed.starts_with('/') {
        return None;
    }

    let parts: Vec<&str> = trimmed.splitn(2, ' ').collect();
    let cmd = parts[0].to_lowercase();
    let arg = parts
        .get(1)
        .map(|s| s.trim())
        .filter(|s| !s.is_empty());

    let command = match cmd.as_str() {
        "/help" | "/h" | "/?" => ChatCommand::Help,
        "/clear" | "/cls" => ChatCommand::Clear,
        "/exit" | "/quit" | "/q" => ChatCommand::Exit,
        "/new" => ChatCommand::New,
        "/chats" | "/list" => ChatCommand::Chats,
        "/open" => match arg {
            Some(id) => ChatCommand::Open(id.to_string()),
            None => ChatCommand::Invalid("/open requires a chat id".to_string()),
        },
        "/speak" => ChatCommand::Speak,
        "/stop" => ChatCommand::Stop,
        "/model" => match arg {
            None => ChatCommand::Model(None),
            Some(name) => match name.parse::<ModelSelector>() {
                Ok(model) => ChatCommand::Model(Some(model)),
                Err(e) => ChatCommand::Invalid(e),
            },
        },
        "/upload" => match arg {
            Some(path) => ChatCommand::Upload(PathBuf::from(path)),
            None => ChatCommand::Invalid("/upload requires a file path".to_string()),
        },
        "/voice" | "/mic" => ChatCommand::Voice,
        "/theme" => ChatCommand::Theme,
        "/sidebar" => ChatCommand::Sidebar,
        other => ChatCommand::Unknown(other.to_string()),
    };
    Some(command)
}

/// Print the help text listing all available commands.
pub fn print_help(out: &mut impl Write) {
    let rows = [
        ("/help", "Show this help message"),
        ("/new", "Start a new chat"),
        ("/chats", "List all chats"),
        ("/open ID", "Switch to another chat"),
        ("/speak", "Toggle spoken replies"),
        ("/stop", "Stop speaking"),
        ("/model NAME", "Switch model (gemini, azure)"),
        ("/upload PATH", "Upload a pdf, png or jpg file"),
        ("/voice", "Dictate a message"),
        ("/theme", "Toggle light/dark theme"),
        ("/sidebar", "Show or hide the chat list"),
        ("/clear", "Clear the screen"),
        ("/exit", "End the chat session"),
    ];

    let _ = writeln!(out, "\n  {}\n", style("Available commands:").bold());
    for (cmd, description) in rows {
        let _ = writeln!(out, "  {:<14} {}", style(cmd).cyan(), description);
    }
    let _ = writeln!(
        out,
        "\n  {}\n",
        style("Ctrl+C stops speech, Ctrl+D exits").dim()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_help() {
        assert_eq!(parse("/help"), Some(ChatCommand::Help));
        assert_eq!(parse("/h"), Some(ChatCommand::Help));
        assert_eq!(parse("/?"), Some(ChatCommand::Help));
    }

    #[test]
    fn test_parse_exit() {
        assert_eq!(parse("/exit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/quit"), Some(ChatCommand::Exit));
        assert_eq!(parse("/q"), Some(ChatCommand::Exit));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(parse("/NEW"), Some(ChatCommand::New));
        assert_eq!(parse("  /Speak  "), Some(ChatCommand::Speak));
    }

    #[test]
    fn test_parse_open() {
        assert_eq!(
            parse("/open 20240101120000"),
            Some(ChatCommand::Open("20240101120000".to_string()))
        );
        assert!(matches!(parse("/open"), Some(ChatCommand::Invalid(_))));
        assert!(matches!(parse("/open   "), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_model() {
        assert_eq!(parse("/model"), Some(ChatCommand::Model(None)));
        assert_eq!(
            parse("/model Azure"),
            Some(ChatCommand::Model(Some(ModelSelector::Azure)))
        );
        assert!(matches!(parse("/model gpt"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_upload_keeps_spaces_in_path() {
        assert_eq!(
            parse("/upload ~/My Documents/report.pdf"),
            Some(ChatCommand::Upload(PathBuf::from("~/My Documents/report.pdf")))
        );
        assert!(matches!(parse("/upload"), Some(ChatCommand::Invalid(_))));
    }

    #[test]
    fn test_parse_toggles() {
        assert_eq!(parse("/stop"), Some(ChatCommand::Stop));
        assert_eq!(parse("/voice"), Some(ChatCommand::Voice));
        assert_eq!(parse("/theme"), Some(ChatCommand::Theme));
        assert_eq!(parse("/sidebar"), Some(ChatCommand::Sidebar));
        assert_eq!(parse("/chats"), Some(ChatCommand::Chats));
    }

    #[test]
    fn test_parse_not_command() {
        assert_eq!(parse("hello world"), None);
        assert_eq!(parse("what does a/b mean"), None);
    }

    #[test]
    fn test_help_lists_every_command() {
        console::set_colors_enabled(false);
        let mut out = Vec::new();
        print_help(&mut out);
        let text = String::from_utf8(out).unwrap();
        for cmd in ["/new", "/open", "/speak", "/stop", "/model", "/upload", "/voice", "/exit"] {
            assert!(text.contains(cmd), "missing {cmd}");
        }
    }

    #[test]
    fn test_parse_unknown() {
        assert_eq!(
            parse("/foo"),
            Some(ChatCommand::Unknown("/foo".to_string()))
        );
    }
}
