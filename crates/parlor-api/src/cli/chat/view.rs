//! Terminal implementation of the chat view.
//!
//! Bot replies are rendered as markdown through `termimad`; the skin follows
//! the persisted theme. The chat list is printed after every refresh unless
//! the sidebar is collapsed.

use std::io::Write;

use console::style;
use parlor_core::chat::view::ChatView;
use parlor_types::chat::{ChatListEntry, Message};
use parlor_types::preferences::{Preferences, Theme};
use termimad::MadSkin;

/// Number of chats printed when the list is shown inline.
const CHAT_LIST_LIMIT: usize = 8;

/// Prints the transcript and chat list.
pub struct TerminalView {
    out: Box<dyn Write + Send>,
    skin: MadSkin,
    sidebar_collapsed: bool,
}

impl TerminalView {
    pub fn new(preferences: Preferences) -> Self {
        Self::with_writer(preferences, Box::new(std::io::stdout()))
    }

    /// Write through `out` instead of stdout (the readline shared writer
    /// while the prompt is active).
    pub fn with_writer(preferences: Preferences, out: Box<dyn Write + Send>) -> Self {
        Self {
            out,
            skin: skin_for(preferences.theme),
            sidebar_collapsed: preferences.sidebar_collapsed,
        }
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.skin = skin_for(theme);
    }

    pub fn set_sidebar_collapsed(&mut self, collapsed: bool) {
        self.sidebar_collapsed = collapsed;
    }

    /// Styled text for one transcript message.
    pub fn format_message(&self, message: &Message) -> String {
        let stamp = message
            .timestamp
            .as_deref()
            .map(|t| format!(" {}", style(t).dim()))
            .unwrap_or_default();

        let mut out = if message.is_user {
            format!(
                "  {}{} {}",
                style("You >").green().bold(),
                stamp,
                message.text
            )
        } else {
            let rendered = self.skin.term_text(&message.text).to_string();
            format!(
                "  {}{}\n  {}",
                style("Bot >").cyan().bold(),
                stamp,
                rendered.trim_end().replace('\n', "\n  ")
            )
        };

        if let Some(file) = &message.file {
            out.push_str(&format!(
                "\n  {}",
                style(format!("[{} attached: {}]", file.file_type, file.name)).dim()
            ));
        }
        out
    }

    /// Styled chat list, or `None` while the sidebar is collapsed.
    pub fn format_chat_list(&self, entries: &[ChatListEntry]) -> Option<String> {
        if self.sidebar_collapsed {
            return None;
        }

        let mut out = format!("  {}", style("Chats").bold());
        if entries.is_empty() {
            out.push_str(&format!("\n    {}", style("(none yet)").dim()));
        }
        for entry in entries.iter().take(CHAT_LIST_LIMIT) {
            let marker = if entry.active {
                style("*").green().bold().to_string()
            } else {
                " ".to_string()
            };
            out.push_str(&format!(
                "\n  {} {}  {}",
                marker,
                style(entry.id.as_str()).dim(),
                entry.title
            ));
        }
        if entries.len() > CHAT_LIST_LIMIT {
            out.push_str(&format!(
                "\n    {}",
                style(format!(
                    "... {} more (/chats)",
                    entries.len() - CHAT_LIST_LIMIT
                ))
                .dim()
            ));
        }
        Some(out)
    }
}

fn skin_for(theme: Theme) -> MadSkin {
    let mut skin = match theme {
        Theme::Light => MadSkin::default_light(),
        Theme::Dark => MadSkin::default_dark(),
    };
    let accent = match theme {
        Theme::Light => termimad::crossterm::style::Color::DarkBlue,
        Theme::Dark => termimad::crossterm::style::Color::Cyan,
    };
    skin.bold.set_fg(accent);
    skin.headers[0].set_fg(accent);
    skin.headers[1].set_fg(accent);
    skin.inline_code
        .set_fg(termimad::crossterm::style::Color::Yellow);
    skin
}

impl ChatView for TerminalView {
    fn clear_transcript(&mut self) {
        let _ = writeln!(self.out, "\n  {}", style("---").dim());
    }

    fn render_message(&mut self, message: &Message) {
        let text = self.format_message(message);
        let _ = writeln!(self.out, "{text}\n");
    }

    fn render_chat_list(&mut self, entries: &[ChatListEntry]) {
        if let Some(list) = self.format_chat_list(entries) {
            let _ = writeln!(self.out, "{list}\n");
        }
    }
}
