//! Chat history commands: list chats, show one chat, create a chat.
//!
//! These run the same store operations as the chat loop (server sync with
//! cache fallback) without rendering a live transcript.

use anyhow::{Context, Result, bail};
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use parlor_core::chat::view::ChatView;
use parlor_types::chat::{ChatId, ChatListEntry, Message};

use crate::cli::chat::view::TerminalView;
use crate::state::AppState;

/// View that discards everything; used where only the store state matters.
struct SilentView;

impl ChatView for SilentView {
    fn clear_transcript(&mut self) {}
    fn render_message(&mut self, _message: &Message) {}
    fn render_chat_list(&mut self, _entries: &[ChatListEntry]) {}
}

/// Table of chats, newest first, with the active one marked.
pub fn chat_table(entries: &[ChatListEntry]) -> Table {
    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new(""),
            Cell::new("ID").fg(Color::Cyan),
            Cell::new("Title").fg(Color::Cyan),
            Cell::new("Messages").fg(Color::Cyan),
        ]);

    for entry in entries {
        let marker = if entry.active {
            Cell::new("*").fg(Color::Green)
        } else {
            Cell::new("")
        };
        table.add_row(vec![
            marker,
            Cell::new(entry.id.as_str()),
            Cell::new(&entry.title),
            Cell::new(entry.message_count),
        ]);
    }
    table
}

/// List all chats.
pub async fn list_chats(state: &AppState, json: bool) -> Result<()> {
    let mut store = state.chat_store(SilentView, false, None);
    store.restore().await;
    store.load_history().await;
    let entries = store.chat_list();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} No chats yet. Start one with: {}",
            style("i").blue().bold(),
            style("parlor chat").cyan()
        );
        println!();
        return Ok(());
    }

    println!();
    println!("{}", chat_table(&entries));
    println!();
    println!(
        "  {} chat(s). Open one with: {}",
        entries.len(),
        style("parlor chat --chat <ID>").cyan()
    );
    println!();
    Ok(())
}

/// Print every message of one chat.
pub async fn show_chat(state: &AppState, id: &str, json: bool) -> Result<()> {
    let mut store = state.chat_store(SilentView, false, None);
    store.restore().await;
    store.load_history().await;

    let chat_id = ChatId::from(id);
    let Some(messages) = store.state().histories().messages(&chat_id) else {
        bail!("Chat '{id}' not found");
    };

    if json {
        let result = serde_json::json!({
            "id": chat_id,
            "title": store.state().histories().title(&chat_id),
            "messages": messages,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    println!(
        "  {} {}",
        style(store.state().histories().title(&chat_id)).cyan().bold(),
        style(format!("({id})")).dim()
    );
    println!();
    if messages.is_empty() {
        println!("  {}", style("(no messages)").dim());
        println!();
        return Ok(());
    }

    let mut view = TerminalView::new(state.preferences.load().await);
    for message in messages {
        view.render_message(message);
    }
    Ok(())
}

/// Create a new chat and make it the active one.
pub async fn new_chat(state: &AppState, json: bool) -> Result<()> {
    let mut store = state.chat_store(SilentView, false, None);
    store.restore().await;
    let id = store
        .create_chat()
        .await
        .with_context(|| format!("Could not create a chat on {}", state.config.server_url))?;

    if json {
        let result = serde_json::json!({ "id": id });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Created chat {}",
            style("ok").green(),
            style(id.as_str()).cyan()
        );
        println!();
    }
    Ok(())
}
