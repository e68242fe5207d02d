//! Client cache inspection subcommands.
//!
//! Lists, prints, and clears the entries the chat client keeps in its local
//! cache (active chat id, chat histories, display preferences).

use anyhow::Result;
use clap::Subcommand;
use comfy_table::{Cell, Color, ContentArrangement, Table, presets};
use console::style;
use parlor_core::storage::cache::ClientCache;

use crate::state::AppState;

/// Longest value preview shown in the list table.
const PREVIEW_CHARS: usize = 60;

/// Cache subcommands.
#[derive(Subcommand)]
pub enum CacheCommand {
    /// List cached keys with a value preview.
    #[command(alias = "ls")]
    List,

    /// Print the value stored under a key.
    Get {
        /// Key name (e.g. currentChatId, chatHistories, theme).
        key: String,
    },

    /// Delete one key, or every entry when no key is given.
    Clear {
        /// Key name.
        key: Option<String>,
    },
}

/// Handle a cache subcommand.
pub async fn handle_cache_command(cmd: CacheCommand, state: &AppState, json: bool) -> Result<()> {
    match cmd {
        CacheCommand::List => cache_list(state, json).await,
        CacheCommand::Get { key } => cache_get(state, &key, json).await,
        CacheCommand::Clear { key } => cache_clear(state, key.as_deref(), json).await,
    }
}

/// Shorten a JSON value for the list table.
fn preview(value: &serde_json::Value) -> String {
    let text = value.to_string();
    if text.chars().count() > PREVIEW_CHARS {
        let cut: String = text.chars().take(PREVIEW_CHARS - 3).collect();
        format!("{cut}...")
    } else {
        text
    }
}

async fn cache_list(state: &AppState, json: bool) -> Result<()> {
    let keys = state.cache.list_keys().await?;
    let mut entries = Vec::with_capacity(keys.len());
    for key in &keys {
        if let Some(entry) = state.cache.get_entry(key).await? {
            entries.push(entry);
        }
    }

    if json {
        let result = serde_json::json!({
            "entries": entries,
            "count": entries.len(),
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    if entries.is_empty() {
        println!();
        println!(
            "  {} The cache in {} is empty.",
            style("i").blue().bold(),
            style(state.data_dir.display()).cyan(),
        );
        println!();
        return Ok(());
    }

    println!();
    println!(
        "  Cache in {} ({} entries)",
        style(state.data_dir.display()).cyan(),
        entries.len(),
    );
    println!();

    let mut table = Table::new();
    table
        .load_preset(presets::UTF8_FULL_CONDENSED)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Key").fg(Color::White),
            Cell::new("Updated").fg(Color::White),
            Cell::new("Value Preview").fg(Color::White),
        ]);

    for entry in &entries {
        table.add_row(vec![
            Cell::new(&entry.key).fg(Color::Cyan),
            Cell::new(entry.updated_at.format("%Y-%m-%d %H:%M:%S")),
            Cell::new(preview(&entry.value)).fg(Color::DarkGrey),
        ]);
    }

    println!("{table}");
    println!();
    Ok(())
}

async fn cache_get(state: &AppState, key: &str, json: bool) -> Result<()> {
    let value = state.cache.get(key).await?;

    if json {
        let result = serde_json::json!({
            "key": key,
            "value": value,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    println!();
    match value {
        Some(val) => println!(
            "  {} = {}",
            style(key).cyan().bold(),
            serde_json::to_string_pretty(&val)?,
        ),
        None => println!(
            "  {} Key '{}' is not cached",
            style("i").blue().bold(),
            style(key).cyan(),
        ),
    }
    println!();
    Ok(())
}

async fn cache_clear(state: &AppState, key: Option<&str>, json: bool) -> Result<()> {
    let (label, removed) = match key {
        Some(key) => (key.to_string(), u64::from(state.cache.delete(key).await?)),
        None => ("all entries".to_string(), state.cache.clear().await?),
    };

    if json {
        let result = serde_json::json!({
            "cleared": key,
            "removed": removed,
        });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if removed == 0 {
        println!();
        println!(
            "  {} Nothing to clear for {}",
            style("i").blue().bold(),
            style(label).cyan(),
        );
        println!();
    } else {
        println!();
        println!(
            "  {} Cleared {} ({removed} removed)",
            style("ok").green(),
            style(label).cyan(),
        );
        println!();
    }
    Ok(())
}
