//! Display preference commands (`parlor theme`, `parlor sidebar`).

use anyhow::Result;
use console::style;
use parlor_types::preferences::Theme;

use crate::state::AppState;

/// Set the theme, or toggle it when none is given.
pub async fn theme(state: &AppState, theme: Option<Theme>, json: bool) -> Result<()> {
    let theme = match theme {
        Some(theme) => {
            state.preferences.set_theme(theme).await?;
            theme
        }
        None => state.preferences.toggle_theme().await?,
    };

    if json {
        let result = serde_json::json!({ "theme": theme });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!("  {} Theme set to {}", style("ok").green(), style(theme).cyan());
        println!();
    }
    Ok(())
}

/// Toggle whether the chat view prints the chat list.
pub async fn sidebar(state: &AppState, json: bool) -> Result<()> {
    let collapsed = state.preferences.toggle_sidebar().await?;

    if json {
        let result = serde_json::json!({ "sidebarCollapsed": collapsed });
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!();
        println!(
            "  {} Chat list {}",
            style("ok").green(),
            if collapsed { "hidden" } else { "shown" }
        );
        println!();
    }
    Ok(())
}
