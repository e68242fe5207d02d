//! Persisted UI preferences (theme and chat list visibility).

use parlor_types::error::RepositoryError;
use parlor_types::preferences::{Preferences, Theme};
use parlor_types::storage::keys;
use tracing::{info, warn};

use crate::storage::cache::{ClientCache, store_json};

/// Reads and toggles UI preferences in the client cache.
pub struct PreferenceService<C: ClientCache> {
    cache: C,
}

impl<C: ClientCache> PreferenceService<C> {
    pub fn new(cache: C) -> Self {
        Self { cache }
    }

    /// Current preferences. Missing or unreadable values fall back to the
    /// defaults (light theme, chat list shown).
    pub async fn load(&self) -> Preferences {
        let theme = match self.cache.get(keys::THEME).await {
            Ok(Some(value)) => value
                .as_str()
                .and_then(|s| s.parse::<Theme>().ok())
                .unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(e) => {
                warn!(error = %e, "failed to read theme preference");
                Theme::default()
            }
        };

        let sidebar_collapsed = match self.cache.get(keys::SIDEBAR_COLLAPSED).await {
            Ok(Some(value)) => parse_flag(&value),
            Ok(None) => false,
            Err(e) => {
                warn!(error = %e, "failed to read sidebar preference");
                false
            }
        };

        Preferences {
            theme,
            sidebar_collapsed,
        }
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), RepositoryError> {
        store_json(&self.cache, keys::THEME, &theme).await?;
        info!(theme = %theme, "theme changed");
        Ok(())
    }

    /// Switch between light and dark; returns the new theme.
    pub async fn toggle_theme(&self) -> Result<Theme, RepositoryError> {
        let theme = self.load().await.theme.toggled();
        self.set_theme(theme).await?;
        Ok(theme)
    }

    pub async fn set_sidebar_collapsed(&self, collapsed: bool) -> Result<(), RepositoryError> {
        store_json(&self.cache, keys::SIDEBAR_COLLAPSED, &collapsed).await?;
        info!(collapsed, "sidebar state changed");
        Ok(())
    }

    /// Flip chat list visibility; returns whether it is now collapsed.
    pub async fn toggle_sidebar(&self) -> Result<bool, RepositoryError> {
        let collapsed = !self.load().await.sidebar_collapsed;
        self.set_sidebar_collapsed(collapsed).await?;
        Ok(collapsed)
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }
}

/// Accepts a JSON bool or the string `"true"` written by older clients.
fn parse_flag(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::String(s) => s == "true",
        _ => false,
    }
}
