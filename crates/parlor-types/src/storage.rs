//! Persistent client cache types.
//!
//! The cache mirrors the browser's local storage: a flat namespace of
//! string keys holding JSON values.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Well-known cache keys.
pub mod keys {
    /// Identifier of the active chat.
    pub const CURRENT_CHAT_ID: &str = "currentChatId";
    /// The full chat collection.
    pub const CHAT_HISTORIES: &str = "chatHistories";
    /// `"light"` or `"dark"`.
    pub const THEME: &str = "theme";
    /// Whether the chat list is hidden.
    pub const SIDEBAR_COLLAPSED: &str = "isSidebarCollapsed";
}

/// A cache entry including timestamps.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub value: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_entry_serialize() {
        let entry = CacheEntry {
            key: keys::THEME.to_string(),
            value: serde_json::json!("dark"),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(json.contains("\"key\":\"theme\""));
        assert!(json.contains("\"dark\""));
    }
}
