//! SQLite client cache implementation.
//!
//! Implements `ClientCache` from `parlor-core` using sqlx with split
//! read/write pools. Values are stored as JSON text and deserialized on read.

use chrono::{DateTime, Utc};
use parlor_core::storage::cache::ClientCache;
use parlor_types::error::RepositoryError;
use parlor_types::storage::CacheEntry;
use sqlx::Row;

use super::pool::DatabasePool;

/// SQLite-backed implementation of `ClientCache`.
#[derive(Clone)]
pub struct SqliteCache {
    pool: DatabasePool,
}

impl SqliteCache {
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }

    /// Remove every entry. Returns the number of rows deleted.
    pub async fn clear(&self) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM client_cache")
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;
        Ok(result.rows_affected())
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct CacheRow {
    key: String,
    value: String,
    created_at: String,
    updated_at: String,
}

impl CacheRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            key: row.try_get("key")?,
            value: row.try_get("value")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_entry(self) -> Result<CacheEntry, RepositoryError> {
        let value = parse_value(&self.value)?;
        Ok(CacheEntry {
            key: self.key,
            value,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn parse_value(s: &str) -> Result<serde_json::Value, RepositoryError> {
    serde_json::from_str(s).map_err(|e| RepositoryError::Query(format!("invalid JSON value: {e}")))
}

fn parse_datetime(s: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Query(format!("invalid datetime: {e}")))
}

// ---------------------------------------------------------------------------
// ClientCache implementation
// ---------------------------------------------------------------------------

impl ClientCache for SqliteCache {
    async fn get(&self, key: &str) -> Result<Option<serde_json::Value>, RepositoryError> {
        let row = sqlx::query("SELECT value FROM client_cache WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let value: String = row
                    .try_get("value")
                    .map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(parse_value(&value)?))
            }
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &serde_json::Value) -> Result<(), RepositoryError> {
        let now = Utc::now().to_rfc3339();
        let value_str = serde_json::to_string(value)
            .map_err(|e| RepositoryError::Query(format!("failed to serialize value: {e}")))?;

        sqlx::query(
            r#"INSERT INTO client_cache (key, value, created_at, updated_at)
               VALUES (?, ?, ?, ?)
               ON CONFLICT (key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at"#,
        )
        .bind(key)
        .bind(&value_str)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool.writer)
        .await
        .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<bool, RepositoryError> {
        let result = sqlx::query("DELETE FROM client_cache WHERE key = ?")
            .bind(key)
            .execute(&self.pool.writer)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_keys(&self) -> Result<Vec<String>, RepositoryError> {
        let rows = sqlx::query("SELECT key FROM client_cache ORDER BY key")
            .fetch_all(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        rows.iter()
            .map(|row| {
                row.try_get::<String, _>("key")
                    .map_err(|e| RepositoryError::Query(e.to_string()))
            })
            .collect()
    }

    async fn get_entry(&self, key: &str) -> Result<Option<CacheEntry>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM client_cache WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(|e| RepositoryError::Query(e.to_string()))?;

        match row {
            Some(row) => {
                let cache_row =
                    CacheRow::from_row(&row).map_err(|e| RepositoryError::Query(e.to_string()))?;
                Ok(Some(cache_row.into_entry()?))
            }
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parlor_core::storage::cache::{load_json, store_json};
    use parlor_types::chat::{ChatCollection, ChatId, Message};
    use parlor_types::storage::keys;

    async fn test_cache() -> SqliteCache {
        let dir = tempfile::tempdir().unwrap();
        let url = format!("sqlite://{}?mode=rwc", dir.path().join("test.db").display());
        std::mem::forget(dir);
        SqliteCache::new(DatabasePool::new(&url).await.unwrap())
    }

    #[tokio::test]
    async fn test_set_get_roundtrip() {
        let cache = test_cache().await;

        let value = serde_json::json!({"c1": [{"text": "hi", "isUser": true}]});
        cache.set(keys::CHAT_HISTORIES, &value).await.unwrap();

        assert_eq!(cache.get(keys::CHAT_HISTORIES).await.unwrap(), Some(value));
    }

    #[tokio::test]
    async fn test_get_nonexistent_returns_none() {
        let cache = test_cache().await;
        assert!(cache.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_set_upserts_and_keeps_created_at() {
        let cache = test_cache().await;

        cache.set(keys::THEME, &serde_json::json!("light")).await.unwrap();
        let first = cache.get_entry(keys::THEME).await.unwrap().unwrap();
        cache.set(keys::THEME, &serde_json::json!("dark")).await.unwrap();
        let second = cache.get_entry(keys::THEME).await.unwrap().unwrap();

        assert_eq!(second.value, serde_json::json!("dark"));
        assert_eq!(second.created_at, first.created_at);
        assert!(second.updated_at >= first.updated_at);
    }

    #[tokio::test]
    async fn test_delete_reports_existence() {
        let cache = test_cache().await;

        cache.set("temp", &serde_json::json!(1)).await.unwrap();
        assert!(cache.delete("temp").await.unwrap());
        assert!(!cache.delete("temp").await.unwrap());
        assert!(cache.get("temp").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_keys_sorted() {
        let cache = test_cache().await;

        for key in ["theme", "chatHistories", "currentChatId"] {
            cache.set(key, &serde_json::json!(null)).await.unwrap();
        }

        let keys = cache.list_keys().await.unwrap();
        assert_eq!(keys, vec!["chatHistories", "currentChatId", "theme"]);
    }

    #[tokio::test]
    async fn test_clear() {
        let cache = test_cache().await;
        cache.set("a", &serde_json::json!(1)).await.unwrap();
        cache.set("b", &serde_json::json!(2)).await.unwrap();

        assert_eq!(cache.clear().await.unwrap(), 2);
        assert!(cache.list_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_typed_helpers_with_chat_collection() {
        let cache = test_cache().await;
        let mut histories = ChatCollection::new();
        histories.append(ChatId::from("20240101000000"), Message::user("hello"));
        histories.append(ChatId::from("20240101000000"), Message::bot("hi!"));

        store_json(&cache, keys::CHAT_HISTORIES, &histories).await.unwrap();
        let loaded: Option<ChatCollection> = load_json(&cache, keys::CHAT_HISTORIES).await.unwrap();

        assert_eq!(loaded, Some(histories));
    }

    #[tokio::test]
    async fn test_corrupt_value_is_query_error() {
        let cache = test_cache().await;
        sqlx::query(
            "INSERT INTO client_cache (key, value, created_at, updated_at) VALUES ('bad', '{not json', '2024-01-01T00:00:00Z', '2024-01-01T00:00:00Z')",
        )
        .execute(&cache.pool.writer)
        .await
        .unwrap();

        assert!(matches!(
            cache.get("bad").await,
            Err(RepositoryError::Query(_))
        ));
    }
}
