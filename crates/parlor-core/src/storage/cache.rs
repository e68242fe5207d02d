//! Client cache trait.
//!
//! The cache is the client's local storage: a flat map of string keys to
//! JSON values that survives restarts. Implementations live in parlor-infra.

use parlor_types::error::RepositoryError;
use parlor_types::storage::CacheEntry;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Trait for key-value persistent client storage.
///
/// Stores arbitrary JSON values keyed by string. Last writer wins.
/// Uses RPITIT (native async fn in traits, Rust 2024 edition).
pub trait ClientCache: Send + Sync {
    /// Get a value by key. Returns None if the key does not exist.
    fn get(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<serde_json::Value>, RepositoryError>> + Send;

    /// Set a value for a key (upsert).
    fn set(
        &self,
        key: &str,
        value: &serde_json::Value,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Delete a key. Returns whether the key existed.
    fn delete(&self, key: &str) -> impl std::future::Future<Output = Result<bool, RepositoryError>> + Send;

    /// List all keys in ascending order.
    fn list_keys(&self) -> impl std::future::Future<Output = Result<Vec<String>, RepositoryError>> + Send;

    /// Get the full entry including timestamps.
    fn get_entry(
        &self,
        key: &str,
    ) -> impl std::future::Future<Output = Result<Option<CacheEntry>, RepositoryError>> + Send;
}

/// Read a key and deserialize it into `T`.
///
/// A value that no longer matches `T` is reported as a query error rather
/// than silently discarded, so callers can decide whether to fall back.
pub async fn load_json<C, T>(cache: &C, key: &str) -> Result<Option<T>, RepositoryError>
where
    C: ClientCache,
    T: DeserializeOwned,
{
    match cache.get(key).await? {
        Some(value) => serde_json::from_value(value)
            .map(Some)
            .map_err(|e| RepositoryError::Query(format!("invalid cached value for '{key}': {e}"))),
        None => Ok(None),
    }
}

/// Serialize `value` and store it under `key`.
pub async fn store_json<C, T>(cache: &C, key: &str, value: &T) -> Result<(), RepositoryError>
where
    C: ClientCache,
    T: Serialize + ?Sized,
{
    let json = serde_json::to_value(value)
        .map_err(|e| RepositoryError::Query(format!("failed to serialize value: {e}")))?;
    cache.set(key, &json).await
}
