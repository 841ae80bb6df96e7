use anyhow::Result;
use async_trait::async_trait;

pub mod query;
pub mod redis;
pub mod schema;

#[cfg(test)]
pub mod memory;

/// Read-only view of a key-value store holding hash records.
///
/// All values are strings; binary payloads are out of scope. Implementations
/// are long-lived and reused for the process lifetime.
#[async_trait]
pub trait Store: Send + Sync {
    /// Enumerate every key in the store
    async fn keys(&self) -> Result<Vec<String>>;

    /// The type of the value at `key`, e.g. "hash", "string", or "none" when
    /// the key does not exist
    async fn key_type(&self, key: &str) -> Result<String>;

    /// Field names of the hash record at `key`
    async fn hash_fields(&self, key: &str) -> Result<Vec<String>>;

    /// A single field's value, or None when the field is absent
    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>>;

    /// All field/value pairs of the hash record at `key`
    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>>;
}
