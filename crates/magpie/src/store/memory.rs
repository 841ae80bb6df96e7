use anyhow::Result;
use async_trait::async_trait;
use std::collections::BTreeMap;

use super::Store;

/// In-memory store used as a test double.
///
/// Hash fields keep insertion order; keys enumerate sorted, which is what
/// the schema introspector produces for any backend anyway.
#[derive(Default)]
pub struct MemoryStore {
    hashes: BTreeMap<String, Vec<(String, String)>>,
    strings: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_hash(mut self, key: &str, pairs: &[(&str, &str)]) -> Self {
        self.hashes.insert(
            key.to_string(),
            pairs
                .iter()
                .map(|(f, v)| (f.to_string(), v.to_string()))
                .collect(),
        );
        self
    }

    pub fn with_string(mut self, key: &str, value: &str) -> Self {
        self.strings.insert(key.to_string(), value.to_string());
        self
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn keys(&self) -> Result<Vec<String>> {
        Ok(self
            .hashes
            .keys()
            .chain(self.strings.keys())
            .cloned()
            .collect())
    }

    async fn key_type(&self, key: &str) -> Result<String> {
        if self.hashes.contains_key(key) {
            Ok("hash".to_string())
        } else if self.strings.contains_key(key) {
            Ok("string".to_string())
        } else {
            Ok("none".to_string())
        }
    }

    async fn hash_fields(&self, key: &str) -> Result<Vec<String>> {
        Ok(self
            .hashes
            .get(key)
            .map(|pairs| pairs.iter().map(|(f, _)| f.clone()).collect())
            .unwrap_or_default())
    }

    async fn hash_get(&self, key: &str, field: &str) -> Result<Option<String>> {
        Ok(self.hashes.get(key).and_then(|pairs| {
            pairs
                .iter()
                .find(|(f, _)| f == field)
                .map(|(_, v)| v.clone())
        }))
    }

    async fn hash_get_all(&self, key: &str) -> Result<Vec<(String, String)>> {
        Ok(self.hashes.get(key).cloned().unwrap_or_default())
    }
}
