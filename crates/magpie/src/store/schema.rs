use anyhow::Result;
use tracing::debug;

use super::Store;

/// Snapshot of one hash record's shape: its key and field names.
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaEntry {
    pub key: String,
    pub fields: Vec<String>,
}

/// Enumerate every hash record in the store and its field names.
///
/// Keys are sorted so the rendering is deterministic regardless of the
/// backend's enumeration order. Computed once at startup; the snapshot is
/// not refreshed if the store changes afterwards.
pub async fn describe_schema(store: &dyn Store) -> Result<Vec<SchemaEntry>> {
    let mut keys = store.keys().await?;
    keys.sort();

    let mut entries = Vec::new();
    for key in keys {
        if store.key_type(&key).await? != "hash" {
            continue;
        }
        let fields = store.hash_fields(&key).await?;
        entries.push(SchemaEntry { key, fields });
    }

    debug!(records = entries.len(), "introspected store schema");
    Ok(entries)
}

/// Render the schema as one line per record, the exact text embedded in the
/// system prompt and the tool's parameter description.
pub fn render_schema(entries: &[SchemaEntry]) -> String {
    entries
        .iter()
        .map(|entry| format!("Record {} (Fields: {})", entry.key, entry.fields.join(", ")))
        .collect::<Vec<_>>()
        .join("\n")
}
