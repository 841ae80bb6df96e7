use anyhow::Result;
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use super::Store;
use crate::models::tool::Tool;

/// Name of the single declared tool.
pub const QUERY_TOOL: &str = "query_store";

/// A structured query against the store, parsed from model-supplied text.
///
/// `key` is mandatory; `field`, when present, narrows the result to one
/// value. Extra members are ignored rather than rejected.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RecordQuery {
    pub key: String,
    #[serde(default)]
    pub field: Option<String>,
}

#[derive(Debug, Error)]
pub enum QueryParseError {
    #[error("invalid query format - {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("'key' is missing in query")]
    MissingKey,
}

impl RecordQuery {
    pub fn parse(raw: &str) -> Result<Self, QueryParseError> {
        let value: Value = serde_json::from_str(raw)?;
        if value.get("key").is_none() {
            return Err(QueryParseError::MissingKey);
        }
        Ok(serde_json::from_value(value)?)
    }
}

/// Declare the query tool, embedding the live schema in the parameter
/// description so the model can ground its queries without a discovery call.
pub fn query_tool(schema_text: &str) -> Tool {
    Tool::new(
        QUERY_TOOL,
        "Query the record store for hash records. Provide a 'query' JSON string. \
         Use 'key' for the record key and optional 'field' for a specific field. \
         Examples: '{\"key\": \"user:1\"}' (all fields), \
         '{\"key\": \"user:1\", \"field\": \"age\"}' (specific field).",
        json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": format!(
                        "JSON string for the query. \
                         Format: '{{\"key\": \"key_name\", \"field\": \"field_name\"}}' (field optional). \
                         Schema:\n{}",
                        schema_text
                    ),
                }
            },
            "required": ["query"],
        }),
    )
}

/// Resolve a raw query string against the store.
///
/// Never fails: the caller feeds the returned text straight back to the
/// model as the tool's output, so every outcome (including parse failures
/// and store I/O errors) is a descriptive string.
pub async fn execute(store: &dyn Store, raw_query: &str) -> String {
    let query = match RecordQuery::parse(raw_query) {
        Ok(query) => query,
        Err(e) => return format!("Error: {}", e),
    };

    debug!(key = %query.key, field = ?query.field, "executing record query");
    match resolve(store, &query).await {
        Ok(text) => text,
        Err(e) => format!("Error: {}", e),
    }
}

async fn resolve(store: &dyn Store, query: &RecordQuery) -> Result<String> {
    let key_type = store.key_type(&query.key).await?;
    if key_type != "hash" {
        return Ok(format!(
            "Error: '{}' is not a hash key (type: {})",
            query.key, key_type
        ));
    }

    match &query.field {
        Some(field) => match store.hash_get(&query.key, field).await? {
            Some(value) => Ok(format!("{}: {}", field, value)),
            // An absent field is a normal empty result, not an error
            None => Ok(format!(
                "No value found for field '{}' in key '{}'",
                field, query.key
            )),
        },
        None => {
            let pairs = store.hash_get_all(&query.key).await?;
            if pairs.is_empty() {
                return Ok(format!("No fields found in key '{}'", query.key));
            }
            Ok(pairs
                .iter()
                .map(|(field, value)| format!("{}: {}", field, value))
                .collect::<Vec<_>>()
                .join("\n"))
        }
    }
}
