//! The on-disk document shape.

use crate::value::Value;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// `storageName` written into freshly created documents.
pub const DEFAULT_STORAGE_NAME: &str = "standardUserDefaults";

/// Root JSON object of the backing file:
///
/// ```json
/// {"storageName":"standardUserDefaults","keyValueStore":{"a":1}}
/// ```
///
/// A file missing `keyValueStore` does not decode, so a loaded document always
/// has a key space. A missing `storageName` falls back to the default.
/// Entries holding a `null` (at any depth) are skipped with a warning; the
/// rest of the key space still loads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Informational label, set when the document is first created.
    #[serde(rename = "storageName", default = "default_storage_name")]
    pub storage_name: String,
    /// The key space every public accessor works on.
    #[serde(rename = "keyValueStore", deserialize_with = "deserialize_key_space")]
    pub key_value_store: BTreeMap<String, Value>,
}

impl Document {
    /// Empty document carrying `storage_name`.
    pub fn new(storage_name: impl Into<String>) -> Self {
        Self {
            storage_name: storage_name.into(),
            key_value_store: BTreeMap::new(),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new(DEFAULT_STORAGE_NAME)
    }
}

fn default_storage_name() -> String {
    DEFAULT_STORAGE_NAME.to_owned()
}

fn deserialize_key_space<'de, D>(deserializer: D) -> Result<BTreeMap<String, Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = BTreeMap::<String, serde_json::Value>::deserialize(deserializer)?;
    let mut entries = BTreeMap::new();
    for (key, json) in raw {
        match serde_json::from_value::<Value>(json) {
            Ok(value) => {
                entries.insert(key, value);
            }
            Err(e) => tracing::warn!(key = %key, error = %e, "skipping unsupported stored value"),
        }
    }
    Ok(entries)
}
