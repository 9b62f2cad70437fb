//! Pluggable maps for the in-memory key space.
//!
//! Implement [`MapBackend`] to bring your own concurrent map.

use crate::value::Value;
use std::collections::HashMap;

/// Thread-safe map from key to [`Value`] backing a
/// [`UserDefaults`](crate::UserDefaults) store.
///
/// Methods take and return owned values so the store API looks the same
/// whatever the backend keeps internally. Backends that hold values behind an
/// `Arc` (like ShardMap) clone on read.
pub trait MapBackend: Send + Sync {
    /// Insert or overwrite, returning the previous value if any.
    fn insert(&self, key: String, value: Value) -> Option<Value>;

    /// Look up a value by key.
    fn get(&self, key: &str) -> Option<Value>;

    /// Remove a key, returning its value if it was present.
    fn remove(&self, key: &str) -> Option<Value>;

    /// Copy of all entries. Must not hold locks that block writers once
    /// returned.
    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (String, Value)> + Send + '_>;

    /// Number of entries.
    fn map_len(&self) -> usize;

    /// Existence check. Override when the backend can skip the clone.
    fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Drop every entry. The default removes keys one by one.
    fn clear(&self) {
        let keys: Vec<String> = self.iter_snapshot().map(|(k, _)| k).collect();
        for k in &keys {
            self.remove(k);
        }
    }
}

// ---- ShardMap ----------------------------------------------------------------

// ShardMap lookups take `&K`, hence the owned key.
impl MapBackend for shardmap::ShardMap<String, Value> {
    fn insert(&self, key: String, value: Value) -> Option<Value> {
        shardmap::ShardMap::insert(self, key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        shardmap::ShardMap::get(self, &key.to_owned())
    }

    fn remove(&self, key: &str) -> Option<Value> {
        shardmap::ShardMap::remove(self, &key.to_owned())
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (String, Value)> + Send + '_> {
        Box::new(self.entries().into_iter())
    }

    fn map_len(&self) -> usize {
        self.len()
    }

    fn contains_key(&self, key: &str) -> bool {
        shardmap::ShardMap::get(self, &key.to_owned()).is_some()
    }
}

// ---- RwLock<HashMap> ---------------------------------------------------------

impl MapBackend for parking_lot::RwLock<HashMap<String, Value>> {
    fn insert(&self, key: String, value: Value) -> Option<Value> {
        self.write().insert(key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.read().get(key).cloned()
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.write().remove(key)
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (String, Value)> + Send + '_> {
        let snap: Vec<_> = self
            .read()
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        Box::new(snap.into_iter())
    }

    fn map_len(&self) -> usize {
        self.read().len()
    }

    fn contains_key(&self, key: &str) -> bool {
        self.read().contains_key(key)
    }

    fn clear(&self) {
        self.write().clear()
    }
}

// ---- DashMap (feature-gated) -------------------------------------------------

#[cfg(feature = "dashmap")]
impl MapBackend for dashmap::DashMap<String, Value> {
    fn insert(&self, key: String, value: Value) -> Option<Value> {
        self.insert(key, value)
    }

    fn get(&self, key: &str) -> Option<Value> {
        self.get(key).map(|r| r.value().clone())
    }

    fn remove(&self, key: &str) -> Option<Value> {
        self.remove(key).map(|(_, v)| v)
    }

    fn iter_snapshot(&self) -> Box<dyn Iterator<Item = (String, Value)> + Send + '_> {
        let snap: Vec<_> = self
            .iter()
            .map(|r| (r.key().clone(), r.value().clone()))
            .collect();
        Box::new(snap.into_iter())
    }

    fn map_len(&self) -> usize {
        self.len()
    }

    fn contains_key(&self, key: &str) -> bool {
        dashmap::DashMap::contains_key(self, key)
    }

    fn clear(&self) {
        dashmap::DashMap::clear(self)
    }
}
