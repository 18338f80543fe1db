//! Contains all single-key operations for the `ShardedStore`.
//!
//! Each operation locks exactly one shard for its whole duration, which makes
//! operations on the same key linearizable.
use super::ShardedStore;

impl ShardedStore {
    /// Inserts only if `key` is absent. Returns `false` without mutating anything
    /// when the key is already present.
    pub async fn set_if_absent(&self, key: &str, value: String) -> bool {
        let mut data = self.shard(key).write().await;
        data.insert_if_absent(key.to_string(), value)
    }

    /// Unconditional upsert. Returns the previous value, if any.
    pub async fn set(&self, key: &str, value: String) -> Option<String> {
        let mut data = self.shard(key).write().await;
        data.set_value(key.to_string(), value)
    }

    /// Overwrites the value only when `key` is present. Returns `false` when absent.
    pub async fn replace(&self, key: &str, value: String) -> bool {
        let mut data = self.shard(key).write().await;
        data.replace_value(key, value).is_some()
    }

    /// Gets a value by key.
    pub async fn get(&self, key: &str) -> Option<String> {
        let data = self.shard(key).read().await;
        data.get_value(key)
    }

    /// Checks if a key exists.
    pub async fn has(&self, key: &str) -> bool {
        let data = self.shard(key).read().await;
        data.has_key(key)
    }

    /// Atomically removes a key and returns its prior value.
    pub async fn pop(&self, key: &str) -> Option<String> {
        let mut data = self.shard(key).write().await;
        data.delete_value(key)
    }
}
