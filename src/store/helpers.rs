//! Contains internal helper functions for the `ShardedStore` module.
use super::ShardedStore;
use crate::data_table::DataTable;
use std::hash::{Hash, Hasher};
use tokio::sync::RwLock;

/// Deterministic 64-bit hash of a composite key.
pub(super) fn key_hash(key: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    key.hash(&mut hasher);
    hasher.finish()
}

impl ShardedStore {
    /// Index of the shard owning `key`.
    pub(super) fn shard_index(&self, key: &str) -> usize {
        (key_hash(key) & self.mask) as usize
    }

    /// Get the shard for a given key
    pub(super) fn shard(&self, key: &str) -> &RwLock<DataTable> {
        &self.shards[self.shard_index(key)]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_hash_is_stable() {
        assert_eq!(key_hash("alice.proj1.x"), key_hash("alice.proj1.x"));
        assert_ne!(key_hash("alice.proj1.x"), key_hash("alice.proj1.y"));
    }

    #[test]
    fn test_shard_index_in_range() {
        let store = ShardedStore::new(8);
        for i in 0..1000 {
            let idx = store.shard_index(&format!("user.ns.key{}", i));
            assert!(idx < 8);
        }
    }
}
