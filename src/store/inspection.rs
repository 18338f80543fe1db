//! Contains whole-store reads and bulk maintenance for the `ShardedStore`.
use super::ShardedStore;

impl ShardedStore {
    /// Copies every entry, sorted by key.
    ///
    /// Shards are walked one at a time, so a writer racing with the walk may or
    /// may not see its mutation included.
    pub async fn snapshot_all(&self) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for shard in &self.shards {
            let data = shard.read().await;
            entries.extend(data.entries());
        }
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Entries whose composite key starts with `prefix`, sorted by key.
    pub async fn scan_prefix(&self, prefix: &str) -> Vec<(String, String)> {
        let mut entries = Vec::new();
        for shard in &self.shards {
            let data = shard.read().await;
            entries.extend(data.entries_with_prefix(prefix));
        }
        entries.sort_unstable_by(|a, b| a.0.cmp(&b.0));
        entries
    }

    /// Total number of entries across all shards.
    pub async fn len(&self) -> usize {
        let mut total = 0;
        for shard in &self.shards {
            total += shard.read().await.len();
        }
        total
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Returns a vector containing the number of keys in each shard.
    /// The index of the vector corresponds to the shard index.
    pub async fn shard_key_counts(&self) -> Vec<usize> {
        let mut counts = Vec::with_capacity(self.shards.len());
        for shard in &self.shards {
            counts.push(shard.read().await.len());
        }
        counts
    }

    /// Bulk-inserts entries, overwriting existing keys. Used when recovering a snapshot.
    pub async fn restore<I>(&self, entries: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        for (key, value) in entries {
            let mut data = self.shard(&key).write().await;
            data.set_value(key, value);
        }
    }

    /// Removes every entry.
    pub async fn clear(&self) {
        for shard in &self.shards {
            shard.write().await.clear();
        }
    }
}
