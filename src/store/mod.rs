//! Contains the `ShardedStore`, the process-wide map from composite key to value.
//!
//! The keyspace is split into a fixed, power-of-two number of shards. Each shard
//! owns its own lock, so an operation on one key only ever waits on writers of
//! keys that hash to the same shard.

mod helpers;
mod inspection;
mod ops_single;

use crate::data_table::DataTable;
use tokio::sync::RwLock;

/// Shard count used when none is configured.
pub const DEFAULT_SHARD_COUNT: usize = 32;

/// Upper bound on the shard count; larger requests are clamped.
pub const MAX_SHARD_COUNT: usize = 1 << 16;

/// Used as a default capacity hint to avoid needless reallocation for small key numbers
const DEFAULT_SHARD_CAPACITY: usize = 1024;

/// Sharded, lock-per-shard key-value map.
///
/// `snapshot_all` and the prefix scans visit shards one after another, so they
/// do not observe a single atomic cut of the whole store. Each returned entry
/// was read under its shard's lock and is never half-written.
#[derive(Debug)]
pub struct ShardedStore {
    shards: Vec<RwLock<DataTable>>,
    mask: u64,
}

impl ShardedStore {
    /// Creates an empty store. `shard_count` is clamped to `1..=MAX_SHARD_COUNT`
    /// and rounded up to the next power of two.
    pub fn new(shard_count: usize) -> Self {
        let count = shard_count.clamp(1, MAX_SHARD_COUNT).next_power_of_two();
        let shards = (0..count)
            .map(|_| RwLock::new(DataTable::with_capacity(DEFAULT_SHARD_CAPACITY)))
            .collect();
        Self {
            shards,
            mask: (count - 1) as u64,
        }
    }

    /// Creates a store already holding `entries`.
    pub async fn from_entries<I>(shard_count: usize, entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let store = Self::new(shard_count);
        store.restore(entries).await;
        store
    }

    /// Number of shards.
    pub fn shard_count(&self) -> usize {
        self.shards.len()
    }
}

impl Default for ShardedStore {
    fn default() -> Self {
        Self::new(DEFAULT_SHARD_COUNT)
    }
}
