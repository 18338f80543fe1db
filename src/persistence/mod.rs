//! Handles the serialization and file I/O for saving and loading store snapshots.
//!
//! A snapshot is a JSON document `{"data": {"<composite key>": "<value>"}}`.
//! Writes go to a sibling temp file that is then renamed over the target, so a
//! crash mid-write leaves the previous snapshot intact.

mod autosave;

pub use autosave::AutosaveTask;

use crate::store::ShardedStore;
use crate::{NskvError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, error, info, warn};

/// On-disk shape of a snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub data: BTreeMap<String, String>,
}

impl Snapshot {
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            data: entries.into_iter().collect(),
        }
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        serde_json::from_slice(bytes).map_err(|e| NskvError::SnapshotLoad(e.to_string()))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Serializes every entry currently in the store.
pub async fn snapshot(store: &ShardedStore) -> Result<Vec<u8>> {
    Snapshot::from_entries(store.snapshot_all().await).to_bytes()
}

/// Provides file-based persistence for the store.
#[derive(Debug, Clone)]
pub struct FilePersistence {
    path: PathBuf,
}

impl FilePersistence {
    /// Creates a new `FilePersistence` targeting `path`. Nothing touches the disk yet.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `bytes` to the snapshot path, retrying once.
    ///
    /// If the retry fails too, the failure is logged as a lost snapshot for this
    /// cycle and returned as `SnapshotWrite`.
    pub async fn write_snapshot(&self, bytes: &[u8]) -> Result<()> {
        let path = self.path.as_path();
        write_with_retry(path, move |_| write_atomic(path, bytes)).await
    }

    /// Snapshots `store` and writes it to disk.
    pub async fn save(&self, store: &ShardedStore) -> Result<usize> {
        let snap = Snapshot::from_entries(store.snapshot_all().await);
        let bytes = snap.to_bytes()?;
        self.write_snapshot(&bytes).await?;
        debug!(path = %self.path.display(), entries = snap.len(), "saved snapshot");
        Ok(snap.len())
    }

    /// Reads the snapshot at the configured path.
    pub async fn read_snapshot(&self) -> Result<Snapshot> {
        let bytes = fs::read(&self.path)
            .await
            .map_err(|e| NskvError::SnapshotLoad(format!("{}: {}", self.path.display(), e)))?;
        Snapshot::from_bytes(&bytes)
    }

    /// Loads the most recent snapshot, treating any failure as "no prior state".
    pub async fn load_snapshot(&self) -> Option<Snapshot> {
        match self.read_snapshot().await {
            Ok(snap) => {
                info!(path = %self.path.display(), entries = snap.len(), "loaded snapshot");
                Some(snap)
            }
            Err(e) => {
                info!(error = %e, "no previous data found, starting empty");
                None
            }
        }
    }

    /// Loads the snapshot (if any) into `store`. Returns the number of restored entries.
    pub async fn restore_into(&self, store: &ShardedStore) -> usize {
        match self.load_snapshot().await {
            Some(snap) => {
                let count = snap.len();
                store.restore(snap.data).await;
                count
            }
            None => 0,
        }
    }
}

/// Runs `write` up to twice. `write` receives the attempt number, starting at 1.
async fn write_with_retry<F, Fut>(path: &Path, mut write: F) -> Result<()>
where
    F: FnMut(u32) -> Fut,
    Fut: Future<Output = io::Result<()>>,
{
    match write(1).await {
        Ok(()) => Ok(()),
        Err(first) => {
            warn!(path = %path.display(), error = %first, "snapshot write failed, retrying");
            write(2).await.map_err(|second| {
                error!(
                    path = %path.display(),
                    error = %second,
                    "snapshot write failed twice, snapshot lost for this cycle"
                );
                NskvError::SnapshotWrite(second.to_string())
            })
        }
    }
}

/// Writes to `<path>.tmp`, syncs it, then renames it over `path`.
async fn write_atomic(path: &Path, bytes: &[u8]) -> io::Result<()> {
    let parent = path.parent().filter(|p| !p.as_os_str().is_empty());
    if let Some(parent) = parent {
        fs::create_dir_all(parent).await?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    let mut file = fs::File::create(&tmp).await?;
    file.write_all(bytes).await?;
    file.sync_all().await?;
    drop(file);

    fs::rename(&tmp, path).await?;
    sync_dir(parent.unwrap_or_else(|| Path::new("."))).await
}

/// Persists the directory entry created by the rename.
#[cfg(unix)]
async fn sync_dir(dir: &Path) -> io::Result<()> {
    fs::File::open(dir).await?.sync_all().await
}

#[cfg(not(unix))]
async fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
