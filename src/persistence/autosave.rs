//! Background snapshot cadence with a final flush on shutdown.
use super::FilePersistence;
use crate::store::ShardedStore;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

/// Handle to the periodic snapshot task.
///
/// Dropping the handle does not stop the task; call [`AutosaveTask::shutdown`].
#[derive(Debug)]
pub struct AutosaveTask {
    cancel: CancellationToken,
    handle: JoinHandle<()>,
}

impl AutosaveTask {
    /// Spawns the cadence. The first snapshot is taken one `interval` after start.
    pub fn spawn(
        store: Arc<ShardedStore>,
        persistence: Arc<FilePersistence>,
        interval: Duration,
    ) -> Self {
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(run(store, persistence, interval, cancel.clone()));
        Self { cancel, handle }
    }

    /// Token that stops the cadence when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    /// Stops further firings, waits for the final snapshot and joins the task.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            error!(error = %e, "autosave task panicked");
        }
    }
}

async fn run(
    store: Arc<ShardedStore>,
    persistence: Arc<FilePersistence>,
    interval: Duration,
    cancel: CancellationToken,
) {
    let mut ticker = time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => match persistence.save(&store).await {
                Ok(entries) => debug!(entries, "periodic snapshot written"),
                Err(e) => warn!(error = %e, "periodic snapshot failed, retrying next cycle"),
            },
        }
    }

    match persistence.save(&store).await {
        Ok(entries) => info!(entries, "final snapshot written"),
        Err(e) => error!(error = %e, "final snapshot failed"),
    }
}
