//! TCP front end speaking newline-delimited JSON.
//!
//! Every request frame carries its own credentials (and token, for
//! namespace-scoped calls), so the listener itself holds no session state.

mod connection;
pub mod protocol;

pub use connection::{dispatch, MAX_FRAME_LEN};

use crate::service::KvService;
use crate::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Accepts connections and spawns one task per connection.
#[derive(Debug)]
pub struct Server {
    service: Arc<KvService>,
    listener: TcpListener,
}

impl Server {
    /// Binds the listener.
    pub async fn bind(service: Arc<KvService>, addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self { service, listener })
    }

    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    /// Runs the accept loop until `shutdown` is cancelled, then waits for open
    /// connections to wind down.
    pub async fn serve(self, shutdown: CancellationToken) -> Result<()> {
        info!(addr = %self.local_addr()?, "listening");
        let mut connections = JoinSet::new();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                accepted = self.listener.accept() => {
                    let (stream, peer) = match accepted {
                        Ok(pair) => pair,
                        Err(e) => {
                            warn!(error = %e, "accept failed");
                            continue;
                        }
                    };
                    debug!(%peer, "connection accepted");
                    let service = Arc::clone(&self.service);
                    let token = shutdown.child_token();
                    connections.spawn(async move {
                        if let Err(e) = connection::serve_connection(service, stream, peer, token).await {
                            debug!(%peer, error = %e, "connection ended with error");
                        }
                    });
                }
                Some(_) = connections.join_next(), if !connections.is_empty() => {}
            }
        }

        while connections.join_next().await.is_some() {}
        info!("server stopped");
        Ok(())
    }
}
