//! Contains the `KvService`, which sequences credential and token checks
//! around every call before it reaches the store.

mod builder;
mod gate;
mod handlers;

pub use self::builder::KvServiceBuilder;

use crate::credentials::CredentialStore;
use crate::store::ShardedStore;
use crate::token::TokenManager;
use std::sync::Arc;

/// Service-level switches.
#[derive(Debug, Clone, Default)]
pub struct ServiceConfig {
    /// Require `read` / `write` / `namespace` permissions (or `all`) per call.
    pub enforce_permissions: bool,
}

/// Request gate and handlers for the namespaced key-value service.
#[derive(Debug)]
pub struct KvService {
    store: Arc<ShardedStore>,
    credentials: Arc<CredentialStore>,
    tokens: TokenManager,
    config: ServiceConfig,
}

impl KvService {
    /// Creates a new builder for configuring a `KvService`.
    pub fn builder() -> KvServiceBuilder {
        KvServiceBuilder::default()
    }

    fn new(
        store: Arc<ShardedStore>,
        credentials: Arc<CredentialStore>,
        tokens: TokenManager,
        config: ServiceConfig,
    ) -> Self {
        Self {
            store,
            credentials,
            tokens,
            config,
        }
    }

    /// The store this service dispatches to.
    pub fn store(&self) -> &Arc<ShardedStore> {
        &self.store
    }
}
