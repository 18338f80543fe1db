//! Contains the `KvServiceBuilder` for fluently constructing a `KvService`.
use super::{KvService, ServiceConfig};
use crate::credentials::CredentialStore;
use crate::store::ShardedStore;
use crate::token::{TokenConfig, TokenManager};
use crate::{NskvError, Result};
use std::sync::Arc;

/// Builder for creating KvService instances
///
/// # Example
///
/// ```rust
/// use nskv::{CredentialStore, Credential, KvService, TokenConfig};
///
/// # fn run() -> nskv::Result<()> {
/// let users = CredentialStore::from_credentials(vec![Credential {
///     username: "admin".into(),
///     password: "admin123".into(),
///     perms: vec![],
/// }])?;
/// let service = KvService::builder()
///     .with_credentials(users)
///     .with_token_config(TokenConfig::new(vec![7u8; 32]))
///     .build()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct KvServiceBuilder {
    store: Option<Arc<ShardedStore>>,
    credentials: Option<Arc<CredentialStore>>,
    token_config: Option<TokenConfig>,
    config: ServiceConfig,
}

impl KvServiceBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use an existing store, e.g. one restored from a snapshot. Defaults to an empty store.
    pub fn with_store(mut self, store: Arc<ShardedStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_credentials(mut self, credentials: CredentialStore) -> Self {
        self.credentials = Some(Arc::new(credentials));
        self
    }

    /// Required: carries the signing secret.
    pub fn with_token_config(mut self, config: TokenConfig) -> Self {
        self.token_config = Some(config);
        self
    }

    pub fn with_config(mut self, config: ServiceConfig) -> Self {
        self.config = config;
        self
    }

    pub fn enforce_permissions(mut self, enabled: bool) -> Self {
        self.config.enforce_permissions = enabled;
        self
    }

    /// Build the service. Fails if no token configuration was given or its secret is too short.
    pub fn build(self) -> Result<Arc<KvService>> {
        let token_config = self
            .token_config
            .ok_or_else(|| NskvError::Config("token configuration is required".to_string()))?;
        let tokens = TokenManager::new(token_config)?;
        let store = self.store.unwrap_or_default();
        let credentials = self.credentials.unwrap_or_default();
        Ok(Arc::new(KvService::new(store, credentials, tokens, self.config)))
    }
}
