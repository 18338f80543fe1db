//! Startup configuration.
//!
//! TOML with defaults for everything except the signing secret, which may also
//! come from the `NSKV_SIGNING_SECRET` environment variable.
//!
//! ```toml
//! listen_addr = "0.0.0.0:1234"
//! credentials_path = "data/users.json"
//! snapshot_path = "data/data.json"
//! snapshot_interval_secs = 300
//! signing_secret = "change-me-to-at-least-32-bytes-of-secret"
//! token_ttl_secs = 86400
//! ```
use crate::service::ServiceConfig;
use crate::store::{DEFAULT_SHARD_COUNT, MAX_SHARD_COUNT};
use crate::token::{TokenConfig, DEFAULT_ISSUER, MIN_SECRET_LEN};
use crate::{NskvError, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

/// Environment variable overriding `signing_secret`.
pub const SECRET_ENV_VAR: &str = "NSKV_SIGNING_SECRET";

/// Longest accepted token lifetime: ten years.
pub const MAX_TOKEN_TTL_SECS: u64 = 10 * 365 * 24 * 60 * 60;

/// Server configuration
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub listen_addr: String,
    pub credentials_path: PathBuf,
    pub snapshot_path: PathBuf,
    pub snapshot_interval_secs: u64,
    pub shard_count: usize,
    pub signing_secret: Option<String>,
    pub token_ttl_secs: Option<u64>,
    pub token_issuer: String,
    pub enforce_permissions: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:1234".to_string(),
            credentials_path: PathBuf::from("data/users.json"),
            snapshot_path: PathBuf::from("data/data.json"),
            snapshot_interval_secs: 300,
            shard_count: DEFAULT_SHARD_COUNT,
            signing_secret: None,
            token_ttl_secs: None,
            token_issuer: DEFAULT_ISSUER.to_string(),
            enforce_permissions: false,
        }
    }
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("listen_addr", &self.listen_addr)
            .field("credentials_path", &self.credentials_path)
            .field("snapshot_path", &self.snapshot_path)
            .field("snapshot_interval_secs", &self.snapshot_interval_secs)
            .field("shard_count", &self.shard_count)
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("token_issuer", &self.token_issuer)
            .field("enforce_permissions", &self.enforce_permissions)
            .finish_non_exhaustive()
    }
}

impl FromStr for ServerConfig {
    type Err = NskvError;

    fn from_str(s: &str) -> Result<Self> {
        toml::from_str(s).map_err(|e| NskvError::Config(e.to_string()))
    }
}

impl ServerConfig {
    /// Loads configuration from `path`. A missing file yields the defaults.
    /// The secret environment variable is applied and the result validated.
    pub fn load(path: &Path) -> Result<Self> {
        let mut config = match std::fs::read_to_string(path) {
            Ok(text) => text.parse()?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                return Err(NskvError::Config(format!(
                    "failed to read '{}': {}",
                    path.display(),
                    e
                )))
            }
        };
        if let Ok(secret) = std::env::var(SECRET_ENV_VAR) {
            config.signing_secret = Some(secret);
        }
        config.validate()?;
        Ok(config)
    }

    /// Checks values and rounds the shard count up to a power of two.
    pub fn validate(&mut self) -> Result<()> {
        if self.shard_count == 0 || self.shard_count > MAX_SHARD_COUNT {
            return Err(NskvError::Config(format!(
                "shard_count must be between 1 and {}",
                MAX_SHARD_COUNT
            )));
        }
        self.shard_count = self.shard_count.next_power_of_two();

        if self.snapshot_interval_secs == 0 {
            return Err(NskvError::Config(
                "snapshot_interval_secs must be at least 1".to_string(),
            ));
        }
        if let Some(ttl) = self.token_ttl_secs {
            if ttl == 0 || ttl > MAX_TOKEN_TTL_SECS {
                return Err(NskvError::Config(format!(
                    "token_ttl_secs must be between 1 and {}",
                    MAX_TOKEN_TTL_SECS
                )));
            }
        }
        match &self.signing_secret {
            None => Err(NskvError::Config(format!(
                "signing_secret is required (or set {})",
                SECRET_ENV_VAR
            ))),
            Some(s) if s.len() < MIN_SECRET_LEN => Err(NskvError::Config(format!(
                "signing_secret must be at least {} bytes",
                MIN_SECRET_LEN
            ))),
            Some(_) => Ok(()),
        }
    }

    pub fn snapshot_interval(&self) -> Duration {
        Duration::from_secs(self.snapshot_interval_secs)
    }

    pub fn token_config(&self) -> TokenConfig {
        let secret = self.signing_secret.clone().unwrap_or_default();
        let mut config = TokenConfig::new(secret.into_bytes()).with_issuer(&self.token_issuer);
        if let Some(ttl) = self.token_ttl_secs {
            config = config.with_ttl(Duration::from_secs(ttl));
        }
        config
    }

    pub fn service_config(&self) -> ServiceConfig {
        ServiceConfig {
            enforce_permissions: self.enforce_permissions,
        }
    }
}
