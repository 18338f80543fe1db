//! nskv - Namespaced Key-Value Service
//!
//! A multi-tenant, in-memory key-value store where every user works inside one
//! or more named namespaces and must hold a signed session token to touch keys
//! in a namespace.
//!
//! # Features
//!
//! - **Sharded Store**: fixed power-of-two shards, each behind its own lock
//! - **Namespace Tokens**: HS256-signed tokens binding a caller to a namespace
//! - **Credential Gate**: read-only username/password/permission lookup
//! - **Persistence**: periodic and shutdown JSON snapshots, load on start
//! - **Transport**: newline-delimited JSON over TCP
//!
//! # Quick Start
//!
//! ```rust
//! use nskv::{CallMetadata, Credential, CredentialStore, KvService, Result, TokenConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let users = CredentialStore::from_credentials(vec![Credential {
//!         username: "alice".into(),
//!         password: "secret".into(),
//!         perms: vec![],
//!     }])?;
//!     let service = KvService::builder()
//!         .with_credentials(users)
//!         .with_token_config(TokenConfig::new(b"a-process-wide-secret-of-32-bytes".to_vec()))
//!         .build()?;
//!
//!     let login = CallMetadata::login("alice", "secret");
//!     let token = service.use_namespace(&login, "proj1").await?;
//!     let meta = login.with_token(token);
//!
//!     service.set(&meta, "greeting", "hello".to_string()).await?;
//!     let pair = service.get(&meta, "greeting").await?;
//!     assert_eq!(pair.value, "hello");
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod credentials;
pub mod data_table;
pub mod error;
pub mod persistence;
pub mod server;
pub mod service;
pub mod store;
pub mod token;
pub mod types;

// Re-export commonly used types
pub use config::ServerConfig;
pub use credentials::{Credential, CredentialStore};
pub use error::{NskvError, Result};
pub use persistence::{AutosaveTask, FilePersistence, Snapshot};
pub use server::Server;
pub use service::{KvService, KvServiceBuilder, ServiceConfig};
pub use store::ShardedStore;
pub use token::{NamespaceScope, TokenConfig, TokenManager};
pub use types::*;
