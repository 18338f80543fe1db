//! Namespace session tokens.
//!
//! `UseNamespace` hands out an HS256-signed JWT naming the caller and the
//! chosen namespace. Later calls present that token, and a successful
//! verification yields the [`NamespaceScope`] the call operates in. Tokens are
//! stateless: there is no revocation list, only the optional expiry.

mod claims;
mod keys;

pub use claims::NamespaceClaims;
pub use keys::{
    composite_key, is_valid_name, namespace_prefix, user_prefix, NamespaceScope, KEY_SEPARATOR,
    MAX_NAME_LEN,
};

use crate::{NskvError, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use std::time::Duration;
use tracing::debug;

/// Minimum signing secret length in bytes.
pub const MIN_SECRET_LEN: usize = 32;

/// Default issuer tag embedded in every token.
pub const DEFAULT_ISSUER: &str = "nskv";

/// Configuration for the token manager
#[derive(Clone)]
pub struct TokenConfig {
    /// HMAC signing secret (must be at least 32 bytes)
    pub secret: Vec<u8>,
    /// Issuer claim for tokens
    pub issuer: String,
    /// Token time-to-live. `None` issues tokens without an expiry.
    pub ttl: Option<Duration>,
}

impl TokenConfig {
    pub fn new(secret: impl Into<Vec<u8>>) -> Self {
        Self {
            secret: secret.into(),
            issuer: DEFAULT_ISSUER.to_string(),
            ttl: None,
        }
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    pub fn with_issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = issuer.into();
        self
    }
}

impl std::fmt::Debug for TokenConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenConfig")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

/// Issues and verifies namespace tokens with a process-wide secret.
pub struct TokenManager {
    issuer: String,
    ttl: Option<Duration>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl std::fmt::Debug for TokenManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenManager")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl TokenManager {
    /// Creates a token manager. Fails if the secret is shorter than 32 bytes.
    pub fn new(config: TokenConfig) -> Result<Self> {
        if config.secret.len() < MIN_SECRET_LEN {
            return Err(NskvError::Config(format!(
                "signing secret must be at least {} bytes",
                MIN_SECRET_LEN
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.required_spec_claims.clear();
        validation.set_issuer(&[&config.issuer]);

        Ok(Self {
            encoding_key: EncodingKey::from_secret(&config.secret),
            decoding_key: DecodingKey::from_secret(&config.secret),
            validation,
            issuer: config.issuer,
            ttl: config.ttl,
        })
    }

    /// Issues a token binding `username` to `namespace`.
    pub fn issue_token(&self, username: &str, namespace: &str) -> Result<String> {
        if !is_valid_name(namespace) {
            return Err(NskvError::InvalidNamespace(namespace.to_string()));
        }

        let now = chrono::Utc::now().timestamp();
        let expires_at = match self.ttl {
            Some(ttl) => Some(
                i64::try_from(ttl.as_secs())
                    .ok()
                    .and_then(|secs| now.checked_add(secs))
                    .ok_or(NskvError::TokenSigning)?,
            ),
            None => None,
        };
        let claims = NamespaceClaims {
            username: username.to_string(),
            namespace: namespace.to_string(),
            issuer: self.issuer.clone(),
            issued_at: now,
            expires_at,
        };
        self.sign(&claims)
    }

    /// Signs arbitrary claims with this manager's secret.
    pub fn sign(&self, claims: &NamespaceClaims) -> Result<String> {
        encode(&Header::new(Algorithm::HS256), claims, &self.encoding_key).map_err(|e| {
            debug!(error = %e, "token signing failed");
            NskvError::TokenSigning
        })
    }

    /// Verifies the token attached to a call.
    ///
    /// `None` or an empty string is `MissingToken`. A bad signature, wrong issuer,
    /// malformed payload or passed expiry is `InvalidToken`.
    pub fn verify_token(&self, presented: Option<&str>) -> Result<NamespaceScope> {
        let token = match presented {
            Some(t) if !t.is_empty() => t,
            _ => return Err(NskvError::MissingToken),
        };

        let data = decode::<NamespaceClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| {
                debug!(error = %e, "token rejected");
                NskvError::InvalidToken
            })?;
        let claims = data.claims;

        if !is_valid_name(&claims.namespace) || !is_valid_name(&claims.username) {
            return Err(NskvError::InvalidToken);
        }

        Ok(NamespaceScope::new(claims.username, claims.namespace))
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }
}
