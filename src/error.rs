//! Defines the custom error types and `Result` alias for the crate.
use thiserror::Error;

/// The primary error type for all fallible operations in the `nskv` library.
#[derive(Error, Debug)]
pub enum NskvError {
    /// `Set` was called for a key that is already present in the namespace.
    #[error("key already exists")]
    KeyExists,

    /// The requested key is not present in the namespace.
    #[error("key does not exist")]
    KeyMissing,

    /// A namespace-scoped call arrived without a token attached.
    #[error("missing token for namespace, use UseNamespace to set a namespace")]
    MissingToken,

    /// The attached token is malformed, expired, or was signed with another secret.
    #[error("invalid token for namespace, use UseNamespace to set a namespace")]
    InvalidToken,

    /// The call carried no username or password.
    #[error("missing credential metadata, please login again")]
    MissingCredentialMetadata,

    /// Signing a freshly issued token failed.
    #[error("unable to sign token")]
    TokenSigning,

    /// The requested namespace name does not satisfy the naming policy.
    #[error("invalid namespace '{0}', 1-64 alphanumerics only")]
    InvalidNamespace(String),

    /// Bad username/password, missing permission, or a token presented by another user.
    #[error("access denied: {0}")]
    AccessDenied(String),

    /// Writing a snapshot failed after the retry.
    #[error("snapshot write failed: {0}")]
    SnapshotWrite(String),

    /// Reading or parsing a snapshot failed.
    #[error("snapshot load failed: {0}")]
    SnapshotLoad(String),

    /// The credential source is truncated or otherwise malformed.
    #[error("failed to load credentials: {0}")]
    CredentialLoad(String),

    /// Startup configuration is missing or invalid.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// A transport frame could not be decoded.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// An error related to I/O operations, such as reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An error that occurred during JSON serialization or deserialization.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NskvError {
    /// Stable, machine-readable code sent over the wire with every failure.
    pub fn code(&self) -> &'static str {
        match self {
            NskvError::KeyExists => "key_exists",
            NskvError::KeyMissing => "key_missing",
            NskvError::MissingToken => "missing_token",
            NskvError::InvalidToken => "invalid_token",
            NskvError::MissingCredentialMetadata => "missing_credential_metadata",
            NskvError::TokenSigning => "token_signing_failure",
            NskvError::InvalidNamespace(_) => "invalid_namespace",
            NskvError::AccessDenied(_) => "access_denied",
            NskvError::SnapshotWrite(_) => "snapshot_write_failure",
            NskvError::SnapshotLoad(_) => "snapshot_load_failure",
            NskvError::CredentialLoad(_) => "credential_load_failure",
            NskvError::Config(_) => "config",
            NskvError::BadRequest(_) => "bad_request",
            NskvError::Io(_) => "io",
            NskvError::Serialization(_) => "serialization",
        }
    }
}

/// A specialized `Result` type for nskv operations.
pub type Result<T> = std::result::Result<T, NskvError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_match_wire_wording() {
        assert_eq!(NskvError::KeyExists.to_string(), "key already exists");
        assert_eq!(NskvError::KeyMissing.to_string(), "key does not exist");
        assert!(NskvError::InvalidNamespace("a.b".into())
            .to_string()
            .contains("'a.b'"));
    }

    #[test]
    fn test_codes_are_distinct_for_auth_failures() {
        let codes = [
            NskvError::MissingToken.code(),
            NskvError::InvalidToken.code(),
            NskvError::MissingCredentialMetadata.code(),
            NskvError::AccessDenied(String::new()).code(),
        ];
        for (i, a) in codes.iter().enumerate() {
            for b in &codes[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }
}
