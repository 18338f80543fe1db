//! Claims carried inside a namespace session token.

use serde::{Deserialize, Serialize};

/// Signed claims binding a connection to one (username, namespace) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NamespaceClaims {
    /// Username the token was issued to
    #[serde(rename = "sub")]
    pub username: String,

    /// Namespace the token grants access to
    #[serde(rename = "ns")]
    pub namespace: String,

    /// Issuer tag
    #[serde(rename = "iss")]
    pub issuer: String,

    /// Issued at (Unix timestamp)
    #[serde(rename = "iat")]
    pub issued_at: i64,

    /// Expiration time (Unix timestamp). Tokens without one never expire.
    #[serde(rename = "exp", default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<i64>,
}
