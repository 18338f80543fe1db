use serde::{Deserialize, Serialize};

/// Connection-level metadata attached to every call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallMetadata {
    pub username: Option<String>,
    pub password: Option<String>,
    /// Namespace token from `UseNamespace`, required by namespace-scoped calls.
    pub token: Option<String>,
}

impl CallMetadata {
    pub fn login(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            token: None,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}

/// Outcome of `Set`, `Update` and `Has`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusReply {
    pub success: bool,
    pub message: String,
}

impl StatusReply {
    pub(crate) fn affected(count: usize) -> Self {
        Self {
            success: true,
            message: format!("({} pair(s) affected)", count),
        }
    }

    pub(crate) fn found(count: usize) -> Self {
        Self {
            success: count > 0,
            message: format!("({} pair(s) found)", count),
        }
    }
}

/// A raw key (namespace prefix stripped) and its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValuePair {
    pub key: String,
    pub value: String,
}

impl KeyValuePair {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Permission classes checked by the request gate when enforcement is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    Read,
    Write,
    Namespace,
}

impl Permission {
    /// Permission string expected in the credential record.
    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::Read => "read",
            Permission::Write => "write",
            Permission::Namespace => "namespace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_messages() {
        assert_eq!(StatusReply::affected(1).message, "(1 pair(s) affected)");
        let miss = StatusReply::found(0);
        assert!(!miss.success);
        assert_eq!(miss.message, "(0 pair(s) found)");
        assert!(StatusReply::found(1).success);
    }

    #[test]
    fn test_metadata_defaults_from_partial_json() {
        let meta: CallMetadata = serde_json::from_str(r#"{"username":"admin"}"#).unwrap();
        assert_eq!(meta.username.as_deref(), Some("admin"));
        assert!(meta.password.is_none());
        assert!(meta.token.is_none());
    }
}
