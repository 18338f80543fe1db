//! Composite storage keys and name validation.
//!
//! Every entry lives under `username.namespace.rawKey`. Usernames and
//! namespaces are restricted to ASCII alphanumerics, so the `.` separator can
//! never be part of either and two different (user, namespace) pairs can never
//! produce overlapping prefixes.

/// Separator between the parts of a composite key.
pub const KEY_SEPARATOR: char = '.';

/// Longest accepted username or namespace.
pub const MAX_NAME_LEN: usize = 64;

/// Returns true for 1 to 64 ASCII alphanumeric characters.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= MAX_NAME_LEN
        && name.chars().all(|c| c.is_ascii_alphanumeric())
}

/// `username.namespace.rawKey`
pub fn composite_key(username: &str, namespace: &str, raw_key: &str) -> String {
    let mut key =
        String::with_capacity(username.len() + namespace.len() + raw_key.len() + 2);
    key.push_str(username);
    key.push(KEY_SEPARATOR);
    key.push_str(namespace);
    key.push(KEY_SEPARATOR);
    key.push_str(raw_key);
    key
}

/// `username.namespace.`: the prefix shared by every key of one namespace.
pub fn namespace_prefix(username: &str, namespace: &str) -> String {
    composite_key(username, namespace, "")
}

/// `username.`: the prefix shared by every key of one user.
pub fn user_prefix(username: &str) -> String {
    format!("{}{}", username, KEY_SEPARATOR)
}

/// A verified (username, namespace) pair, produced only by token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamespaceScope {
    username: String,
    namespace: String,
}

impl NamespaceScope {
    pub(crate) fn new(username: String, namespace: String) -> Self {
        Self {
            username,
            namespace,
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Composite key for `raw_key` inside this scope.
    pub fn composite_key(&self, raw_key: &str) -> String {
        composite_key(&self.username, &self.namespace, raw_key)
    }

    pub fn prefix(&self) -> String {
        namespace_prefix(&self.username, &self.namespace)
    }

    /// Strips this scope's prefix from a composite key. `None` if the key belongs elsewhere.
    pub fn strip<'a>(&self, composite: &'a str) -> Option<&'a str> {
        composite
            .strip_prefix(self.username.as_str())?
            .strip_prefix(KEY_SEPARATOR)?
            .strip_prefix(self.namespace.as_str())?
            .strip_prefix(KEY_SEPARATOR)
    }
}
