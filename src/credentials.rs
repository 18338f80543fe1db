//! A lightweight, read-only credential store.
//!
//! Credentials are loaded once at startup from a JSON array of
//! `{"username", "password", "perms"}` records and never change afterwards,
//! so lookups need no locking.
use crate::token::is_valid_name;
use crate::{NskvError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::io::Read;
use std::path::Path;

/// Permission granting every operation.
pub const PERM_ALL: &str = "all";

/// Authentication and authorization configuration for a single user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub perms: Vec<String>,
}

#[derive(Debug, Clone)]
struct Account {
    password: String,
    perms: HashSet<String>,
}

/// Stores authentication and authorization information for all users.
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    accounts: HashMap<String, Account>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads credential information from a reader.
    ///
    /// Fails on truncated or invalid JSON and on usernames that are not
    /// alphanumeric. When a username appears twice the later record wins.
    pub fn load<R: Read>(reader: R) -> Result<Self> {
        let records: Vec<Credential> = serde_json::from_reader(reader)
            .map_err(|e| NskvError::CredentialLoad(e.to_string()))?;
        Self::from_credentials(records)
    }

    /// Loads credential information from a file on disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let file = std::fs::File::open(path).map_err(|e| {
            NskvError::CredentialLoad(format!("cannot open '{}': {}", path.display(), e))
        })?;
        Self::load(std::io::BufReader::new(file))
    }

    /// Builds a store from already parsed records.
    pub fn from_credentials<I>(records: I) -> Result<Self>
    where
        I: IntoIterator<Item = Credential>,
    {
        let mut accounts = HashMap::new();
        for cred in records {
            if !is_valid_name(&cred.username) {
                return Err(NskvError::CredentialLoad(format!(
                    "username '{}' must be 1-64 alphanumerics",
                    cred.username
                )));
            }
            accounts.insert(
                cred.username,
                Account {
                    password: cred.password,
                    perms: cred.perms.into_iter().collect(),
                },
            );
        }
        Ok(Self { accounts })
    }

    /// Returns true if the password is correct for the given username.
    pub fn check(&self, username: &str, password: &str) -> bool {
        self.accounts
            .get(username)
            .is_some_and(|account| account.password == password)
    }

    /// Returns true if username has the given perm. It does not
    /// perform any password checking.
    pub fn has_perm(&self, username: &str, perm: &str) -> bool {
        self.accounts
            .get(username)
            .is_some_and(|account| account.perms.contains(perm))
    }

    /// Number of known users.
    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    /// Known usernames, sorted.
    pub fn usernames(&self) -> Vec<String> {
        let mut names: Vec<String> = self.accounts.keys().cloned().collect();
        names.sort();
        names
    }
}
