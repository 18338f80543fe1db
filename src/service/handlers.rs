//! One method per RPC. Each starts with its guard clause and then touches the
//! store only through composite keys derived from the verified scope.
use super::KvService;
use crate::token::{user_prefix, KEY_SEPARATOR};
use crate::types::{CallMetadata, KeyValuePair, Permission, StatusReply};
use crate::{NskvError, Result};
use std::collections::BTreeSet;
use tracing::debug;

impl KvService {
    /// Validates `namespace` and issues a token binding the caller to it.
    pub async fn use_namespace(&self, meta: &CallMetadata, namespace: &str) -> Result<String> {
        let username = self.authenticate(meta, Permission::Namespace)?;
        let token = self.tokens.issue_token(username, namespace)?;
        debug!(username, namespace, "issued namespace token");
        Ok(token)
    }

    /// Inserts a key-value pair into the namespace, if not present.
    pub async fn set(&self, meta: &CallMetadata, key: &str, value: String) -> Result<StatusReply> {
        let scope = self.authorize_scope(meta, Permission::Write)?;
        if !self.store.set_if_absent(&scope.composite_key(key), value).await {
            return Err(NskvError::KeyExists);
        }
        Ok(StatusReply::affected(1))
    }

    /// Updates a key-value pair in the namespace, if present.
    pub async fn update(
        &self,
        meta: &CallMetadata,
        key: &str,
        value: String,
    ) -> Result<StatusReply> {
        let scope = self.authorize_scope(meta, Permission::Write)?;
        if !self.store.replace(&scope.composite_key(key), value).await {
            return Err(NskvError::KeyMissing);
        }
        Ok(StatusReply::affected(1))
    }

    /// Checks if a key is in the namespace. Absence is a normal reply, not an error.
    pub async fn has(&self, meta: &CallMetadata, key: &str) -> Result<StatusReply> {
        let scope = self.authorize_scope(meta, Permission::Read)?;
        let found = self.store.has(&scope.composite_key(key)).await;
        Ok(StatusReply::found(usize::from(found)))
    }

    /// Removes a key from the namespace and returns the removed pair.
    pub async fn unset(&self, meta: &CallMetadata, key: &str) -> Result<KeyValuePair> {
        let scope = self.authorize_scope(meta, Permission::Write)?;
        let value = self
            .store
            .pop(&scope.composite_key(key))
            .await
            .ok_or(NskvError::KeyMissing)?;
        Ok(KeyValuePair::new(key, value))
    }

    /// Retrieves the value stored under `key` in the namespace.
    pub async fn get(&self, meta: &CallMetadata, key: &str) -> Result<KeyValuePair> {
        let scope = self.authorize_scope(meta, Permission::Read)?;
        let value = self
            .store
            .get(&scope.composite_key(key))
            .await
            .ok_or(NskvError::KeyMissing)?;
        Ok(KeyValuePair::new(key, value))
    }

    /// Number of pairs in the namespace.
    pub async fn count(&self, meta: &CallMetadata) -> Result<usize> {
        Ok(self.show_data(meta).await?.len())
    }

    /// Raw keys of the namespace, sorted.
    pub async fn show_keys(&self, meta: &CallMetadata) -> Result<Vec<String>> {
        Ok(self
            .show_data(meta)
            .await?
            .into_iter()
            .map(|pair| pair.key)
            .collect())
    }

    /// Raw key-value pairs of the namespace, sorted by key.
    pub async fn show_data(&self, meta: &CallMetadata) -> Result<Vec<KeyValuePair>> {
        let scope = self.authorize_scope(meta, Permission::Read)?;
        let entries = self.store.scan_prefix(&scope.prefix()).await;
        Ok(entries
            .into_iter()
            .filter_map(|(composite, value)| {
                scope
                    .strip(&composite)
                    .map(|raw| KeyValuePair::new(raw, value))
            })
            .collect())
    }

    /// Namespaces in which the caller has at least one entry. Needs no token.
    pub async fn show_namespaces(&self, meta: &CallMetadata) -> Result<Vec<String>> {
        let username = self.authenticate(meta, Permission::Read)?;
        let prefix = user_prefix(username);
        let namespaces: BTreeSet<String> = self
            .store
            .scan_prefix(&prefix)
            .await
            .into_iter()
            .filter_map(|(composite, _)| {
                composite[prefix.len()..]
                    .split_once(KEY_SEPARATOR)
                    .map(|(ns, _)| ns.to_string())
            })
            .collect();
        Ok(namespaces.into_iter().collect())
    }
}
