//! Guard clauses run at the top of every handler.
use super::KvService;
use crate::credentials::PERM_ALL;
use crate::token::NamespaceScope;
use crate::types::{CallMetadata, Permission};
use crate::{NskvError, Result};
use tracing::debug;

impl KvService {
    /// Checks the username/password pair and, when enforcement is on, `perm`.
    /// Returns the authenticated username.
    pub(super) fn authenticate<'m>(
        &self,
        meta: &'m CallMetadata,
        perm: Permission,
    ) -> Result<&'m str> {
        let (username, password) = match (meta.username.as_deref(), meta.password.as_deref()) {
            (Some(u), Some(p)) => (u, p),
            _ => return Err(NskvError::MissingCredentialMetadata),
        };

        if !self.credentials.check(username, password) {
            debug!(username, "rejected credentials");
            return Err(NskvError::AccessDenied(
                "invalid username or password".to_string(),
            ));
        }

        if self.config.enforce_permissions
            && !self.credentials.has_perm(username, PERM_ALL)
            && !self.credentials.has_perm(username, perm.as_str())
        {
            debug!(username, perm = perm.as_str(), "missing permission");
            return Err(NskvError::AccessDenied(format!(
                "missing '{}' permission",
                perm.as_str()
            )));
        }

        Ok(username)
    }

    /// Authenticates, then verifies the call's namespace token.
    ///
    /// A token is only honoured for the user it was issued to.
    pub(super) fn authorize_scope(
        &self,
        meta: &CallMetadata,
        perm: Permission,
    ) -> Result<NamespaceScope> {
        let username = self.authenticate(meta, perm)?;
        let scope = self.tokens.verify_token(meta.token.as_deref())?;
        if scope.username() != username {
            debug!(username, token_user = scope.username(), "token presented by another user");
            return Err(NskvError::AccessDenied(
                "token was issued to another user".to_string(),
            ));
        }
        Ok(scope)
    }
}
