//! Permission resolver over the role/authorization graph.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, error, warn};

use nousquest_core::error::AppError;
use nousquest_core::result::AppResult;
use nousquest_core::types::{OrgId, UserId};
use nousquest_database::store::PermissionGraphStore;
use nousquest_entity::rbac::Permission;

use crate::jwt::Claims;
use crate::session::SessionContext;

/// `{resource: {action: true}}` for every granted action.
pub type AuthorizationMap = BTreeMap<String, BTreeMap<String, bool>>;

/// Answers "may this user do that" questions.
#[derive(Debug, Clone)]
pub struct PermissionResolver {
    store: Arc<dyn PermissionGraphStore>,
    trust_token_claims: bool,
}

impl PermissionResolver {
    /// Creates a resolver. With `trust_token_claims` set, session checks are
    /// answered from the token snapshot.
    pub fn new(store: Arc<dyn PermissionGraphStore>, trust_token_claims: bool) -> Self {
        Self {
            store,
            trust_token_claims,
        }
    }

    /// Authoritative check against the store.
    pub async fn authorize(
        &self,
        user_id: UserId,
        org_id: OrgId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool> {
        let allowed = self
            .store
            .has_authorization(user_id, org_id, resource, action)
            .await?;
        debug!(
            user_id = %user_id,
            org_id = %org_id,
            resource,
            action,
            allowed,
            "Authorization resolved"
        );
        Ok(allowed)
    }

    /// Check from an access-token snapshot.
    ///
    /// The claims must belong to exactly `(user_id, org_id)`; any mismatch
    /// is treated as tampering or a routing bug and denied.
    pub fn authorize_with_claims(
        &self,
        claims: &Claims,
        user_id: UserId,
        org_id: OrgId,
        resource: &str,
        action: &str,
    ) -> bool {
        if claims.sub != user_id || claims.org_id != org_id {
            error!(
                target: "security",
                token_user = %claims.sub,
                token_org = %claims.org_id,
                user_id = %user_id,
                org_id = %org_id,
                "Token identity does not match requested principal"
            );
            return false;
        }
        claims.grants(resource, action)
    }

    /// Check for the session's principal, via the snapshot when trusted
    /// and the store otherwise.
    pub async fn authorize_session(
        &self,
        session: &SessionContext,
        resource: &str,
        action: &str,
    ) -> AppResult<bool> {
        if self.trust_token_claims {
            return Ok(session.claims_grant(resource, action));
        }
        self.authorize(session.user_id(), session.org_id(), resource, action)
            .await
    }

    /// Like [`authorize_session`](Self::authorize_session), but a denial is
    /// an [`AppError::authorization`].
    pub async fn require(
        &self,
        session: &SessionContext,
        resource: &str,
        action: &str,
    ) -> AppResult<()> {
        if self.authorize_session(session, resource, action).await? {
            return Ok(());
        }
        warn!(
            target: "security",
            user_id = %session.user_id(),
            org_id = %session.org_id(),
            resource,
            action,
            "Permission denied"
        );
        Err(AppError::authorization(format!(
            "Missing permission {resource}:{action}"
        )))
    }

    /// Every permission the user holds.
    pub async fn permissions(&self, user_id: UserId, org_id: OrgId) -> AppResult<Vec<Permission>> {
        self.store.list_permissions(user_id, org_id).await
    }

    /// Role names the user holds.
    pub async fn roles(&self, user_id: UserId, org_id: OrgId) -> AppResult<Vec<String>> {
        self.store.list_role_names(user_id, org_id).await
    }

    /// Bulk view of the user's grants, keyed by resource.
    ///
    /// Every resource in scope appears, with an empty map when nothing is
    /// granted on it. `filter` narrows the scope to the named resources;
    /// names outside the vocabulary are dropped.
    pub async fn authorization_map(
        &self,
        user_id: UserId,
        org_id: OrgId,
        filter: Option<&[String]>,
    ) -> AppResult<AuthorizationMap> {
        let vocabulary = self.store.list_resource_names().await?;
        let mut map: AuthorizationMap = vocabulary
            .into_iter()
            .filter(|name| filter.is_none_or(|wanted| wanted.contains(name)))
            .map(|name| (name, BTreeMap::new()))
            .collect();

        for permission in self.store.list_permissions(user_id, org_id).await? {
            if let Some(actions) = map.get_mut(&permission.resource) {
                actions.insert(permission.action, true);
            }
        }
        Ok(map)
    }
}
