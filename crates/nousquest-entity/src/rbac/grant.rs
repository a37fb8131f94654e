//! Tenant-scoped grants and the association rows linking them.

use nousquest_core::types::{ActionId, AuthorizationId, OrgId, ResourceId, RoleId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A `(resource, action)` pair granted within one organization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Authorization {
    /// Authorization identifier, unique within the organization.
    pub id: AuthorizationId,
    /// Owning organization.
    pub org_id: OrgId,
    /// Granted resource.
    pub resource_id: ResourceId,
    /// Granted action.
    pub action_id: ActionId,
}

impl Authorization {
    /// Build a new authorization row.
    pub fn new(org_id: OrgId, resource_id: ResourceId, action_id: ActionId) -> Self {
        Self {
            id: AuthorizationId::new(),
            org_id,
            resource_id,
            action_id,
        }
    }
}

/// Membership of a user in a role. Both ends must share `org_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct UserSecurityRole {
    /// Organization of both the user and the role.
    pub org_id: OrgId,
    /// Member user.
    pub user_id: UserId,
    /// Role held.
    pub security_role_id: RoleId,
}

/// Assignment of an authorization to a role. Both ends must share `org_id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, FromRow)]
pub struct SecurityRoleAuthorization {
    /// Organization of both the role and the authorization.
    pub org_id: OrgId,
    /// Role receiving the grant.
    pub security_role_id: RoleId,
    /// Granted authorization.
    pub authorization_id: AuthorizationId,
}
