//! In-process store implementing both storage traits.
//!
//! Suitable for tests and single-node development (`database.url =
//! "memory://"`). All mutations happen under one write lock, so counter
//! updates are atomic.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use tracing::debug;

use nousquest_core::error::AppError;
use nousquest_core::result::AppResult;
use nousquest_core::types::{ActionId, AuthorizationId, OrgId, ResourceId, RoleId, UserId};
use nousquest_entity::organization::Organization;
use nousquest_entity::rbac::{
    Action, Authorization, Permission, Resource, SecurityRole, SecurityRoleAuthorization,
    UserSecurityRole,
};
use nousquest_entity::user::{CreateUser, User};

use crate::store::{CredentialStore, FailedAttempt, PermissionGraphStore};

/// Table contents, keyed the same way as the relational schema.
#[derive(Debug, Default)]
struct InnerState {
    organizations: HashMap<OrgId, Organization>,
    users: HashMap<(UserId, OrgId), User>,
    roles: HashMap<(RoleId, OrgId), SecurityRole>,
    resources: HashMap<ResourceId, Resource>,
    actions: HashMap<ActionId, Action>,
    authorizations: HashMap<(AuthorizationId, OrgId), Authorization>,
    user_roles: HashSet<UserSecurityRole>,
    role_authorizations: HashSet<SecurityRoleAuthorization>,
}

impl InnerState {
    /// Walk the grant graph for one user, pinning every edge to `org_id`.
    fn permissions_of(&self, user_id: UserId, org_id: OrgId) -> BTreeSet<Permission> {
        let mut out = BTreeSet::new();
        if !self.users.contains_key(&(user_id, org_id)) {
            return out;
        }

        for membership in self
            .user_roles
            .iter()
            .filter(|m| m.user_id == user_id && m.org_id == org_id)
        {
            let Some(role) = self.roles.get(&(membership.security_role_id, org_id)) else {
                continue;
            };
            for assignment in self
                .role_authorizations
                .iter()
                .filter(|a| a.security_role_id == role.id && a.org_id == org_id)
            {
                let Some(grant) = self.authorizations.get(&(assignment.authorization_id, org_id))
                else {
                    continue;
                };
                let resource = self.resources.get(&grant.resource_id);
                let action = self.actions.get(&grant.action_id);
                if let (Some(resource), Some(action)) = (resource, action) {
                    out.insert(Permission::new(&resource.name, &action.name));
                }
            }
        }
        out
    }

    fn find_user_by_email(&self, email: &str) -> Option<&User> {
        self.users.values().find(|u| u.email == email)
    }
}

/// Thread-safe in-memory store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<RwLock<InnerState>>,
}

impl MemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an organization.
    pub async fn insert_organization(&self, organization: Organization) -> AppResult<()> {
        let mut state = self.state.write().await;
        if state.organizations.contains_key(&organization.id) {
            return Err(AppError::validation("Organization already exists"));
        }
        state.organizations.insert(organization.id, organization);
        Ok(())
    }

    /// Insert a user. Email is unique across all tenants.
    pub async fn insert_user(&self, data: CreateUser) -> AppResult<User> {
        let mut state = self.state.write().await;
        if !state.organizations.contains_key(&data.org_id) {
            return Err(AppError::not_found("Organization not found"));
        }
        if state.find_user_by_email(&data.email).is_some() {
            return Err(AppError::validation("Email already registered"));
        }
        let user = data.into_user();
        state.users.insert((user.id, user.org_id), user.clone());
        Ok(user)
    }

    /// Insert a role. Names are unique within an organization.
    pub async fn insert_role(&self, org_id: OrgId, name: &str) -> AppResult<SecurityRole> {
        let mut state = self.state.write().await;
        if !state.organizations.contains_key(&org_id) {
            return Err(AppError::not_found("Organization not found"));
        }
        if state
            .roles
            .values()
            .any(|r| r.org_id == org_id && r.name == name)
        {
            return Err(AppError::validation("Role name already used in organization"));
        }
        let role = SecurityRole::new(org_id, name);
        state.roles.insert((role.id, org_id), role.clone());
        Ok(role)
    }

    /// Return the resource with this name, creating it if needed.
    pub async fn ensure_resource(&self, name: &str) -> Resource {
        let mut state = self.state.write().await;
        if let Some(existing) = state.resources.values().find(|r| r.name == name) {
            return existing.clone();
        }
        let resource = Resource::new(name);
        state.resources.insert(resource.id, resource.clone());
        resource
    }

    /// Return the action with this name, creating it if needed.
    pub async fn ensure_action(&self, name: &str) -> Action {
        let mut state = self.state.write().await;
        if let Some(existing) = state.actions.values().find(|a| a.name == name) {
            return existing.clone();
        }
        let action = Action::new(name);
        state.actions.insert(action.id, action.clone());
        action
    }

    /// Return the org's authorization for `(resource, action)`, creating it
    /// if needed.
    pub async fn ensure_authorization(
        &self,
        org_id: OrgId,
        resource_id: ResourceId,
        action_id: ActionId,
    ) -> AppResult<Authorization> {
        let mut state = self.state.write().await;
        if !state.organizations.contains_key(&org_id) {
            return Err(AppError::not_found("Organization not found"));
        }
        if !state.resources.contains_key(&resource_id) || !state.actions.contains_key(&action_id) {
            return Err(AppError::not_found("Resource or action not found"));
        }
        if let Some(existing) = state.authorizations.values().find(|a| {
            a.org_id == org_id && a.resource_id == resource_id && a.action_id == action_id
        }) {
            return Ok(existing.clone());
        }
        let grant = Authorization::new(org_id, resource_id, action_id);
        state.authorizations.insert((grant.id, org_id), grant.clone());
        Ok(grant)
    }

    /// Add a user to a role. Both must belong to `org_id`.
    pub async fn assign_role(&self, org_id: OrgId, user_id: UserId, role_id: RoleId) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.users.contains_key(&(user_id, org_id)) {
            return Err(AppError::not_found("User not found in organization"));
        }
        if !state.roles.contains_key(&(role_id, org_id)) {
            return Err(AppError::not_found("Role not found in organization"));
        }
        state.user_roles.insert(UserSecurityRole {
            org_id,
            user_id,
            security_role_id: role_id,
        });
        Ok(())
    }

    /// Remove a user from a role. Returns whether a membership was removed.
    pub async fn revoke_role(&self, org_id: OrgId, user_id: UserId, role_id: RoleId) -> bool {
        let mut state = self.state.write().await;
        state.user_roles.remove(&UserSecurityRole {
            org_id,
            user_id,
            security_role_id: role_id,
        })
    }

    /// Attach an authorization to a role. Both must belong to `org_id`.
    pub async fn attach_authorization(
        &self,
        org_id: OrgId,
        role_id: RoleId,
        authorization_id: AuthorizationId,
    ) -> AppResult<()> {
        let mut state = self.state.write().await;
        if !state.roles.contains_key(&(role_id, org_id)) {
            return Err(AppError::not_found("Role not found in organization"));
        }
        if !state.authorizations.contains_key(&(authorization_id, org_id)) {
            return Err(AppError::not_found("Authorization not found in organization"));
        }
        state.role_authorizations.insert(SecurityRoleAuthorization {
            org_id,
            security_role_id: role_id,
            authorization_id,
        });
        Ok(())
    }

    /// Grant `resource:action` to a role by name, creating vocabulary and
    /// the authorization row as needed.
    pub async fn grant(
        &self,
        org_id: OrgId,
        role_id: RoleId,
        resource: &str,
        action: &str,
    ) -> AppResult<()> {
        let resource = self.ensure_resource(resource).await;
        let action = self.ensure_action(action).await;
        let grant = self
            .ensure_authorization(org_id, resource.id, action.id)
            .await?;
        self.attach_authorization(org_id, role_id, grant.id).await
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.find_user_by_email(identifier).cloned())
    }

    async fn find_by_id(&self, user_id: UserId, org_id: OrgId) -> AppResult<Option<User>> {
        let state = self.state.read().await;
        Ok(state.users.get(&(user_id, org_id)).cloned())
    }

    async fn record_failed_attempt(
        &self,
        user_id: UserId,
        org_id: OrgId,
        max_failed_attempts: u32,
    ) -> AppResult<FailedAttempt> {
        let mut state = self.state.write().await;
        let user = state
            .users
            .get_mut(&(user_id, org_id))
            .ok_or_else(|| AppError::not_found("User not found"))?;

        if user.locked {
            return Ok(FailedAttempt::AlreadyLocked);
        }

        user.logon_attempt += 1;
        user.updated_at = Utc::now();
        let attempts = user.logon_attempt;
        if i64::from(attempts) > i64::from(max_failed_attempts) {
            user.locked = true;
            debug!(user_id = %user_id, attempts, "Failed-attempt threshold crossed");
            Ok(FailedAttempt::Locked { attempts })
        } else {
            Ok(FailedAttempt::Counted { attempts })
        }
    }

    async fn record_successful_login(
        &self,
        user_id: UserId,
        org_id: OrgId,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&(user_id, org_id)) {
            Some(user) if !user.locked => {
                user.logon_attempt = 0;
                user.last_logon = Some(at);
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn clear_lockout(&self, user_id: UserId, org_id: OrgId) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.users.get_mut(&(user_id, org_id)) {
            Some(user) => {
                user.locked = false;
                user.logon_attempt = 0;
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_locked(&self) -> AppResult<Vec<User>> {
        let state = self.state.read().await;
        let mut locked: Vec<User> = state.users.values().filter(|u| u.locked).cloned().collect();
        locked.sort_by(|a, b| a.email.cmp(&b.email));
        Ok(locked)
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(true)
    }
}

#[async_trait]
impl PermissionGraphStore for MemoryStore {
    async fn has_authorization(
        &self,
        user_id: UserId,
        org_id: OrgId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool> {
        let state = self.state.read().await;
        Ok(state
            .permissions_of(user_id, org_id)
            .iter()
            .any(|p| p.matches(resource, action)))
    }

    async fn list_permissions(&self, user_id: UserId, org_id: OrgId) -> AppResult<Vec<Permission>> {
        let state = self.state.read().await;
        Ok(state.permissions_of(user_id, org_id).into_iter().collect())
    }

    async fn list_role_names(&self, user_id: UserId, org_id: OrgId) -> AppResult<Vec<String>> {
        let state = self.state.read().await;
        let names: BTreeSet<String> = state
            .user_roles
            .iter()
            .filter(|m| m.user_id == user_id && m.org_id == org_id)
            .filter_map(|m| state.roles.get(&(m.security_role_id, org_id)))
            .map(|r| r.name.clone())
            .collect();
        Ok(names.into_iter().collect())
    }

    async fn list_resource_names(&self) -> AppResult<Vec<String>> {
        let state = self.state.read().await;
        let names: BTreeSet<String> = state.resources.values().map(|r| r.name.clone()).collect();
        Ok(names.into_iter().collect())
    }
}
