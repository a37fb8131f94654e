//! Storage traits consumed by the auth layer.
//!
//! Every user-scoped method takes the `(user_id, org_id)` pair; there is no
//! lookup by user id alone.

use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use nousquest_core::result::AppResult;
use nousquest_core::types::{OrgId, UserId};
use nousquest_entity::rbac::Permission;
use nousquest_entity::user::User;

/// Result of recording one failed login attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailedAttempt {
    /// Counter incremented; the account is still open.
    Counted {
        /// Counter value after the increment.
        attempts: i32,
    },
    /// This increment crossed the threshold and locked the account.
    Locked {
        /// Counter value after the increment.
        attempts: i32,
    },
    /// The account was already locked; nothing changed.
    AlreadyLocked,
}

impl FailedAttempt {
    /// Whether the account is locked after this attempt.
    pub fn is_locked(self) -> bool {
        !matches!(self, Self::Counted { .. })
    }
}

/// Reads and mutates credential and lockout state.
///
/// The counter update in [`record_failed_attempt`](Self::record_failed_attempt)
/// must be a single atomic read-modify-write so concurrent failures are
/// never under-counted.
#[async_trait]
pub trait CredentialStore: Send + Sync + fmt::Debug + 'static {
    /// Find a user by exact, case-sensitive identifier (email).
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>>;

    /// Find a user by tenant-qualified key.
    async fn find_by_id(&self, user_id: UserId, org_id: OrgId) -> AppResult<Option<User>>;

    /// Increment the failed-attempt counter, locking the account when the
    /// new value exceeds `max_failed_attempts`.
    async fn record_failed_attempt(
        &self,
        user_id: UserId,
        org_id: OrgId,
        max_failed_attempts: u32,
    ) -> AppResult<FailedAttempt>;

    /// Reset the counter and stamp the login time. Returns `false` without
    /// changing anything if the account became locked concurrently.
    async fn record_successful_login(
        &self,
        user_id: UserId,
        org_id: OrgId,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Administrative unlock: clear the flag and reset the counter.
    /// Returns `false` if the user does not exist.
    async fn clear_lockout(&self, user_id: UserId, org_id: OrgId) -> AppResult<bool>;

    /// All locked accounts, across tenants, ordered by email.
    async fn list_locked(&self) -> AppResult<Vec<User>>;

    /// Check backend connectivity.
    async fn health_check(&self) -> AppResult<bool>;
}

/// Read-only view of the role/authorization graph.
#[async_trait]
pub trait PermissionGraphStore: Send + Sync + fmt::Debug + 'static {
    /// Whether the user holds `action` on `resource` through any role,
    /// with every edge of the path owned by `org_id`.
    async fn has_authorization(
        &self,
        user_id: UserId,
        org_id: OrgId,
        resource: &str,
        action: &str,
    ) -> AppResult<bool>;

    /// Every distinct permission the user holds, ordered by resource then action.
    async fn list_permissions(&self, user_id: UserId, org_id: OrgId) -> AppResult<Vec<Permission>>;

    /// Names of the roles the user holds, ordered.
    async fn list_role_names(&self, user_id: UserId, org_id: OrgId) -> AppResult<Vec<String>>;

    /// The global resource vocabulary, ordered by name.
    async fn list_resource_names(&self) -> AppResult<Vec<String>>;
}
