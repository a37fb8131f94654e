//! Response DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use nousquest_core::types::{OrgId, UserId};
use nousquest_entity::user::UserSummary;

/// Body of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginData {
    /// The authenticated user.
    pub user: UserSummary,
}

/// The principal behind the current session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionData {
    /// Authenticated user.
    pub user_id: UserId,
    /// Tenant.
    pub org_id: OrgId,
}

/// Result of a single permission check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PermissionCheckData {
    /// Resource name.
    pub resource: String,
    /// Action name.
    pub action: String,
    /// Always `true`; denials are answered with 403.
    pub allowed: bool,
}

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthData {
    /// `ok` or `degraded`.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// `connected` or `unavailable`.
    pub store: String,
}

/// Expiry of a rotated token pair.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshData {
    /// When the new access token expires.
    pub access_expires_at: DateTime<Utc>,
    /// When the new refresh token expires.
    pub refresh_expires_at: DateTime<Utc>,
}
