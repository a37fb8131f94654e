//! Security role model.

use chrono::{DateTime, Utc};
use nousquest_core::types::{OrgId, RoleId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A named bundle of authorizations, unique by name within its tenant.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct SecurityRole {
    /// Role identifier, unique within the organization.
    pub id: RoleId,
    /// Owning organization.
    pub org_id: OrgId,
    /// Role name, e.g. `"student"`.
    pub name: String,
    /// Free-text description.
    pub description: Option<String>,
    /// When the role was created.
    pub created_at: DateTime<Utc>,
}

impl SecurityRole {
    /// Build a new role row.
    pub fn new(org_id: OrgId, name: impl Into<String>) -> Self {
        Self {
            id: RoleId::new(),
            org_id,
            name: name.into(),
            description: None,
            created_at: Utc::now(),
        }
    }
}
