//! Organization entity model.

use chrono::{DateTime, Utc};
use nousquest_core::types::OrgId;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A tenant. Every user, role, and authorization belongs to exactly one.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Organization {
    /// Unique organization identifier.
    pub id: OrgId,
    /// Display name. Not used for isolation; two tenants may look alike.
    pub name: String,
    /// IANA timezone name.
    pub timezone: String,
    /// Free-text description.
    pub description: Option<String>,
    /// When the organization was created.
    pub created_at: DateTime<Utc>,
}

impl Organization {
    /// Build a new organization row.
    pub fn new(name: impl Into<String>, timezone: impl Into<String>) -> Self {
        Self {
            id: OrgId::new(),
            name: name.into(),
            timezone: timezone.into(),
            description: None,
            created_at: Utc::now(),
        }
    }
}
