//! JWT claims structure used in access and refresh tokens.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use nousquest_core::types::{OrgId, TokenId, UserId};
use nousquest_entity::rbac::Permission;

/// JWT claims payload.
///
/// Access tokens carry a snapshot of the user's roles and permissions taken
/// at issuance; refresh tokens carry identity only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user ID.
    pub sub: UserId,
    /// Tenant the subject belongs to.
    pub org_id: OrgId,
    /// Issued-at timestamp (seconds since epoch).
    pub iat: i64,
    /// Expiration timestamp (seconds since epoch).
    pub exp: i64,
    /// Token identifier, used for revocation.
    pub jti: TokenId,
    /// Token type: "access" or "refresh".
    pub token_type: TokenType,
    /// Role names at issuance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub roles: Vec<String>,
    /// Permissions at issuance.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<Permission>,
}

/// Distinguishes access tokens from refresh tokens.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum TokenType {
    /// Short-lived token presented on every request.
    Access,
    /// Long-lived token only accepted for minting new access tokens.
    Refresh,
}

impl Claims {
    /// Returns the user ID from the subject claim.
    pub fn user_id(&self) -> UserId {
        self.sub
    }

    /// Returns the expiration as a `DateTime<Utc>`.
    pub fn expires_at(&self) -> DateTime<Utc> {
        DateTime::from_timestamp(self.exp, 0).unwrap_or(DateTime::<Utc>::MIN_UTC)
    }

    /// Lifetime left at `now`; negative once expired.
    pub fn remaining_at(&self, now: DateTime<Utc>) -> Duration {
        Duration::seconds(self.exp - now.timestamp())
    }

    /// Whether the embedded snapshot grants `action` on `resource`.
    pub fn grants(&self, resource: &str, action: &str) -> bool {
        self.permissions.iter().any(|p| p.matches(resource, action))
    }
}
