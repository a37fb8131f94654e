//! Authenticated principal for one request.

use chrono::{DateTime, Utc};

use nousquest_core::error::AppError;
use nousquest_core::result::AppResult;
use nousquest_core::types::{OrgId, TokenId, UserId};
use nousquest_entity::rbac::Permission;

use crate::jwt::{Claims, JwtDecoder};

/// Immutable view of the verified access token behind a request.
///
/// Built once per request and passed by reference to whatever needs it.
/// There is no way to construct one except from verified claims.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    user_id: UserId,
    org_id: OrgId,
    token_id: TokenId,
    expires_at: DateTime<Utc>,
    roles: Vec<String>,
    permissions: Vec<Permission>,
}

impl SessionContext {
    fn from_claims(claims: Claims) -> Self {
        Self {
            user_id: claims.sub,
            org_id: claims.org_id,
            token_id: claims.jti,
            expires_at: claims.expires_at(),
            roles: claims.roles,
            permissions: claims.permissions,
        }
    }

    /// Authenticated user.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    /// Tenant of the authenticated user.
    pub fn org_id(&self) -> OrgId {
        self.org_id
    }

    /// `jti` of the access token.
    pub fn token_id(&self) -> TokenId {
        self.token_id
    }

    /// Access token expiry.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    /// Role names captured at issuance.
    pub fn roles(&self) -> &[String] {
        &self.roles
    }

    /// Permissions captured at issuance.
    pub fn permissions(&self) -> &[Permission] {
        &self.permissions
    }

    /// Whether the issuance-time snapshot grants `action` on `resource`.
    pub fn claims_grant(&self, resource: &str, action: &str) -> bool {
        self.permissions.iter().any(|p| p.matches(resource, action))
    }
}

/// Verify an access token and build the session for it.
pub async fn authenticate(decoder: &JwtDecoder, token: Option<&str>) -> AppResult<SessionContext> {
    let token = token
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::authentication("Authentication required"))?;
    let claims = decoder.decode_access(token).await?;
    Ok(SessionContext::from_claims(claims))
}
