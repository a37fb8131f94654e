//! Mints signed access and refresh tokens.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use nousquest_core::result::AppResult;
use nousquest_core::types::{OrgId, TokenId, UserId};

use crate::jwt::{Claims, JwtEncoder, TokenType};
use crate::rbac::PermissionResolver;

/// A signed token and the facts a caller needs to place it in a cookie.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    /// Compact JWS string.
    pub token: String,
    /// The token's `jti`.
    pub token_id: TokenId,
    /// Expiry instant.
    pub expires_at: DateTime<Utc>,
    /// Lifetime from issuance.
    pub lifetime: Duration,
}

/// Access and refresh tokens minted together.
#[derive(Debug, Clone)]
pub struct TokenPair {
    /// Short-lived token carrying the permission snapshot.
    pub access: IssuedToken,
    /// Long-lived token accepted only for refresh.
    pub refresh: IssuedToken,
}

/// Builds claims and signs them.
#[derive(Debug, Clone)]
pub struct TokenIssuer {
    encoder: JwtEncoder,
    resolver: Arc<PermissionResolver>,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl TokenIssuer {
    /// Creates an issuer with the configured lifetimes.
    pub fn new(
        encoder: JwtEncoder,
        resolver: Arc<PermissionResolver>,
        access_ttl: Duration,
        refresh_ttl: Duration,
    ) -> Self {
        Self {
            encoder,
            resolver,
            access_ttl,
            refresh_ttl,
        }
    }

    /// Configured access lifetime.
    pub fn access_ttl(&self) -> Duration {
        self.access_ttl
    }

    /// Issue a fresh pair.
    ///
    /// `access_ttl` overrides the configured access lifetime. Either way
    /// the access token never outlives the refresh token minted with it.
    pub async fn issue(
        &self,
        org_id: OrgId,
        user_id: UserId,
        access_ttl: Option<Duration>,
    ) -> AppResult<TokenPair> {
        let now = Utc::now();
        let access_ttl = access_ttl.unwrap_or(self.access_ttl).min(self.refresh_ttl);

        let access = self
            .sign_access(org_id, user_id, now, now + access_ttl)
            .await?;
        let refresh = self.sign(
            Claims {
                sub: user_id,
                org_id,
                iat: now.timestamp(),
                exp: (now + self.refresh_ttl).timestamp(),
                jti: TokenId::new(),
                token_type: TokenType::Refresh,
                roles: Vec::new(),
                permissions: Vec::new(),
            },
            self.refresh_ttl,
        )?;

        debug!(user_id = %user_id, org_id = %org_id, "Issued token pair");
        Ok(TokenPair { access, refresh })
    }

    /// Issue a single access token valid from `issued_at` until
    /// `not_after`.
    ///
    /// Both instants are fixed by the caller, so an expiry computed against
    /// another token cannot drift while roles and permissions are loaded.
    pub async fn issue_access(
        &self,
        org_id: OrgId,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        not_after: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        self.sign_access(org_id, user_id, issued_at, not_after).await
    }

    async fn sign_access(
        &self,
        org_id: OrgId,
        user_id: UserId,
        issued_at: DateTime<Utc>,
        not_after: DateTime<Utc>,
    ) -> AppResult<IssuedToken> {
        let roles = self.resolver.roles(user_id, org_id).await?;
        let permissions = self.resolver.permissions(user_id, org_id).await?;

        self.sign(
            Claims {
                sub: user_id,
                org_id,
                iat: issued_at.timestamp(),
                exp: not_after.timestamp(),
                jti: TokenId::new(),
                token_type: TokenType::Access,
                roles,
                permissions,
            },
            not_after - issued_at,
        )
    }

    fn sign(&self, claims: Claims, lifetime: Duration) -> AppResult<IssuedToken> {
        let token = self.encoder.encode(&claims)?;
        Ok(IssuedToken {
            token,
            token_id: claims.jti,
            expires_at: claims.expires_at(),
            lifetime,
        })
    }
}
