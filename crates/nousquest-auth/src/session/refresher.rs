//! Silent access-token refresh and explicit token rotation.

use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tracing::{debug, info, warn};

use nousquest_core::error::AppError;
use nousquest_core::result::AppResult;
use nousquest_database::store::CredentialStore;

use crate::jwt::{Claims, JwtDecoder};
use crate::token::{IssuedToken, TokenIssuer, TokenPair};

/// Why a near-expiry request was not refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// No refresh token accompanied the request.
    MissingRefreshToken,
    /// The refresh token failed verification (expired, revoked, forged).
    InvalidRefreshToken,
    /// Access and refresh tokens name different principals.
    SubjectMismatch,
    /// The refresh token has no lifetime left to lend.
    RefreshExhausted,
    /// The user is gone or locked.
    PrincipalUnavailable,
    /// Minting failed; the error was logged.
    IssueFailed,
}

/// What the refresh step decided for one request.
#[derive(Debug, Clone)]
pub enum RefreshDecision {
    /// Access token missing, invalid, or not yet near expiry.
    NotNeeded,
    /// Near expiry, but no new token could be minted.
    Skipped(SkipReason),
    /// A new access token to hand back to the client.
    Refreshed(IssuedToken),
}

/// Expiry for a refreshed access token: the configured lifetime from
/// `now`, but never past the refresh token backing it.
pub fn clamp_access_expiry(
    now: DateTime<Utc>,
    access_ttl: Duration,
    refresh_expires_at: DateTime<Utc>,
) -> DateTime<Utc> {
    (now + access_ttl).min(refresh_expires_at)
}

/// Extends sessions that are close to expiry and rotates token pairs.
#[derive(Debug, Clone)]
pub struct SessionRefresher {
    decoder: Arc<JwtDecoder>,
    issuer: Arc<TokenIssuer>,
    credentials: Arc<dyn CredentialStore>,
    threshold: Duration,
}

impl SessionRefresher {
    /// Creates a refresher that acts once the access token's remaining
    /// lifetime is at or below `threshold`.
    pub fn new(
        decoder: Arc<JwtDecoder>,
        issuer: Arc<TokenIssuer>,
        credentials: Arc<dyn CredentialStore>,
        threshold: Duration,
    ) -> Self {
        Self {
            decoder,
            issuer,
            credentials,
            threshold,
        }
    }

    /// Decide whether this request should receive a new access token.
    ///
    /// Never fails: every problem degrades to "no refresh this round", and
    /// the request carries on with whatever tokens it already has.
    pub async fn evaluate(&self, access_token: &str, refresh_token: Option<&str>) -> RefreshDecision {
        let Ok(access) = self.decoder.decode_access(access_token).await else {
            return RefreshDecision::NotNeeded;
        };

        let now = Utc::now();
        if access.remaining_at(now) > self.threshold {
            return RefreshDecision::NotNeeded;
        }

        let Some(refresh_token) = refresh_token.filter(|t| !t.is_empty()) else {
            debug!(user_id = %access.sub, "Access token near expiry without refresh token");
            return RefreshDecision::Skipped(SkipReason::MissingRefreshToken);
        };

        let refresh = match self.decoder.decode_refresh(refresh_token).await {
            Ok(claims) => claims,
            Err(e) => {
                debug!(user_id = %access.sub, error = %e, "Refresh token rejected");
                return RefreshDecision::Skipped(SkipReason::InvalidRefreshToken);
            }
        };

        if refresh.sub != access.sub || refresh.org_id != access.org_id {
            warn!(
                target: "security",
                access_user = %access.sub,
                access_org = %access.org_id,
                refresh_user = %refresh.sub,
                refresh_org = %refresh.org_id,
                "Access and refresh tokens belong to different principals"
            );
            return RefreshDecision::Skipped(SkipReason::SubjectMismatch);
        }

        if refresh.remaining_at(now) <= Duration::zero() {
            return RefreshDecision::Skipped(SkipReason::RefreshExhausted);
        }

        match self.principal_active(&refresh).await {
            Ok(true) => {}
            Ok(false) => return RefreshDecision::Skipped(SkipReason::PrincipalUnavailable),
            Err(e) => {
                warn!(user_id = %refresh.sub, error = %e, "Could not load user for refresh");
                return RefreshDecision::Skipped(SkipReason::IssueFailed);
            }
        }

        let not_after = clamp_access_expiry(now, self.issuer.access_ttl(), refresh.expires_at());
        match self
            .issuer
            .issue_access(access.org_id, access.sub, now, not_after)
            .await
        {
            Ok(token) => {
                info!(
                    user_id = %access.sub,
                    org_id = %access.org_id,
                    ttl_secs = token.lifetime.num_seconds(),
                    "Access token silently refreshed"
                );
                RefreshDecision::Refreshed(token)
            }
            Err(e) => {
                warn!(user_id = %access.sub, error = %e, "Silent refresh failed");
                RefreshDecision::Skipped(SkipReason::IssueFailed)
            }
        }
    }

    /// Exchange a refresh token for a new pair, revoking the old one.
    pub async fn rotate(&self, refresh_token: &str) -> AppResult<TokenPair> {
        let refresh = self.decoder.decode_refresh(refresh_token).await?;

        if !self.principal_active(&refresh).await? {
            warn!(
                target: "security",
                user_id = %refresh.sub,
                org_id = %refresh.org_id,
                "Refresh refused for missing or locked account"
            );
            return Err(AppError::authentication("Invalid refresh token"));
        }

        let pair = self.issuer.issue(refresh.org_id, refresh.sub, None).await?;
        self.decoder.revoke(refresh.jti, refresh.expires_at()).await;

        info!(
            target: "security",
            user_id = %refresh.sub,
            org_id = %refresh.org_id,
            "Token pair rotated"
        );
        Ok(pair)
    }

    async fn principal_active(&self, claims: &Claims) -> AppResult<bool> {
        let user = self
            .credentials
            .find_by_id(claims.sub, claims.org_id)
            .await?;
        Ok(user.is_some_and(|u| !u.is_locked()))
    }
}
