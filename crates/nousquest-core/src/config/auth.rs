//! Authentication configuration.

use std::fmt;

use chrono::Duration;
use serde::{Deserialize, Serialize};

use crate::error::AppError;

const DEVELOPMENT_SECRET: &str = "CHANGE_ME_IN_PRODUCTION";

/// Upper bound on the refresh lifetime; expiry instants must stay
/// representable.
const MAX_REFRESH_TTL_DAYS: u64 = 3650;

/// Credential, token, and lockout configuration.
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Access token TTL in minutes.
    #[serde(default = "default_access_ttl")]
    pub access_ttl_minutes: u64,
    /// Refresh token TTL in days.
    #[serde(default = "default_refresh_ttl")]
    pub refresh_ttl_days: u64,
    /// Remaining access lifetime (minutes) at or below which a request
    /// triggers a silent refresh. Defaults to the access TTL.
    #[serde(default)]
    pub refresh_threshold_minutes: Option<u64>,
    /// Failed attempts tolerated before the account locks. The account
    /// locks when the post-increment counter exceeds this value.
    #[serde(default = "default_max_failed")]
    pub max_failed_attempts: u32,
    /// Deny-list both tokens of a session on logout.
    #[serde(default = "default_true")]
    pub revoke_on_logout: bool,
    /// Answer permission checks from the token snapshot instead of the
    /// store. Faster, but grants revoked after issuance stay visible until
    /// the access token expires.
    #[serde(default)]
    pub trust_token_claims: bool,
}

impl AuthConfig {
    /// Configured access token lifetime. Zero if out of range, which
    /// [`validate`](Self::validate) rejects.
    pub fn access_ttl(&self) -> Duration {
        minutes(self.access_ttl_minutes).unwrap_or_else(Duration::zero)
    }

    /// Configured refresh token lifetime. Zero if out of range, which
    /// [`validate`](Self::validate) rejects.
    pub fn refresh_ttl(&self) -> Duration {
        i64::try_from(self.refresh_ttl_days)
            .ok()
            .and_then(Duration::try_days)
            .unwrap_or_else(Duration::zero)
    }

    /// Remaining-lifetime threshold for silent refresh.
    pub fn refresh_threshold(&self) -> Duration {
        self.refresh_threshold_minutes
            .and_then(minutes)
            .unwrap_or_else(|| self.access_ttl())
    }

    /// Validate secrets and lifetimes.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.jwt_secret.trim().is_empty() {
            return Err(AppError::configuration("auth.jwt_secret must not be empty"));
        }
        if self.jwt_secret == DEVELOPMENT_SECRET {
            tracing::warn!("auth.jwt_secret is the development default; set NOUSQUEST__AUTH__JWT_SECRET");
        }
        if self.access_ttl_minutes == 0 || self.refresh_ttl_days == 0 {
            return Err(AppError::configuration("token lifetimes must be positive"));
        }
        if self.refresh_ttl_days > MAX_REFRESH_TTL_DAYS {
            return Err(AppError::configuration(format!(
                "auth.refresh_ttl_days must not exceed {MAX_REFRESH_TTL_DAYS}"
            )));
        }
        if minutes(self.access_ttl_minutes).is_none() {
            return Err(AppError::configuration("auth.access_ttl_minutes is out of range"));
        }
        if self.refresh_threshold_minutes.is_some_and(|m| minutes(m).is_none()) {
            return Err(AppError::configuration(
                "auth.refresh_threshold_minutes is out of range",
            ));
        }
        if self.access_ttl() > self.refresh_ttl() {
            return Err(AppError::configuration(
                "access token lifetime must not exceed refresh token lifetime",
            ));
        }
        if self.max_failed_attempts == 0 || i32::try_from(self.max_failed_attempts).is_err() {
            return Err(AppError::configuration(format!(
                "auth.max_failed_attempts must be between 1 and {}",
                i32::MAX
            )));
        }
        Ok(())
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            access_ttl_minutes: default_access_ttl(),
            refresh_ttl_days: default_refresh_ttl(),
            refresh_threshold_minutes: None,
            max_failed_attempts: default_max_failed(),
            revoke_on_logout: true,
            trust_token_claims: false,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("access_ttl_minutes", &self.access_ttl_minutes)
            .field("refresh_ttl_days", &self.refresh_ttl_days)
            .field("refresh_threshold_minutes", &self.refresh_threshold_minutes)
            .field("max_failed_attempts", &self.max_failed_attempts)
            .field("revoke_on_logout", &self.revoke_on_logout)
            .field("trust_token_claims", &self.trust_token_claims)
            .finish()
    }
}

fn minutes(value: u64) -> Option<Duration> {
    i64::try_from(value).ok().and_then(Duration::try_minutes)
}

fn default_jwt_secret() -> String {
    DEVELOPMENT_SECRET.to_string()
}

fn default_access_ttl() -> u64 {
    30
}

fn default_refresh_ttl() -> u64 {
    7
}

fn default_max_failed() -> u32 {
    5
}

fn default_true() -> bool {
    true
}
