//! Credential validation with failed-attempt lockout.

use std::sync::Arc;

use chrono::Utc;
use tracing::{error, info, warn};

use nousquest_core::error::AppError;
use nousquest_core::result::AppResult;
use nousquest_database::store::{CredentialStore, FailedAttempt};
use nousquest_entity::user::UserSummary;

use crate::password::PasswordHasher;

/// Response text for an unknown identifier or a wrong secret. The two
/// cases are deliberately indistinguishable to the caller.
pub const INVALID_CREDENTIALS_MESSAGE: &str = "Invalid credentials.";

/// Response text for a locked account.
pub const ACCOUNT_LOCKED_MESSAGE: &str =
    "Your account is locked due to too many failed login attempts. Please contact the system administrator.";

/// Why a login was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No user has this identifier.
    NoMatch,
    /// The secret did not match; the failure was counted.
    BadCredentials,
    /// The account is locked, either already or by this attempt.
    Locked,
}

impl RejectReason {
    /// Map to the error returned to the caller.
    pub fn into_error(self) -> AppError {
        match self {
            Self::NoMatch | Self::BadCredentials => {
                AppError::authentication(INVALID_CREDENTIALS_MESSAGE)
            }
            Self::Locked => AppError::locked(ACCOUNT_LOCKED_MESSAGE),
        }
    }
}

/// Result of a login attempt that reached a decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// Credentials accepted; counter reset and login time stamped.
    Authenticated(UserSummary),
    /// Credentials refused.
    Rejected(RejectReason),
}

/// Checks an identifier/secret pair against the credential store.
#[derive(Debug, Clone)]
pub struct CredentialValidator {
    store: Arc<dyn CredentialStore>,
    hasher: PasswordHasher,
    max_failed_attempts: u32,
    /// Hash checked against when the identifier is unknown, so that path
    /// costs one Argon2 verify like a wrong secret does.
    decoy_hash: Option<String>,
}

/// Plaintext behind the decoy hash. Never stored for any account.
const DECOY_SECRET: &str = "nousquest-decoy-secret";

impl CredentialValidator {
    /// Creates a validator over `store`.
    pub fn new(store: Arc<dyn CredentialStore>, hasher: PasswordHasher, max_failed_attempts: u32) -> Self {
        let decoy_hash = match hasher.hash_password(DECOY_SECRET) {
            Ok(hash) => Some(hash),
            Err(e) => {
                warn!(error = %e, "Could not build decoy hash; unknown identifiers answer faster");
                None
            }
        };

        Self {
            store,
            hasher,
            max_failed_attempts,
            decoy_hash,
        }
    }

    /// Validate a login attempt.
    ///
    /// A locked account is refused before the secret is checked and its
    /// counter is left alone. A wrong secret increments the counter
    /// atomically and locks the account once the new value exceeds the
    /// threshold. Store failures propagate as errors with no partial
    /// update applied.
    pub async fn login(&self, identifier: &str, secret: &str) -> AppResult<LoginOutcome> {
        let Some(user) = self.store.find_by_identifier(identifier).await? else {
            warn!(target: "security", identifier = %identifier, "Login attempt for unknown identifier");
            if let Some(decoy) = &self.decoy_hash {
                let _ = self.hasher.verify_password(secret, decoy);
            }
            return Ok(LoginOutcome::Rejected(RejectReason::NoMatch));
        };

        if user.is_locked() {
            warn!(
                target: "security",
                user_id = %user.id,
                org_id = %user.org_id,
                "Login attempt on locked account"
            );
            return Ok(LoginOutcome::Rejected(RejectReason::Locked));
        }

        if !self.hasher.verify_password(secret, &user.password_hash)? {
            let outcome = self
                .store
                .record_failed_attempt(user.id, user.org_id, self.max_failed_attempts)
                .await?;

            return Ok(match outcome {
                FailedAttempt::Counted { attempts } => {
                    warn!(
                        target: "security",
                        user_id = %user.id,
                        org_id = %user.org_id,
                        attempts,
                        "Failed login attempt"
                    );
                    LoginOutcome::Rejected(RejectReason::BadCredentials)
                }
                FailedAttempt::Locked { attempts } => {
                    error!(
                        target: "security",
                        user_id = %user.id,
                        org_id = %user.org_id,
                        attempts,
                        "Account locked after repeated failed logins"
                    );
                    LoginOutcome::Rejected(RejectReason::Locked)
                }
                FailedAttempt::AlreadyLocked => LoginOutcome::Rejected(RejectReason::Locked),
            });
        }

        let now = Utc::now();
        if !self
            .store
            .record_successful_login(user.id, user.org_id, now)
            .await?
        {
            warn!(
                target: "security",
                user_id = %user.id,
                org_id = %user.org_id,
                "Account locked while login was in flight"
            );
            return Ok(LoginOutcome::Rejected(RejectReason::Locked));
        }

        info!(
            target: "security",
            user_id = %user.id,
            org_id = %user.org_id,
            "User logged in"
        );

        let mut summary = user.summary();
        summary.last_logon = Some(now);
        Ok(LoginOutcome::Authenticated(summary))
    }
}
