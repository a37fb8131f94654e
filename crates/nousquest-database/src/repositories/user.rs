//! User credential repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use nousquest_core::error::{AppError, ErrorKind};
use nousquest_core::result::AppResult;
use nousquest_core::types::{OrgId, UserId};
use nousquest_entity::user::User;

use crate::store::{CredentialStore, FailedAttempt};

/// Repository for credential lookups and lockout bookkeeping.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for UserRepository {
    async fn find_by_identifier(&self, identifier: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = $1")
            .bind(identifier)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to find user by identifier", e)
            })
    }

    async fn find_by_id(&self, user_id: UserId, org_id: OrgId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1 AND org_id = $2")
            .bind(user_id)
            .bind(org_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user by id", e))
    }

    async fn record_failed_attempt(
        &self,
        user_id: UserId,
        org_id: OrgId,
        max_failed_attempts: u32,
    ) -> AppResult<FailedAttempt> {
        let threshold = i32::try_from(max_failed_attempts).map_err(|_| {
            AppError::configuration(format!(
                "max_failed_attempts {max_failed_attempts} exceeds the counter range"
            ))
        })?;

        // Single statement: the row lock taken by UPDATE serializes
        // concurrent increments on the same user.
        let row: Option<(i32, bool)> = sqlx::query_as(
            "UPDATE users \
             SET logon_attempt = logon_attempt + 1, \
                 locked = (logon_attempt + 1) > $3, \
                 updated_at = NOW() \
             WHERE id = $1 AND org_id = $2 AND locked = FALSE \
             RETURNING logon_attempt, locked",
        )
        .bind(user_id)
        .bind(org_id)
        .bind(threshold)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record failed login attempt", e)
        })?;

        Ok(match row {
            None => FailedAttempt::AlreadyLocked,
            Some((attempts, true)) => FailedAttempt::Locked { attempts },
            Some((attempts, false)) => FailedAttempt::Counted { attempts },
        })
    }

    async fn record_successful_login(
        &self,
        user_id: UserId,
        org_id: OrgId,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET logon_attempt = 0, last_logon = $3, updated_at = NOW() \
             WHERE id = $1 AND org_id = $2 AND locked = FALSE",
        )
        .bind(user_id)
        .bind(org_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to record successful login", e)
        })?;

        Ok(result.rows_affected() > 0)
    }

    async fn clear_lockout(&self, user_id: UserId, org_id: OrgId) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE users SET locked = FALSE, logon_attempt = 0, updated_at = NOW() \
             WHERE id = $1 AND org_id = $2",
        )
        .bind(user_id)
        .bind(org_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to clear lockout", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_locked(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE locked = TRUE ORDER BY email")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list locked users", e)
            })
    }

    async fn health_check(&self) -> AppResult<bool> {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|v| v == 1)
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Health check failed", e))
    }
}
