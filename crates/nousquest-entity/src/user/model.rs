//! User entity model.

use chrono::{DateTime, Utc};
use nousquest_core::types::{OrgId, UserId};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A user account, identified by `(id, org_id)`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    /// User identifier, unique within the organization.
    pub id: UserId,
    /// Owning organization.
    pub org_id: OrgId,
    /// Login name.
    pub username: String,
    /// Email address; the login identifier.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Set once the failed-attempt counter passes the threshold.
    pub locked: bool,
    /// Consecutive failed login attempts.
    pub logon_attempt: i32,
    /// Last successful login time.
    pub last_logon: Option<DateTime<Utc>>,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Check if the user account is locked.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Public projection returned after login.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            id: self.id,
            org_id: self.org_id,
            username: self.username.clone(),
            email: self.email.clone(),
            firstname: self.firstname.clone(),
            lastname: self.lastname.clone(),
            last_logon: self.last_logon,
        }
    }
}

/// The user fields safe to hand back to a client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    /// User identifier.
    pub id: UserId,
    /// Owning organization.
    pub org_id: OrgId,
    /// Login name.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
    /// Last successful login time.
    pub last_logon: Option<DateTime<Utc>>,
}

/// Data required to create a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUser {
    /// Owning organization.
    pub org_id: OrgId,
    /// Desired username.
    pub username: String,
    /// Email address.
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    /// Given name.
    pub firstname: String,
    /// Family name.
    pub lastname: String,
}

impl CreateUser {
    /// Materialize a fresh, unlocked user row.
    pub fn into_user(self) -> User {
        let now = Utc::now();
        User {
            id: UserId::new(),
            org_id: self.org_id,
            username: self.username,
            email: self.email,
            password_hash: self.password_hash,
            firstname: self.firstname,
            lastname: self.lastname,
            locked: false,
            logon_attempt: 0,
            last_logon: None,
            created_at: now,
            updated_at: now,
        }
    }
}
