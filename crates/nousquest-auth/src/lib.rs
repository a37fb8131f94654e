//! # nousquest-auth
//!
//! Authentication and authorization for NousQuest tenants.
//!
//! ## Modules
//!
//! - `password` — Argon2id password hashing
//! - `credential` — login validation with lockout
//! - `rbac` — tenant-isolated permission resolution
//! - `jwt` — claims, signing, verification, and the token deny-list
//! - `token` — access/refresh token pair issuance
//! - `session` — request-scoped session context and silent refresh

pub mod credential;
pub mod jwt;
pub mod password;
pub mod rbac;
pub mod session;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use credential::{CredentialValidator, LoginOutcome, RejectReason};
pub use jwt::{Claims, JwtDecoder, JwtEncoder, TokenDenyList, TokenType};
pub use password::PasswordHasher;
pub use rbac::{AuthorizationMap, PermissionResolver};
pub use session::{RefreshDecision, SessionContext, SessionRefresher};
pub use token::{IssuedToken, TokenIssuer, TokenPair};
