//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use nousquest_auth::{
    CredentialValidator, JwtDecoder, JwtEncoder, PasswordHasher, PermissionResolver,
    SessionRefresher, TokenDenyList, TokenIssuer,
};
use nousquest_core::config::AppConfig;
use nousquest_core::result::AppResult;
use nousquest_database::Stores;
use nousquest_database::store::CredentialStore;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`. Nothing in here is
/// request-scoped; per-request identity travels in
/// [`AuthSession`](crate::extractors::AuthSession).
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    /// Application configuration
    pub config: Arc<AppConfig>,

    // ── Stores ───────────────────────────────────────────────
    /// Credential and lockout state
    pub credentials: Arc<dyn CredentialStore>,

    // ── Auth ─────────────────────────────────────────────────
    /// Login validator with lockout
    pub validator: Arc<CredentialValidator>,
    /// Permission graph resolver
    pub resolver: Arc<PermissionResolver>,
    /// Access/refresh token issuer
    pub issuer: Arc<TokenIssuer>,
    /// Token verifier with deny-list
    pub decoder: Arc<JwtDecoder>,
    /// Silent refresh and rotation
    pub refresher: Arc<SessionRefresher>,
}

impl AppState {
    /// Wire the auth components over `stores` using production password
    /// hashing parameters.
    pub fn build(config: AppConfig, stores: Stores) -> AppResult<Self> {
        Self::with_hasher(config, stores, PasswordHasher::new())
    }

    /// Like [`build`](Self::build) with an explicit password hasher.
    pub fn with_hasher(config: AppConfig, stores: Stores, hasher: PasswordHasher) -> AppResult<Self> {
        config.validate()?;
        let auth = &config.auth;

        let resolver = Arc::new(PermissionResolver::new(
            Arc::clone(&stores.permissions),
            auth.trust_token_claims,
        ));
        let issuer = Arc::new(TokenIssuer::new(
            JwtEncoder::new(&auth.jwt_secret),
            Arc::clone(&resolver),
            auth.access_ttl(),
            auth.refresh_ttl(),
        ));
        let decoder = Arc::new(JwtDecoder::new(&auth.jwt_secret, TokenDenyList::new()));
        let refresher = Arc::new(SessionRefresher::new(
            Arc::clone(&decoder),
            Arc::clone(&issuer),
            Arc::clone(&stores.credentials),
            auth.refresh_threshold(),
        ));
        let validator = Arc::new(CredentialValidator::new(
            Arc::clone(&stores.credentials),
            hasher,
            auth.max_failed_attempts,
        ));

        Ok(Self {
            config: Arc::new(config),
            credentials: stores.credentials,
            validator,
            resolver,
            issuer,
            decoder,
            refresher,
        })
    }
}
