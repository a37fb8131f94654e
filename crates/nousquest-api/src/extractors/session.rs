//! `AuthSession` extractor: verifies the access token and exposes the
//! request's session context.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use nousquest_auth::SessionContext;
use nousquest_auth::session::authenticate;

use crate::cookies;
use crate::error::ApiError;
use crate::state::AppState;

/// Authenticated session for the current request.
///
/// The token is read from the access cookie, or from an
/// `Authorization: Bearer` header when no cookie is present. Handlers that
/// take this extractor reject unauthenticated requests with 401 before
/// their body runs.
#[derive(Debug, Clone)]
pub struct AuthSession(pub SessionContext);

impl AuthSession {
    /// Returns the inner `SessionContext`.
    pub fn context(&self) -> &SessionContext {
        &self.0
    }
}

impl std::ops::Deref for AuthSession {
    type Target = SessionContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl FromRequestParts<AppState> for AuthSession {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let jar = CookieJar::from_headers(&parts.headers);
        let token = cookies::access_token(&jar, &parts.headers, &state.config.cookie);

        let ctx = authenticate(&state.decoder, token.as_deref()).await?;
        Ok(AuthSession(ctx))
    }
}
