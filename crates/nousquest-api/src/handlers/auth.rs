//! Session lifecycle handlers: login, logout, refresh, session.

use axum::Json;
use axum::extract::State;
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, info};

use nousquest_auth::LoginOutcome;
use nousquest_core::error::AppError;
use nousquest_core::types::ApiEnvelope;

use crate::cookies;
use crate::dto::request::LoginRequest;
use crate::dto::response::{LoginData, RefreshData, SessionData};
use crate::error::ApiError;
use crate::extractors::{AuthSession, ValidatedJson};
use crate::state::AppState;

/// POST /api/login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    ValidatedJson(req): ValidatedJson<LoginRequest>,
) -> Result<(CookieJar, Json<ApiEnvelope<LoginData>>), ApiError> {
    let user = match state.validator.login(&req.identifier, &req.secret).await? {
        LoginOutcome::Authenticated(user) => user,
        LoginOutcome::Rejected(reason) => return Err(reason.into_error().into()),
    };

    let pair = state.issuer.issue(user.org_id, user.id, None).await?;
    let jar = cookies::set_pair(jar, &state.config.cookie, &pair);

    Ok((
        jar,
        Json(ApiEnvelope::ok(LoginData { user }, "Login successful")),
    ))
}

/// POST /api/logout
///
/// Clears both cookies. With `auth.revoke_on_logout` the presented access
/// token, and the refresh token when the browser sent it, are deny-listed
/// for the rest of their lifetime.
pub async fn logout(
    State(state): State<AppState>,
    session: AuthSession,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiEnvelope<()>>), ApiError> {
    if state.config.auth.revoke_on_logout {
        state
            .decoder
            .revoke(session.token_id(), session.expires_at())
            .await;

        if let Some(refresh) = cookies::refresh_token(&jar, &state.config.cookie) {
            match state.decoder.decode_refresh(&refresh).await {
                Ok(claims) if claims.sub == session.user_id() && claims.org_id == session.org_id() => {
                    state.decoder.revoke(claims.jti, claims.expires_at()).await;
                }
                Ok(_) => debug!("Refresh cookie belongs to another principal; left alone"),
                Err(e) => debug!(error = %e, "Refresh cookie already unusable"),
            }
        }
    }

    info!(
        target: "security",
        user_id = %session.user_id(),
        org_id = %session.org_id(),
        "User logged out"
    );

    let jar = cookies::clear_pair(jar, &state.config.cookie);
    Ok((
        jar,
        Json(ApiEnvelope::with_status(None, "Logout successful", 200)),
    ))
}

/// POST /api/refresh
///
/// Exchanges the refresh cookie for a new pair. Any failure answers 401
/// and sets no cookies.
pub async fn refresh(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<(CookieJar, Json<ApiEnvelope<RefreshData>>), ApiError> {
    let token = cookies::refresh_token(&jar, &state.config.cookie)
        .ok_or_else(|| AppError::authentication("Refresh token required"))?;

    let pair = state.refresher.rotate(&token).await?;
    let data = RefreshData {
        access_expires_at: pair.access.expires_at,
        refresh_expires_at: pair.refresh.expires_at,
    };
    let jar = cookies::set_pair(jar, &state.config.cookie, &pair);

    Ok((jar, Json(ApiEnvelope::ok(data, "Token refreshed"))))
}

/// GET /api/session
pub async fn session(session: AuthSession) -> Json<ApiEnvelope<SessionData>> {
    Json(ApiEnvelope::ok(
        SessionData {
            user_id: session.user_id(),
            org_id: session.org_id(),
        },
        "Session active",
    ))
}
