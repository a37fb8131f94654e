//! Silent access-token refresh.
//!
//! Runs after the handler. When the request carried a valid access token
//! close to expiry and a usable refresh token, a new access cookie is
//! appended to whatever the handler returned. Nothing here can turn a
//! successful response into a failure.

use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::HeaderValue;
use axum::http::header::SET_COOKIE;
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;
use tracing::{debug, warn};

use nousquest_auth::RefreshDecision;

use crate::cookies;
use crate::state::AppState;

/// Upper bound on the refresh step so a slow store cannot hold the
/// response hostage.
pub const REFRESH_DEADLINE: Duration = Duration::from_secs(2);

/// Middleware entry point, installed with `from_fn_with_state`.
pub async fn silent_refresh(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let jar = CookieJar::from_headers(request.headers());
    let access = cookies::access_token(&jar, request.headers(), &state.config.cookie);
    let refresh = cookies::refresh_token(&jar, &state.config.cookie);

    let mut response = next.run(request).await;

    let Some(access) = access else {
        return response;
    };

    let decision = match tokio::time::timeout(
        REFRESH_DEADLINE,
        state.refresher.evaluate(&access, refresh.as_deref()),
    )
    .await
    {
        Ok(decision) => decision,
        Err(_) => {
            warn!("Silent refresh exceeded its deadline; response sent unchanged");
            return response;
        }
    };

    match decision {
        RefreshDecision::Refreshed(token) => {
            let cookie = cookies::access_cookie(&state.config.cookie, &token);
            match HeaderValue::from_str(&cookie.to_string()) {
                Ok(value) => {
                    response.headers_mut().append(SET_COOKIE, value);
                }
                Err(e) => warn!(error = %e, "Refreshed access cookie is not a valid header"),
            }
        }
        RefreshDecision::Skipped(reason) => {
            debug!(reason = ?reason, "Access token near expiry but not refreshed");
        }
        RefreshDecision::NotNeeded => {}
    }

    response
}
