//! Session cookie construction.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use nousquest_auth::{IssuedToken, TokenPair};
use nousquest_core::config::{CookieConfig, SameSitePolicy};

fn same_site(policy: SameSitePolicy) -> SameSite {
    match policy {
        SameSitePolicy::Strict => SameSite::Strict,
        SameSitePolicy::Lax => SameSite::Lax,
        SameSitePolicy::None => SameSite::None,
    }
}

fn session_cookie(
    config: &CookieConfig,
    name: &str,
    value: String,
    path: &str,
    max_age: time::Duration,
) -> Cookie<'static> {
    Cookie::build((name.to_string(), value))
        .http_only(true)
        .secure(config.secure)
        .same_site(same_site(config.same_site))
        .path(path.to_string())
        .max_age(max_age)
        .build()
}

/// Cookie carrying an access token; `Max-Age` is the token's lifetime.
pub fn access_cookie(config: &CookieConfig, token: &IssuedToken) -> Cookie<'static> {
    session_cookie(
        config,
        &config.access_name,
        token.token.clone(),
        &config.access_path,
        time::Duration::seconds(token.lifetime.num_seconds()),
    )
}

/// Cookie carrying a refresh token, scoped to the refresh path.
pub fn refresh_cookie(config: &CookieConfig, token: &IssuedToken) -> Cookie<'static> {
    session_cookie(
        config,
        &config.refresh_name,
        token.token.clone(),
        &config.refresh_path,
        time::Duration::seconds(token.lifetime.num_seconds()),
    )
}

/// Add both cookies of a freshly issued pair.
pub fn set_pair(jar: CookieJar, config: &CookieConfig, pair: &TokenPair) -> CookieJar {
    jar.add(access_cookie(config, &pair.access))
        .add(refresh_cookie(config, &pair.refresh))
}

/// Expire both session cookies. Path and name must match what was set or
/// the browser keeps the original.
pub fn clear_pair(jar: CookieJar, config: &CookieConfig) -> CookieJar {
    jar.add(session_cookie(
        config,
        &config.access_name,
        String::new(),
        &config.access_path,
        time::Duration::ZERO,
    ))
    .add(session_cookie(
        config,
        &config.refresh_name,
        String::new(),
        &config.refresh_path,
        time::Duration::ZERO,
    ))
}

/// Access token from the cookie, falling back to an `Authorization: Bearer`
/// header for non-browser clients.
pub fn access_token(
    jar: &CookieJar,
    headers: &axum::http::HeaderMap,
    config: &CookieConfig,
) -> Option<String> {
    jar.get(&config.access_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
        .or_else(|| {
            headers
                .get(axum::http::header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.strip_prefix("Bearer "))
                .map(str::to_string)
        })
}

/// Refresh token from its cookie.
pub fn refresh_token(jar: &CookieJar, config: &CookieConfig) -> Option<String> {
    jar.get(&config.refresh_name)
        .map(|c| c.value().to_string())
        .filter(|v| !v.is_empty())
}
