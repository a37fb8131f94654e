//! Route definitions for the NousQuest HTTP API.
//!
//! All routes are mounted under `/api`. The session lifecycle routes manage
//! cookies themselves; every other route runs behind the silent-refresh
//! middleware.

use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware as axum_middleware,
    routing::{get, post},
};

use crate::handlers;
use crate::middleware;
use crate::state::AppState;

/// Request bodies here are small JSON documents.
const MAX_BODY_BYTES: usize = 16 * 1024;

/// Build the Axum router with all routes and per-route middleware.
pub fn build_router(state: AppState) -> Router {
    let refreshed_routes = Router::new()
        .merge(session_routes())
        .merge(authorization_routes())
        .merge(health_routes())
        .layer(axum_middleware::from_fn_with_state(
            state.clone(),
            middleware::refresh::silent_refresh,
        ));

    let api_routes = Router::new()
        .merge(lifecycle_routes())
        .merge(refreshed_routes);

    Router::new()
        .nest("/api", api_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(axum_middleware::from_fn(
            middleware::logging::request_logging,
        ))
        .with_state(state)
}

/// Login, logout, refresh: each sets or clears cookies explicitly.
fn lifecycle_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))
        .route("/refresh", post(handlers::auth::refresh))
}

fn session_routes() -> Router<AppState> {
    Router::new().route("/session", get(handlers::auth::session))
}

fn authorization_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/authorizations",
            get(handlers::authorization::list_authorizations),
        )
        .route(
            "/authorizations/check",
            get(handlers::authorization::check_permission),
        )
}

fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(handlers::health::health))
}
