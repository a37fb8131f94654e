//! # nousquest-api
//!
//! HTTP API layer for NousQuest built on Axum.
//!
//! Provides the session lifecycle endpoints (login, logout, refresh,
//! session), the authorization endpoints, session cookie handling, the
//! authentication extractor, the silent-refresh middleware, and the mapping
//! from [`AppError`](nousquest_core::AppError) to HTTP responses.

pub mod app;
pub mod cookies;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod state;

pub use app::{build_app, run_server};
pub use error::ApiError;
pub use state::AppState;
