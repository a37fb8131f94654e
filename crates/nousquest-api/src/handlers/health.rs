//! Health check handler.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use tracing::warn;

use nousquest_core::types::ApiEnvelope;
use nousquest_database::CredentialStore;

use crate::dto::response::HealthData;
use crate::state::AppState;

/// GET /api/health
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<ApiEnvelope<HealthData>>) {
    let connected = match state.credentials.health_check().await {
        Ok(ok) => ok,
        Err(e) => {
            warn!(error = %e, "Store health check failed");
            false
        }
    };

    let (status, label, store) = if connected {
        (StatusCode::OK, "ok", "connected")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
    };

    let data = HealthData {
        status: label.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store: store.to_string(),
    };
    (
        status,
        Json(ApiEnvelope::with_status(Some(data), label, status.as_u16())),
    )
}
