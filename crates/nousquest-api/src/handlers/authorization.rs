//! Authorization query handlers.

use axum::Json;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use validator::Validate;

use nousquest_auth::{AuthorizationMap, SessionContext};
use nousquest_core::error::AppError;
use nousquest_core::types::ApiEnvelope;

use crate::dto::request::{AuthorizationsQuery, PermissionCheckQuery};
use crate::dto::response::PermissionCheckData;
use crate::error::ApiError;
use crate::extractors::AuthSession;
use crate::state::AppState;

/// Gate for handlers that need a specific permission. A denial is a 403.
pub async fn require_permission(
    state: &AppState,
    session: &SessionContext,
    resource: &str,
    action: &str,
) -> Result<(), ApiError> {
    state.resolver.require(session, resource, action).await?;
    Ok(())
}

/// GET /api/authorizations?resources=a,b
pub async fn list_authorizations(
    State(state): State<AppState>,
    session: AuthSession,
    Query(query): Query<AuthorizationsQuery>,
) -> Result<Json<ApiEnvelope<AuthorizationMap>>, ApiError> {
    let filter = query.resource_filter();
    let map = state
        .resolver
        .authorization_map(session.user_id(), session.org_id(), filter.as_deref())
        .await?;

    Ok(Json(ApiEnvelope::ok(map, "Authorizations retrieved")))
}

/// GET /api/authorizations/check?resource=..&action=..
pub async fn check_permission(
    State(state): State<AppState>,
    session: AuthSession,
    query: Result<Query<PermissionCheckQuery>, QueryRejection>,
) -> Result<Json<ApiEnvelope<PermissionCheckData>>, ApiError> {
    let Query(query) = query.map_err(|_| AppError::validation("Validation error"))?;
    query
        .validate()
        .map_err(|_| AppError::validation("Validation error"))?;

    require_permission(&state, &session, &query.resource, &query.action).await?;

    Ok(Json(ApiEnvelope::ok(
        PermissionCheckData {
            resource: query.resource,
            action: query.action,
            allowed: true,
        },
        "Permission granted",
    )))
}
