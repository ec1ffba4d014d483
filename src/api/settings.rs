//! Settings endpoints

use axum::{extract::State, Json};
use axum_extra::extract::WithRejection;

use super::{ApiResponse, AuthenticatedUser};
use crate::{
    error::{AppError, AppResult},
    models::settings::SettingsMap,
    AppState,
};

/// Get current settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current settings", body = SettingsMap),
        (status = 403, description = "Administrator required", body = crate::error::ErrorResponse)
    )
)]
pub async fn get_settings(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<ApiResponse<SettingsMap>>> {
    claims.require_admin()?;

    let settings = state.services.settings.get_settings().await?;
    Ok(ApiResponse::ok(settings))
}

/// Upsert settings; every key is written or none is
#[utoipa::path(
    put,
    path = "/settings",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = SettingsMap,
    responses(
        (status = 200, description = "Updated settings", body = SettingsMap),
        (status = 400, description = "Invalid key or empty body", body = crate::error::ErrorResponse),
        (status = 403, description = "Administrator required", body = crate::error::ErrorResponse)
    )
)]
pub async fn update_settings(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    WithRejection(Json(settings), _): WithRejection<Json<SettingsMap>, AppError>,
) -> AppResult<Json<ApiResponse<SettingsMap>>> {
    claims.require_admin()?;

    let settings = state
        .services
        .settings
        .update_settings(settings, claims.user_id)
        .await?;
    Ok(ApiResponse::with_message(settings, "Settings updated"))
}
