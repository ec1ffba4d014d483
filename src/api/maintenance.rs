//! Maintenance completion endpoints

use axum::{
    extract::{Path, Query, State},
    Json,
};
use axum_extra::extract::WithRejection;

use super::{ApiResponse, AuthenticatedUser};
use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{CompleteMaintenance, MaintenanceCompletion, MaintenanceLog},
        pagination::{Page, PageParams},
    },
    AppState,
};

/// Record a completed occurrence and schedule the next one
#[utoipa::path(
    post,
    path = "/maintenance-schedules/{id}/complete",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Schedule ID")),
    request_body = CompleteMaintenance,
    responses(
        (status = 200, description = "Maintenance recorded", body = MaintenanceCompletion),
        (status = 400, description = "Schedule inactive or invalid body", body = crate::error::ErrorResponse),
        (status = 404, description = "Schedule not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn complete_maintenance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Json(data), _): WithRejection<Json<CompleteMaintenance>, AppError>,
) -> AppResult<Json<ApiResponse<MaintenanceCompletion>>> {
    let completion = state
        .services
        .maintenance
        .complete(id, data, claims.user_id)
        .await?;
    Ok(ApiResponse::with_message(completion, "Maintenance recorded"))
}

/// Completed occurrences of a schedule
#[utoipa::path(
    get,
    path = "/maintenance-schedules/{id}/logs",
    tag = "maintenance",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Schedule ID"),
        PageParams
    ),
    responses(
        (status = 200, description = "Paginated log entries", body = Vec<MaintenanceLog>),
        (status = 404, description = "Schedule not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_logs(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    WithRejection(Query(page), _): WithRejection<Query<PageParams>, AppError>,
) -> AppResult<Json<ApiResponse<Page<MaintenanceLog>>>> {
    let logs = state.services.maintenance.logs(id, &page).await?;
    Ok(ApiResponse::ok(logs))
}
