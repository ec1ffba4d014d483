//! Check-out, check-in and status change endpoints for trackable resources

use axum::{
    async_trait,
    extract::{FromRequestParts, MatchedPath, Path, State},
    http::request::Parts,
    Json,
};
use axum_extra::extract::WithRejection;

use super::{ApiResponse, AuthenticatedUser};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ResourceKind,
        transaction::{CheckinRequest, CheckoutRequest, StatusChangeRequest, TransitionOutcome},
    },
    AppState,
};

/// Resource kind (from the matched collection segment) and id of the target
#[derive(Debug, Clone, Copy)]
pub struct TrackableTarget {
    pub kind: ResourceKind,
    pub id: i32,
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for TrackableTarget {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let kind = parts
            .extensions
            .get::<MatchedPath>()
            .and_then(|path| kind_from_route(path.as_str()))
            .ok_or_else(|| AppError::NotFound("Resource type not found".to_string()))?;

        let Path(id) = Path::<i32>::from_request_parts(parts, state).await?;

        Ok(TrackableTarget { kind, id })
    }
}

/// `/api/v1/network-devices/:id/checkout` -> `NetworkDevice`
fn kind_from_route(route: &str) -> Option<ResourceKind> {
    let segments: Vec<&str> = route.split('/').collect();
    let id_pos = segments.iter().position(|segment| *segment == ":id")?;
    let collection = segments.get(id_pos.checked_sub(1)?)?;
    ResourceKind::from_collection(collection)
}

/// Check a resource out to a user
#[utoipa::path(
    post,
    path = "/{collection}/{id}/checkout",
    tag = "transitions",
    security(("bearer_auth" = [])),
    params(
        ("collection" = String, Path, description = "assets, equipment, computers, monitors, printers or network-devices"),
        ("id" = i32, Path, description = "Resource ID")
    ),
    request_body = CheckoutRequest,
    responses(
        (status = 200, description = "Resource checked out", body = TransitionOutcome),
        (status = 400, description = "Resource not available or invalid dates", body = crate::error::ErrorResponse),
        (status = 404, description = "Resource not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn checkout(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    target: TrackableTarget,
    WithRejection(Json(request), _): WithRejection<Json<CheckoutRequest>, AppError>,
) -> AppResult<Json<ApiResponse<TransitionOutcome>>> {
    let outcome = state
        .services
        .transitions
        .check_out(target.kind, target.id, request, claims.user_id)
        .await?;
    Ok(ApiResponse::with_message(
        outcome,
        format!("{} checked out", target.kind.display_name()),
    ))
}

/// Return a checked-out resource
#[utoipa::path(
    post,
    path = "/{collection}/{id}/checkin",
    tag = "transitions",
    security(("bearer_auth" = [])),
    params(
        ("collection" = String, Path, description = "Trackable collection"),
        ("id" = i32, Path, description = "Resource ID")
    ),
    request_body = CheckinRequest,
    responses(
        (status = 200, description = "Resource checked in", body = TransitionOutcome),
        (status = 400, description = "Resource not checked out", body = crate::error::ErrorResponse),
        (status = 404, description = "Resource not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn checkin(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    target: TrackableTarget,
    WithRejection(Json(request), _): WithRejection<Json<CheckinRequest>, AppError>,
) -> AppResult<Json<ApiResponse<TransitionOutcome>>> {
    let outcome = state
        .services
        .transitions
        .check_in(target.kind, target.id, request, claims.user_id)
        .await?;
    Ok(ApiResponse::with_message(
        outcome,
        format!("{} checked in", target.kind.display_name()),
    ))
}

/// Move a resource to repair, retirement, lost, or back to available
#[utoipa::path(
    post,
    path = "/{collection}/{id}/status",
    tag = "transitions",
    security(("bearer_auth" = [])),
    params(
        ("collection" = String, Path, description = "Trackable collection"),
        ("id" = i32, Path, description = "Resource ID")
    ),
    request_body = StatusChangeRequest,
    responses(
        (status = 200, description = "Status changed", body = TransitionOutcome),
        (status = 400, description = "Transition not allowed", body = crate::error::ErrorResponse),
        (status = 404, description = "Resource not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn change_status(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    target: TrackableTarget,
    WithRejection(Json(request), _): WithRejection<Json<StatusChangeRequest>, AppError>,
) -> AppResult<Json<ApiResponse<TransitionOutcome>>> {
    let outcome = state
        .services
        .transitions
        .change_status(target.kind, target.id, request, claims.user_id)
        .await?;
    Ok(ApiResponse::with_message(outcome, "Status updated"))
}
