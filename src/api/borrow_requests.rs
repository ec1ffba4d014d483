//! Borrow request endpoints. Listing and fetching go through the generic
//! resource handlers.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use axum_extra::extract::WithRejection;

use super::{ApiResponse, AuthenticatedUser};
use crate::{
    error::{AppError, AppResult},
    models::borrow_request::{
        ApproveBorrowRequest, BorrowRequest, BorrowRequestEvent, CreateBorrowRequest,
    },
    repository::borrow_requests::BorrowDecision,
    AppState,
};

/// Ask to borrow a piece of equipment
#[utoipa::path(
    post,
    path = "/borrow-requests",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowRequest,
    responses(
        (status = 201, description = "Request submitted", body = BorrowRequest),
        (status = 400, description = "Invalid request", body = crate::error::ErrorResponse),
        (status = 404, description = "Target not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn create_borrow_request(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    WithRejection(Json(data), _): WithRejection<Json<CreateBorrowRequest>, AppError>,
) -> AppResult<(StatusCode, Json<ApiResponse<BorrowRequest>>)> {
    let request = state
        .services
        .borrow_requests
        .submit(claims.user_id, data)
        .await?;
    Ok((
        StatusCode::CREATED,
        ApiResponse::with_message(request, "Borrow request submitted"),
    ))
}

/// Approve (default) or reject a pending request. A bodyless call approves.
#[utoipa::path(
    post,
    path = "/borrow-requests/{id}/approve",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow request ID")),
    request_body(content = ApproveBorrowRequest, description = "Omit the body to approve"),
    responses(
        (status = 200, description = "Decision recorded", body = BorrowDecision),
        (status = 400, description = "Request not pending or target unavailable", body = crate::error::ErrorResponse),
        (status = 403, description = "Manager or administrator required", body = crate::error::ErrorResponse),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn approve_borrow_request(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
    body: Bytes,
) -> AppResult<Json<ApiResponse<BorrowDecision>>> {
    claims.require_approver()?;
    let decision = ApproveBorrowRequest::from_body(&body)?;

    let approved = decision.approved;
    let outcome = state
        .services
        .borrow_requests
        .decide(id, claims.user_id, decision)
        .await?;

    let message = if approved {
        "Borrow request approved"
    } else {
        "Borrow request rejected"
    };
    Ok(ApiResponse::with_message(outcome, message))
}

/// Submission and decision history of a request
#[utoipa::path(
    get,
    path = "/borrow-requests/{id}/events",
    tag = "borrow-requests",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Borrow request ID")),
    responses(
        (status = 200, description = "Events, oldest first", body = Vec<BorrowRequestEvent>),
        (status = 404, description = "Request not found", body = crate::error::ErrorResponse)
    )
)]
pub async fn list_events(
    State(state): State<AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    WithRejection(Path(id), _): WithRejection<Path<i32>, AppError>,
) -> AppResult<Json<ApiResponse<Vec<BorrowRequestEvent>>>> {
    let events = state.services.borrow_requests.events(id).await?;
    Ok(ApiResponse::ok(events))
}
