//! Borrow requests and their decision log

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::{BorrowEventAction, BorrowStatus, EquipmentKind};
use crate::error::AppError;

/// Equipment a request asks for: exactly one kind and one id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowTarget {
    pub kind: EquipmentKind,
    pub resource_id: i32,
}

/// Row of the `borrow_request_status` view: the immutable request plus its
/// current status and the latest decision, if any.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequest {
    pub id: i32,
    pub requester_id: i32,
    pub target_kind: EquipmentKind,
    pub target_id: i32,
    pub purpose: Option<String>,
    pub requested_from: Option<NaiveDate>,
    pub requested_until: Option<NaiveDate>,
    pub location_id: Option<i32>,
    pub status: BorrowStatus,
    pub decided_by: Option<i32>,
    pub decided_at: Option<DateTime<Utc>>,
    pub rejection_reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Append-only entry of `borrow_request_events`
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequestEvent {
    pub id: i32,
    pub request_id: i32,
    pub action: BorrowEventAction,
    pub actor_id: i32,
    pub reason: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrowRequest {
    pub target: BorrowTarget,
    #[validate(length(max = 1000, message = "Purpose is too long"))]
    pub purpose: Option<String>,
    pub requested_from: Option<NaiveDate>,
    pub requested_until: Option<NaiveDate>,
    /// Location the equipment will be used at once lent
    pub location_id: Option<i32>,
}

impl CreateBorrowRequest {
    pub fn check_dates(&self) -> Result<(), AppError> {
        match (self.requested_from, self.requested_until) {
            (Some(from), Some(until)) if until < from => Err(AppError::Validation(
                "Requested end date cannot be before the start date".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Approve or reject a pending request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApproveBorrowRequest {
    #[serde(default = "default_approved")]
    pub approved: bool,
    pub rejection_reason: Option<String>,
}

fn default_approved() -> bool {
    true
}

impl Default for ApproveBorrowRequest {
    fn default() -> Self {
        Self {
            approved: true,
            rejection_reason: None,
        }
    }
}

impl ApproveBorrowRequest {
    /// An empty body approves
    pub fn from_body(body: &[u8]) -> Result<Self, AppError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        serde_json::from_slice(body).map_err(|e| {
            AppError::Validation(format!("Failed to parse the request body as JSON: {}", e))
        })
    }
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct BorrowRequestQuery {
    pub search: Option<String>,
    pub status: Option<BorrowStatus>,
    pub target_kind: Option<EquipmentKind>,
    pub target_id: Option<i32>,
    pub requester_id: Option<i32>,
}
