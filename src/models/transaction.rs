//! Transition log (`transactions` table) and the request bodies of the
//! status-changing workflows.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};

use super::enums::{ResourceKind, ResourceStatus, TransitionAction};
use crate::error::AppError;

/// Immutable record of one status transition of a resource
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRecord {
    pub id: i32,
    pub resource_kind: ResourceKind,
    pub resource_id: i32,
    pub action: TransitionAction,
    pub from_status: ResourceStatus,
    pub to_status: ResourceStatus,
    pub assigned_to: Option<i32>,
    pub location_id: Option<i32>,
    pub checkout_date: Option<NaiveDate>,
    pub expected_return_date: Option<NaiveDate>,
    pub return_date: Option<NaiveDate>,
    pub purpose: Option<String>,
    pub notes: Option<String>,
    /// Set when the transition was caused by an approved borrow request
    pub borrow_request_id: Option<i32>,
    pub performed_by: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    pub resource_kind: Option<ResourceKind>,
    pub resource_id: Option<i32>,
    pub action: Option<TransitionAction>,
    pub performed_by: Option<i32>,
    /// First day of the window, inclusive
    pub performed_from: Option<NaiveDate>,
    /// Last day of the window, inclusive
    pub performed_until: Option<NaiveDate>,
}

/// Check-out request
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    /// User receiving the resource
    pub assigned_to: i32,
    /// Location the resource is checked out to
    pub assigned_location: i32,
    /// Defaults to today
    pub checkout_date: Option<NaiveDate>,
    pub expected_return_date: Option<NaiveDate>,
    pub purpose_reason: Option<String>,
}

impl CheckoutRequest {
    /// Rejects an expected return date earlier than the checkout date
    pub fn check_dates(&self, today: NaiveDate) -> Result<(), AppError> {
        let checkout_date = self.checkout_date.unwrap_or(today);
        match self.expected_return_date {
            Some(expected) if expected < checkout_date => Err(AppError::Validation(
                "Expected return date cannot be before the checkout date".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// Check-in request
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckinRequest {
    /// Defaults to today
    pub return_date: Option<NaiveDate>,
    pub return_location: Option<i32>,
    pub notes: Option<String>,
}

/// Manual status change (repair, retirement, loss, back to available)
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub status: ResourceStatus,
    pub notes: Option<String>,
}

/// Result of a transition workflow
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransitionOutcome {
    pub resource_kind: ResourceKind,
    pub resource_id: i32,
    pub status: ResourceStatus,
    pub assigned_to: Option<i32>,
    pub transaction: TransactionRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn checkout(checkout_date: Option<NaiveDate>, expected: Option<NaiveDate>) -> CheckoutRequest {
        CheckoutRequest {
            assigned_to: 7,
            assigned_location: 1,
            checkout_date,
            expected_return_date: expected,
            purpose_reason: None,
        }
    }

    #[test]
    fn test_return_before_checkout_is_rejected() {
        let req = checkout(Some(date(2024, 3, 10)), Some(date(2024, 3, 9)));
        assert!(matches!(
            req.check_dates(date(2024, 3, 1)),
            Err(AppError::Validation(_))
        ));
    }

    #[test]
    fn test_checkout_date_defaults_to_today() {
        let today = date(2024, 3, 10);
        assert!(checkout(None, Some(date(2024, 3, 10))).check_dates(today).is_ok());
        assert!(checkout(None, Some(date(2024, 3, 9))).check_dates(today).is_err());
        assert!(checkout(None, None).check_dates(today).is_ok());
    }

    #[test]
    fn test_checkout_body_is_camel_case() {
        let req: CheckoutRequest = serde_json::from_str(
            r#"{"assignedTo": 3, "assignedLocation": 2, "purposeReason": "Onboarding"}"#,
        )
        .unwrap();
        assert_eq!(req.assigned_to, 3);
        assert_eq!(req.assigned_location, 2);
        assert_eq!(req.purpose_reason.as_deref(), Some("Onboarding"));
    }
}
