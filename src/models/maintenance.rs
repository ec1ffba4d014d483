//! Preventive maintenance schedules and their completion log

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::ResourceKind;
use crate::error::{AppError, AppResult};

/// Recurring maintenance task attached to one trackable resource
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceSchedule {
    pub id: i32,
    pub title: String,
    pub resource_kind: ResourceKind,
    pub resource_id: i32,
    /// Days between two occurrences
    pub interval_days: i32,
    pub next_due_date: NaiveDate,
    pub last_completed_date: Option<NaiveDate>,
    pub active: bool,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMaintenanceSchedule {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    pub resource_kind: ResourceKind,
    pub resource_id: i32,
    #[validate(range(min = 1, max = 36500, message = "Interval must be between 1 and 36500 days"))]
    pub interval_days: i32,
    pub next_due_date: NaiveDate,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMaintenanceSchedule {
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: Option<String>,
    #[validate(range(min = 1, max = 36500, message = "Interval must be between 1 and 36500 days"))]
    pub interval_days: Option<i32>,
    pub next_due_date: Option<NaiveDate>,
    pub active: Option<bool>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceQuery {
    pub search: Option<String>,
    pub resource_kind: Option<ResourceKind>,
    pub resource_id: Option<i32>,
    pub active: Option<bool>,
    /// Schedules due within this many days (overdue ones included)
    pub due_within_days: Option<i32>,
}

/// One completed occurrence of a schedule
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceLog {
    pub id: i32,
    pub schedule_id: i32,
    pub performed_on: NaiveDate,
    pub performed_by: i32,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompleteMaintenance {
    /// Defaults to today
    pub performed_on: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    pub notes: Option<String>,
}

/// Result of completing a schedule
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceCompletion {
    pub schedule: MaintenanceSchedule,
    pub log: MaintenanceLog,
}

/// Next occurrence counted from the day the work was actually performed
pub fn next_due_after(performed_on: NaiveDate, interval_days: i32) -> AppResult<NaiveDate> {
    performed_on
        .checked_add_signed(chrono::Duration::days(i64::from(interval_days.max(1))))
        .ok_or_else(|| AppError::Validation("Next due date is out of range".to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_due_after() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 30).unwrap();
        assert_eq!(
            next_due_after(day, 30).unwrap(),
            NaiveDate::from_ymd_opt(2024, 2, 29).unwrap()
        );
        assert_eq!(
            next_due_after(day, 0).unwrap(),
            NaiveDate::from_ymd_opt(2024, 1, 31).unwrap()
        );
    }

    #[test]
    fn test_next_due_after_overflow_is_an_error() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        assert!(matches!(
            next_due_after(day, i32::MAX),
            Err(AppError::Validation(_))
        ));
        assert!(next_due_after(NaiveDate::MAX, 1).is_err());
    }

    #[test]
    fn test_interval_upper_bound() {
        let mut body = CreateMaintenanceSchedule {
            title: "Replace UPS battery".to_string(),
            resource_kind: ResourceKind::NetworkDevice,
            resource_id: 9,
            interval_days: i32::MAX,
            next_due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            active: None,
            notes: None,
        };
        assert!(body.validate().is_err());
        body.interval_days = 36500;
        assert!(body.validate().is_ok());

        let update = UpdateMaintenanceSchedule {
            interval_days: Some(0),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_interval_must_be_positive() {
        let body = CreateMaintenanceSchedule {
            title: "Clean filters".to_string(),
            resource_kind: ResourceKind::Printer,
            resource_id: 3,
            interval_days: 0,
            next_due_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            active: None,
            notes: None,
        };
        assert!(body.validate().is_err());
    }
}
