//! Contracts, domains and software licenses: resources with an expiry date

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

/// Vendor or service contract
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Contract {
    pub id: i32,
    /// Unique contract reference
    pub contract_number: String,
    pub title: String,
    pub vendor_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub value: Option<Decimal>,
    /// Active, Expired, Terminated
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateContract {
    #[validate(length(min = 1, max = 100, message = "Contract number is required"))]
    pub contract_number: String,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: String,
    pub vendor_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub value: Option<Decimal>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateContract {
    #[validate(length(min = 1, max = 100, message = "Contract number is required"))]
    pub contract_number: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Title is required"))]
    pub title: Option<String>,
    pub vendor_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub value: Option<Decimal>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct ContractQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub vendor_id: Option<i32>,
    /// Contracts ending within this many days (already ended ones included)
    pub expiring_within_days: Option<i32>,
}

/// Registered internet domain
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Domain {
    pub id: i32,
    pub domain_name: String,
    pub registrar: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub auto_renew: bool,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateDomain {
    #[validate(length(min = 3, max = 253, message = "Domain name is required"))]
    pub domain_name: String,
    pub registrar: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub auto_renew: Option<bool>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDomain {
    #[validate(length(min = 3, max = 253, message = "Domain name is required"))]
    pub domain_name: Option<String>,
    pub registrar: Option<String>,
    pub registration_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub auto_renew: Option<bool>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct DomainQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub auto_renew: Option<bool>,
    pub expiring_within_days: Option<i32>,
}

/// Software license pool
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareLicense {
    pub id: i32,
    pub software_name: String,
    pub license_key: Option<String>,
    pub vendor_id: Option<i32>,
    pub seats_total: i32,
    pub seats_used: i32,
    pub purchase_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    pub status: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateSoftwareLicense {
    #[validate(length(min = 1, max = 255, message = "Software name is required"))]
    pub software_name: String,
    pub license_key: Option<String>,
    pub vendor_id: Option<i32>,
    #[validate(range(min = 0, message = "Seat count cannot be negative"))]
    pub seats_total: Option<i32>,
    #[validate(range(min = 0, message = "Seat count cannot be negative"))]
    pub seats_used: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateSoftwareLicense {
    #[validate(length(min = 1, max = 255, message = "Software name is required"))]
    pub software_name: Option<String>,
    pub license_key: Option<String>,
    pub vendor_id: Option<i32>,
    #[validate(range(min = 0, message = "Seat count cannot be negative"))]
    pub seats_total: Option<i32>,
    #[validate(range(min = 0, message = "Seat count cannot be negative"))]
    pub seats_used: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub expiry_date: Option<NaiveDate>,
    pub cost: Option<Decimal>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct SoftwareLicenseQuery {
    pub search: Option<String>,
    pub status: Option<String>,
    pub vendor_id: Option<i32>,
    pub expiring_within_days: Option<i32>,
}
