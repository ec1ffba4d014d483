//! Asset model

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::ResourceStatus;

/// Tracked hardware asset. Soft-deleted through `deleted_at`.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Asset {
    pub id: i32,
    /// Inventory tag, unique across assets
    pub asset_tag: String,
    pub name: String,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub vendor_id: Option<i32>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    /// Changed only through check-out, check-in and status-change workflows
    pub status: ResourceStatus,
    /// User the asset is currently assigned to
    pub assigned_to: Option<i32>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_cost: Option<Decimal>,
    pub warranty_expiry: Option<NaiveDate>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// Create asset request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateAsset {
    #[validate(length(min = 1, max = 64, message = "Asset tag is required"))]
    pub asset_tag: String,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub vendor_id: Option<i32>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_cost: Option<Decimal>,
    pub warranty_expiry: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Update asset request. Status changes go through the transition endpoints.
#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAsset {
    #[validate(length(min = 1, max = 64, message = "Asset tag is required"))]
    pub asset_tag: Option<String>,
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: Option<String>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub vendor_id: Option<i32>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub purchase_date: Option<NaiveDate>,
    pub purchase_cost: Option<Decimal>,
    pub warranty_expiry: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Asset list filters
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct AssetQuery {
    /// Matches name, tag, serial number or model
    pub search: Option<String>,
    pub status: Option<ResourceStatus>,
    pub category_id: Option<i32>,
    pub location_id: Option<i32>,
    pub vendor_id: Option<i32>,
    pub assigned_to: Option<i32>,
}
