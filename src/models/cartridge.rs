//! Printer cartridge / consumable stock

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cartridge {
    pub id: i32,
    pub name: String,
    pub model: Option<String>,
    pub color: Option<String>,
    pub compatible_printer: Option<String>,
    pub quantity: i32,
    /// Stock at or below this level counts as low
    pub reorder_level: i32,
    pub location_id: Option<i32>,
    pub unit_cost: Option<Decimal>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCartridge {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub model: Option<String>,
    pub color: Option<String>,
    pub compatible_printer: Option<String>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: Option<i32>,
    pub location_id: Option<i32>,
    pub unit_cost: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartridge {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: Option<String>,
    pub model: Option<String>,
    pub color: Option<String>,
    pub compatible_printer: Option<String>,
    #[validate(range(min = 0, message = "Quantity cannot be negative"))]
    pub quantity: Option<i32>,
    #[validate(range(min = 0, message = "Reorder level cannot be negative"))]
    pub reorder_level: Option<i32>,
    pub location_id: Option<i32>,
    pub unit_cost: Option<Decimal>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct CartridgeQuery {
    pub search: Option<String>,
    pub location_id: Option<i32>,
    /// Only cartridges whose quantity is at or below their reorder level
    pub low_stock: Option<bool>,
}
