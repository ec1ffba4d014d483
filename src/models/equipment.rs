//! Equipment-family models: generic equipment, computers, monitors,
//! printers and network devices.
//!
//! All five share the trackable columns (status, assignee, location) and
//! differ only in their descriptive fields.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::enums::ResourceStatus;

/// Generic equipment (projectors, cameras, docking stations...)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: i32,
    pub name: String,
    pub equipment_type: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub status: ResourceStatus,
    pub location_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEquipment {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub equipment_type: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEquipment {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: Option<String>,
    pub equipment_type: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

/// Workstation or laptop
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Computer {
    pub id: i32,
    pub name: String,
    pub hostname: Option<String>,
    pub operating_system: Option<String>,
    pub cpu: Option<String>,
    pub ram_gb: Option<i32>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub status: ResourceStatus,
    pub location_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateComputer {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub hostname: Option<String>,
    pub operating_system: Option<String>,
    pub cpu: Option<String>,
    #[validate(range(min = 0, message = "RAM cannot be negative"))]
    pub ram_gb: Option<i32>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateComputer {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: Option<String>,
    pub hostname: Option<String>,
    pub operating_system: Option<String>,
    pub cpu: Option<String>,
    #[validate(range(min = 0, message = "RAM cannot be negative"))]
    pub ram_gb: Option<i32>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Monitor {
    pub id: i32,
    pub name: String,
    /// Diagonal in inches
    pub size_inches: Option<Decimal>,
    pub resolution: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub status: ResourceStatus,
    pub location_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMonitor {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub size_inches: Option<Decimal>,
    pub resolution: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMonitor {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: Option<String>,
    pub size_inches: Option<Decimal>,
    pub resolution: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Printer {
    pub id: i32,
    pub name: String,
    /// laser, inkjet, label...
    pub printer_type: Option<String>,
    pub ip_address: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub status: ResourceStatus,
    pub location_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePrinter {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub printer_type: Option<String>,
    pub ip_address: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePrinter {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: Option<String>,
    pub printer_type: Option<String>,
    pub ip_address: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

/// Switch, router, access point, firewall
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NetworkDevice {
    pub id: i32,
    pub name: String,
    pub device_type: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub status: ResourceStatus,
    pub location_id: Option<i32>,
    pub assigned_to: Option<i32>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: Option<i32>,
    pub updated_by: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateNetworkDevice {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: String,
    pub device_type: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateNetworkDevice {
    #[validate(length(min = 1, max = 255, message = "Name is required"))]
    pub name: Option<String>,
    pub device_type: Option<String>,
    pub ip_address: Option<String>,
    pub mac_address: Option<String>,
    pub serial_number: Option<String>,
    pub model: Option<String>,
    pub location_id: Option<i32>,
    pub notes: Option<String>,
}

/// List filters shared by every equipment kind
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct InventoryQuery {
    pub search: Option<String>,
    pub status: Option<ResourceStatus>,
    pub location_id: Option<i32>,
    pub assigned_to: Option<i32>,
}
