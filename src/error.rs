//! Error types for AssetDesk server

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use validator::ValidationErrors;

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Authorization failed: {0}")]
    Authorization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    /// A unique constraint rejected the write
    #[error("Duplicate: {0}")]
    Duplicate(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

/// Error payload inside the failure envelope
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorBody {
    pub message: String,
}

/// Failure envelope: `{ success: false, error: { message }, status }`
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: ErrorBody,
    pub status: u16,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Authentication(_) => StatusCode::UNAUTHORIZED,
            AppError::Authorization(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Validation(_) | AppError::Duplicate(_) | AppError::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::Database(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message exposed to the caller. Server-side failures stay generic.
    fn public_message(&self) -> String {
        match self {
            AppError::Authentication(msg)
            | AppError::Authorization(msg)
            | AppError::NotFound(msg)
            | AppError::Validation(msg)
            | AppError::Duplicate(msg)
            | AppError::BadRequest(msg) => msg.clone(),
            AppError::Database(_) => "Database error".to_string(),
            AppError::Internal(_) => "Internal server error".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Database(e) => tracing::error!("Database error: {:?}", e),
            AppError::Internal(msg) => tracing::error!("Internal error: {}", msg),
            _ => {}
        }

        let status = self.status_code();
        let body = Json(ErrorResponse {
            success: false,
            error: ErrorBody {
                message: self.public_message(),
            },
            status: status.as_u16(),
        });

        (status, body).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return AppError::Duplicate(duplicate_message(db_err.constraint()).to_string());
            }
            if db_err.is_foreign_key_violation() {
                return AppError::BadRequest(
                    "Referenced record does not exist or is still in use".to_string(),
                );
            }
            if db_err.is_check_violation() {
                return AppError::Validation(format!(
                    "Value rejected by constraint {}",
                    db_err.constraint().unwrap_or("check")
                ));
            }
        }
        AppError::Database(err)
    }
}

/// Human readable message for a unique constraint, keyed by the constraint
/// names declared in the migrations.
pub fn duplicate_message(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("vendors_name_key") => "Vendor name already exists",
        Some("categories_name_key") => "Category name already exists",
        Some("locations_name_key") => "Location name already exists",
        Some("problem_types_name_key") => "Problem type name already exists",
        Some("contracts_contract_number_key") => "Contract number already exists",
        Some("domains_domain_name_key") => "Domain name already exists",
        Some("assets_asset_tag_key") => "Asset tag already exists",
        Some("borrow_request_events_one_decision") => "Borrow request has already been decided",
        _ => "A record with the same unique value already exists",
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<(String, String)> = errors
            .field_errors()
            .into_iter()
            .filter_map(|(field, errs)| {
                errs.first().map(|e| {
                    let message = e
                        .message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| format!("Invalid value for field '{}'", field));
                    (field.to_string(), message)
                })
            })
            .collect();
        // HashMap order is arbitrary; keep the reported error stable
        fields.sort();

        let message = fields
            .into_iter()
            .next()
            .map(|(_, message)| message)
            .unwrap_or_else(|| "Invalid request body".to_string());
        AppError::Validation(message)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(_: PathRejection) -> Self {
        AppError::BadRequest("Invalid ID".to_string())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;
