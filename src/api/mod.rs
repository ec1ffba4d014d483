//! API handlers for AssetDesk REST endpoints

pub mod borrow_requests;
pub mod health;
pub mod maintenance;
pub mod openapi;
pub mod resources;
pub mod settings;
pub mod transitions;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    error::AppError,
    models::{
        agreement::{Contract, Domain, SoftwareLicense},
        asset::Asset,
        borrow_request::BorrowRequest,
        cartridge::Cartridge,
        enums::ResourceKind,
        equipment::{Computer, Equipment, Monitor, NetworkDevice, Printer},
        lookup::{Category, Location, ProblemType, Vendor},
        maintenance::MaintenanceSchedule,
        transaction::TransactionRecord,
        user::UserClaims,
    },
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Authentication("Invalid authorization header format".to_string())
        })?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Success envelope: `{ success: true, data, message? }`
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            message: None,
        })
    }

    pub fn with_message(data: T, message: impl Into<String>) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            message: Some(message.into()),
        })
    }
}

/// API v1 routes, without the `/api/v1` prefix
fn api_routes() -> Router<AppState> {
    let router = Router::new()
        // Health
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        // Borrow requests
        .route("/borrow-requests", post(borrow_requests::create_borrow_request))
        .route("/borrow-requests/:id/events", get(borrow_requests::list_events))
        .route("/borrow-requests/:id/approve", post(borrow_requests::approve_borrow_request))
        // Maintenance
        .route("/maintenance-schedules/:id/complete", post(maintenance::complete_maintenance))
        .route("/maintenance-schedules/:id/logs", get(maintenance::list_logs))
        // Settings
        .route("/settings", get(settings::get_settings).put(settings::update_settings));

    // Trackable resources: check-out, check-in, status change
    let router = ResourceKind::ALL.iter().fold(router, |router, kind| {
        let base = format!("/{}/:id", kind.collection());
        router
            .route(&format!("{}/checkout", base), post(transitions::checkout))
            .route(&format!("{}/checkin", base), post(transitions::checkin))
            .route(&format!("{}/status", base), post(transitions::change_status))
    });

    // Generic list / get / create / update / delete
    let router = resources::crud::<Asset>(router, "/assets");
    let router = resources::crud::<Equipment>(router, "/equipment");
    let router = resources::crud::<Computer>(router, "/computers");
    let router = resources::crud::<Monitor>(router, "/monitors");
    let router = resources::crud::<Printer>(router, "/printers");
    let router = resources::crud::<NetworkDevice>(router, "/network-devices");
    let router = resources::crud::<Contract>(router, "/contracts");
    let router = resources::crud::<Domain>(router, "/domains");
    let router = resources::crud::<SoftwareLicense>(router, "/software-licenses");
    let router = resources::crud::<Cartridge>(router, "/cartridges");
    let router = resources::crud::<Vendor>(router, "/vendors");
    let router = resources::crud::<Location>(router, "/locations");
    let router = resources::crud::<Category>(router, "/categories");
    let router = resources::crud::<ProblemType>(router, "/problem-types");
    let router = resources::crud::<MaintenanceSchedule>(router, "/maintenance-schedules");
    let router = resources::read_only::<TransactionRecord>(router, "/transactions");
    resources::read_only::<BorrowRequest>(router, "/borrow-requests")
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", api_routes().with_state(state))
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
