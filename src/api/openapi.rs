//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{borrow_requests, health, maintenance, settings, transitions};

/// Registers the bearer JWT scheme referenced by the secured paths
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "AssetDesk API",
        version = "1.0.0",
        description = "IT asset management REST API"
    ),
    servers(
        (url = "/api/v1", description = "API v1")
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Transitions
        transitions::checkout,
        transitions::checkin,
        transitions::change_status,
        // Borrow requests
        borrow_requests::create_borrow_request,
        borrow_requests::approve_borrow_request,
        borrow_requests::list_events,
        // Maintenance
        maintenance::complete_maintenance,
        maintenance::list_logs,
        // Settings
        settings::get_settings,
        settings::update_settings,
    ),
    components(
        schemas(
            // Inventory
            crate::models::asset::Asset,
            crate::models::asset::CreateAsset,
            crate::models::asset::UpdateAsset,
            crate::models::equipment::Equipment,
            crate::models::equipment::Computer,
            crate::models::equipment::Monitor,
            crate::models::equipment::Printer,
            crate::models::equipment::NetworkDevice,
            crate::models::agreement::Contract,
            crate::models::agreement::Domain,
            crate::models::agreement::SoftwareLicense,
            crate::models::cartridge::Cartridge,
            crate::models::lookup::Vendor,
            crate::models::lookup::Location,
            crate::models::lookup::Category,
            crate::models::lookup::ProblemType,
            crate::models::enums::ResourceStatus,
            crate::models::enums::ResourceKind,
            crate::models::enums::EquipmentKind,
            crate::models::enums::TransitionAction,
            crate::models::enums::BorrowEventAction,
            crate::models::enums::BorrowStatus,
            crate::models::pagination::Pagination,
            // Transitions
            crate::models::transaction::TransactionRecord,
            crate::models::transaction::CheckoutRequest,
            crate::models::transaction::CheckinRequest,
            crate::models::transaction::StatusChangeRequest,
            crate::models::transaction::TransitionOutcome,
            // Borrow requests
            crate::models::borrow_request::BorrowRequest,
            crate::models::borrow_request::BorrowTarget,
            crate::models::borrow_request::BorrowRequestEvent,
            crate::models::borrow_request::CreateBorrowRequest,
            crate::models::borrow_request::ApproveBorrowRequest,
            crate::repository::borrow_requests::BorrowDecision,
            // Maintenance
            crate::models::maintenance::MaintenanceSchedule,
            crate::models::maintenance::MaintenanceLog,
            crate::models::maintenance::CompleteMaintenance,
            crate::models::maintenance::MaintenanceCompletion,
            // Settings
            crate::models::settings::SettingsMap,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "transitions", description = "Check-out, check-in and status changes"),
        (name = "borrow-requests", description = "Equipment borrow requests"),
        (name = "maintenance", description = "Preventive maintenance"),
        (name = "settings", description = "System settings")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_document_lists_workflow_paths() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/{collection}/{id}/checkout"));
        assert!(doc.paths.paths.contains_key("/borrow-requests/{id}/approve"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
