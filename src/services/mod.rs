//! Business logic services

pub mod borrow_requests;
pub mod maintenance;
pub mod resources;
pub mod settings;
pub mod transitions;

use crate::{config::PaginationConfig, repository::Repository};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub resources: resources::ResourcesService,
    pub transitions: transitions::TransitionsService,
    pub borrow_requests: borrow_requests::BorrowRequestsService,
    pub maintenance: maintenance::MaintenanceService,
    pub settings: settings::SettingsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self {
            resources: resources::ResourcesService::new(repository.clone(), pagination),
            transitions: transitions::TransitionsService::new(repository.clone()),
            borrow_requests: borrow_requests::BorrowRequestsService::new(repository.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone(), pagination),
            settings: settings::SettingsService::new(repository.clone()),
            repository,
        }
    }

    /// Checks that the database answers
    pub async fn ready(&self) -> crate::error::AppResult<()> {
        self.repository.ping().await
    }
}

/// Current calendar day (UTC), the default for optional workflow dates
pub(crate) fn today() -> chrono::NaiveDate {
    chrono::Utc::now().date_naive()
}
