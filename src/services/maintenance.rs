//! Maintenance service

use rust_decimal::Decimal;

use super::today;
use crate::{
    config::PaginationConfig,
    error::{AppError, AppResult},
    models::{
        maintenance::{CompleteMaintenance, MaintenanceCompletion, MaintenanceLog},
        pagination::{Page, PageParams, PageRequest},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
    pagination: PaginationConfig,
}

impl MaintenanceService {
    pub fn new(repository: Repository, pagination: PaginationConfig) -> Self {
        Self {
            repository,
            pagination,
        }
    }

    pub async fn complete(
        &self,
        schedule_id: i32,
        data: CompleteMaintenance,
        actor: i32,
    ) -> AppResult<MaintenanceCompletion> {
        if data.cost.is_some_and(|cost| cost < Decimal::ZERO) {
            return Err(AppError::Validation("Cost cannot be negative".to_string()));
        }
        let performed_on = data.performed_on.unwrap_or_else(today);
        self.repository
            .maintenance
            .complete(schedule_id, data, performed_on, actor)
            .await
    }

    pub async fn logs(&self, schedule_id: i32, page: &PageParams) -> AppResult<Page<MaintenanceLog>> {
        let page = PageRequest::resolve(page, &self.pagination);
        self.repository.maintenance.logs(schedule_id, page).await
    }
}
