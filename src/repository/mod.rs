//! Repository layer for database operations

pub mod borrow_requests;
pub mod changeset;
pub mod maintenance;
pub mod query;
pub mod registry;
pub mod resources;
pub mod settings;
pub mod sql;
pub mod transitions;
pub mod workflow;

use sqlx::{Pool, Postgres};

/// Main repository struct holding the injected database pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub resources: resources::ResourcesRepository,
    pub transitions: transitions::TransitionsRepository,
    pub borrow_requests: borrow_requests::BorrowRequestsRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub settings: settings::SettingsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            resources: resources::ResourcesRepository::new(pool.clone()),
            transitions: transitions::TransitionsRepository::new(pool.clone()),
            borrow_requests: borrow_requests::BorrowRequestsRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            settings: settings::SettingsRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database, used by the readiness check
    pub async fn ping(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
