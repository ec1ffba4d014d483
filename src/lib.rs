//! AssetDesk IT asset management server
//!
//! REST JSON API over PostgreSQL for tracking hardware, agreements and
//! consumables, with check-out / check-in, borrow requests and preventive
//! maintenance workflows.

use std::sync::Arc;

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod repository;
pub mod services;

pub use config::AppConfig;
pub use error::{AppError, AppResult};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Arc<services::Services>,
}
