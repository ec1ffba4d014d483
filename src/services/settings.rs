//! Settings service

use crate::{error::AppResult, models::settings::SettingsMap, repository::Repository};

#[derive(Clone)]
pub struct SettingsService {
    repository: Repository,
}

impl SettingsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn get_settings(&self) -> AppResult<SettingsMap> {
        self.repository.settings.get_all().await
    }

    pub async fn update_settings(&self, settings: SettingsMap, actor: i32) -> AppResult<SettingsMap> {
        settings.validate_keys()?;
        self.repository.settings.update(settings, actor).await
    }
}
