//! System settings storage

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use super::workflow::{self, Workflow};
use crate::{
    error::AppResult,
    models::settings::{Setting, SettingsMap},
};

#[derive(Clone)]
pub struct SettingsRepository {
    pool: Pool<Postgres>,
}

impl SettingsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn get_all(&self) -> AppResult<SettingsMap> {
        let rows = sqlx::query_as::<_, Setting>("SELECT * FROM system_settings ORDER BY key")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into())
    }

    /// Upserts every key, all or nothing
    pub async fn update(&self, settings: SettingsMap, actor: i32) -> AppResult<SettingsMap> {
        workflow::execute(&self.pool, UpdateSettings { settings, actor }).await
    }
}

struct UpdateSettings {
    settings: SettingsMap,
    actor: i32,
}

#[async_trait]
impl Workflow for UpdateSettings {
    type Output = SettingsMap;
    const NAME: &'static str = "update_settings";

    async fn run(self, conn: &mut PgConnection) -> AppResult<SettingsMap> {
        for (key, value) in self.settings.0 {
            sqlx::query(
                r#"
                INSERT INTO system_settings (key, value, updated_at, updated_by)
                VALUES ($1, $2, NOW(), $3)
                ON CONFLICT (key) DO UPDATE
                SET value = EXCLUDED.value, updated_at = NOW(), updated_by = EXCLUDED.updated_by
                "#,
            )
            .bind(key)
            .bind(value)
            .bind(self.actor)
            .execute(&mut *conn)
            .await?;
        }

        let rows = sqlx::query_as::<_, Setting>("SELECT * FROM system_settings ORDER BY key")
            .fetch_all(&mut *conn)
            .await?;
        Ok(rows.into())
    }
}
