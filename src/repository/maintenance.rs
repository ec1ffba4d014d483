//! Maintenance completion and log history

use async_trait::async_trait;
use sqlx::{PgConnection, Pool, Postgres};

use super::{
    query::{FilterSet, ListQuery},
    resources::not_found,
    workflow::{self, Workflow},
};
use crate::{
    error::{AppError, AppResult},
    models::{
        maintenance::{
            next_due_after, CompleteMaintenance, MaintenanceCompletion, MaintenanceLog,
            MaintenanceSchedule,
        },
        pagination::{Page, PageRequest},
    },
};

#[derive(Clone)]
pub struct MaintenanceRepository {
    pool: Pool<Postgres>,
}

impl MaintenanceRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn complete(
        &self,
        schedule_id: i32,
        data: CompleteMaintenance,
        performed_on: chrono::NaiveDate,
        actor: i32,
    ) -> AppResult<MaintenanceCompletion> {
        workflow::execute(
            &self.pool,
            CompleteSchedule {
                schedule_id,
                data,
                performed_on,
                actor,
            },
        )
        .await
    }

    /// Completed occurrences of a schedule, most recent first
    pub async fn logs(&self, schedule_id: i32, page: PageRequest) -> AppResult<Page<MaintenanceLog>> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM maintenance_schedules WHERE id = $1)")
                .bind(schedule_id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(not_found("Maintenance schedule"));
        }

        ListQuery::new(
            "maintenance_logs",
            FilterSet::new().equals("schedule_id", schedule_id),
            "performed_on DESC, id DESC",
            page,
        )
        .fetch_page(&self.pool)
        .await
    }
}

/// Appends a log row and moves the schedule to its next occurrence
struct CompleteSchedule {
    schedule_id: i32,
    data: CompleteMaintenance,
    performed_on: chrono::NaiveDate,
    actor: i32,
}

#[async_trait]
impl Workflow for CompleteSchedule {
    type Output = MaintenanceCompletion;
    const NAME: &'static str = "complete_maintenance";

    async fn run(self, conn: &mut PgConnection) -> AppResult<MaintenanceCompletion> {
        let schedule = sqlx::query_as::<_, MaintenanceSchedule>(
            "SELECT * FROM maintenance_schedules WHERE id = $1 FOR UPDATE",
        )
        .bind(self.schedule_id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found("Maintenance schedule"))?;

        if !schedule.active {
            return Err(AppError::BadRequest(
                "Maintenance schedule is inactive".to_string(),
            ));
        }

        let next_due = next_due_after(self.performed_on, schedule.interval_days)?;

        let log = sqlx::query_as::<_, MaintenanceLog>(
            r#"
            INSERT INTO maintenance_logs (schedule_id, performed_on, performed_by, cost, notes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(schedule.id)
        .bind(self.performed_on)
        .bind(self.actor)
        .bind(self.data.cost)
        .bind(self.data.notes)
        .fetch_one(&mut *conn)
        .await?;

        let schedule = sqlx::query_as::<_, MaintenanceSchedule>(
            r#"
            UPDATE maintenance_schedules
            SET next_due_date = $1, last_completed_date = $2, updated_at = NOW(), updated_by = $3
            WHERE id = $4
            RETURNING *
            "#,
        )
        .bind(next_due)
        .bind(self.performed_on)
        .bind(self.actor)
        .bind(schedule.id)
        .fetch_one(&mut *conn)
        .await?;

        tracing::info!(
            schedule_id = schedule.id,
            next_due = %schedule.next_due_date,
            "maintenance completed"
        );

        Ok(MaintenanceCompletion { schedule, log })
    }
}
