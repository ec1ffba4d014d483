//! Status transitions of trackable resources.
//!
//! Check-out and check-in are a single conditional `UPDATE` whose `WHERE`
//! clause carries the expected status, so only one concurrent caller can win.
//! When no row matches, the row is re-read to tell "absent" from "wrong
//! status". Every successful transition appends a `transactions` row inside
//! the same database transaction.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use super::{
    resources::not_found,
    workflow::{self, Workflow},
};
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::{ResourceKind, ResourceStatus, TransitionAction},
        transaction::{TransactionRecord, TransitionOutcome},
    },
};

/// Resolved check-out parameters
#[derive(Debug, Clone)]
pub struct CheckOut {
    pub kind: ResourceKind,
    pub id: i32,
    pub assigned_to: i32,
    pub location_id: Option<i32>,
    pub checkout_date: NaiveDate,
    pub expected_return_date: Option<NaiveDate>,
    pub purpose: Option<String>,
    pub borrow_request_id: Option<i32>,
    pub actor: i32,
}

/// Resolved check-in parameters
#[derive(Debug, Clone)]
pub struct CheckIn {
    pub kind: ResourceKind,
    pub id: i32,
    pub return_date: NaiveDate,
    pub return_location: Option<i32>,
    pub notes: Option<String>,
    pub actor: i32,
}

/// Manual move between `Available`, `In Repair`, `Retired` and `Lost`
#[derive(Debug, Clone)]
pub struct ChangeStatus {
    pub kind: ResourceKind,
    pub id: i32,
    pub status: ResourceStatus,
    pub notes: Option<String>,
    pub actor: i32,
}

#[derive(Clone)]
pub struct TransitionsRepository {
    pool: Pool<Postgres>,
}

impl TransitionsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn check_out(&self, request: CheckOut) -> AppResult<TransitionOutcome> {
        workflow::execute(&self.pool, request).await
    }

    pub async fn check_in(&self, request: CheckIn) -> AppResult<TransitionOutcome> {
        workflow::execute(&self.pool, request).await
    }

    pub async fn change_status(&self, request: ChangeStatus) -> AppResult<TransitionOutcome> {
        workflow::execute(&self.pool, request).await
    }
}

#[async_trait]
impl Workflow for CheckOut {
    type Output = TransitionOutcome;
    const NAME: &'static str = "check_out";

    async fn run(self, conn: &mut PgConnection) -> AppResult<TransitionOutcome> {
        check_out(conn, self).await
    }
}

/// Check-out steps, shared with borrow-request approval
pub(crate) async fn check_out(
    conn: &mut PgConnection,
    request: CheckOut,
) -> AppResult<TransitionOutcome> {
    let sql = checkout_sql(request.kind);
    let updated: Option<i32> = sqlx::query_scalar(&sql)
        .bind(ResourceStatus::InUse)
        .bind(request.assigned_to)
        .bind(request.location_id)
        .bind(request.actor)
        .bind(request.id)
        .bind(ResourceStatus::Available)
        .fetch_optional(&mut *conn)
        .await?;

    if updated.is_none() {
        return Err(explain_failure(conn, request.kind, request.id, "is not available").await);
    }

    let record = NewTransaction {
        kind: request.kind,
        id: request.id,
        action: TransitionAction::CheckOut,
        from_status: ResourceStatus::Available,
        to_status: ResourceStatus::InUse,
        assigned_to: Some(request.assigned_to),
        location_id: request.location_id,
        checkout_date: Some(request.checkout_date),
        expected_return_date: request.expected_return_date,
        return_date: None,
        purpose: request.purpose,
        notes: None,
        borrow_request_id: request.borrow_request_id,
        actor: request.actor,
    }
    .insert(conn)
    .await?;

    tracing::info!(
        kind = %request.kind,
        id = request.id,
        assigned_to = request.assigned_to,
        "checked out"
    );

    Ok(TransitionOutcome {
        resource_kind: request.kind,
        resource_id: request.id,
        status: ResourceStatus::InUse,
        assigned_to: Some(request.assigned_to),
        transaction: record,
    })
}

#[async_trait]
impl Workflow for CheckIn {
    type Output = TransitionOutcome;
    const NAME: &'static str = "check_in";

    async fn run(self, conn: &mut PgConnection) -> AppResult<TransitionOutcome> {
        let sql = checkin_sql(self.kind);
        let previous_assignee: Option<Option<i32>> = sqlx::query_scalar(&sql)
            .bind(ResourceStatus::Available)
            .bind(self.return_location)
            .bind(self.actor)
            .bind(self.id)
            .bind(ResourceStatus::InUse)
            .fetch_optional(&mut *conn)
            .await?;

        let Some(previous_assignee) = previous_assignee else {
            return Err(explain_failure(conn, self.kind, self.id, "is not checked out").await);
        };

        let record = NewTransaction {
            kind: self.kind,
            id: self.id,
            action: TransitionAction::CheckIn,
            from_status: ResourceStatus::InUse,
            to_status: ResourceStatus::Available,
            assigned_to: previous_assignee,
            location_id: self.return_location,
            checkout_date: None,
            expected_return_date: None,
            return_date: Some(self.return_date),
            purpose: None,
            notes: self.notes,
            borrow_request_id: None,
            actor: self.actor,
        }
        .insert(conn)
        .await?;

        tracing::info!(kind = %self.kind, id = self.id, "checked in");

        Ok(TransitionOutcome {
            resource_kind: self.kind,
            resource_id: self.id,
            status: ResourceStatus::Available,
            assigned_to: None,
            transaction: record,
        })
    }
}

#[async_trait]
impl Workflow for ChangeStatus {
    type Output = TransitionOutcome;
    const NAME: &'static str = "change_status";

    async fn run(self, conn: &mut PgConnection) -> AppResult<TransitionOutcome> {
        let current: ResourceStatus = sqlx::query_scalar(&lock_status_sql(self.kind))
            .bind(self.id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| not_found(self.kind.display_name()))?;

        if current == ResourceStatus::InUse {
            return Err(AppError::BadRequest(format!(
                "{} is checked out; check it in first (current status: {})",
                self.kind.display_name(),
                current
            )));
        }
        if current == self.status {
            return Err(AppError::BadRequest(format!(
                "{} is already {}",
                self.kind.display_name(),
                current
            )));
        }

        sqlx::query(&format!(
            "UPDATE {} SET status = $1, updated_at = NOW(), updated_by = $2 WHERE id = $3",
            self.kind.table()
        ))
        .bind(self.status)
        .bind(self.actor)
        .bind(self.id)
        .execute(&mut *conn)
        .await?;

        let record = NewTransaction {
            kind: self.kind,
            id: self.id,
            action: TransitionAction::StatusChange,
            from_status: current,
            to_status: self.status,
            assigned_to: None,
            location_id: None,
            checkout_date: None,
            expected_return_date: None,
            return_date: None,
            purpose: None,
            notes: self.notes,
            borrow_request_id: None,
            actor: self.actor,
        }
        .insert(conn)
        .await?;

        tracing::info!(kind = %self.kind, id = self.id, from = %current, to = %self.status, "status changed");

        Ok(TransitionOutcome {
            resource_kind: self.kind,
            resource_id: self.id,
            status: self.status,
            assigned_to: None,
            transaction: record,
        })
    }
}

/// Builds the error for a conditional update that matched no row
async fn explain_failure(
    conn: &mut PgConnection,
    kind: ResourceKind,
    id: i32,
    reason: &str,
) -> AppError {
    let current: Result<Option<ResourceStatus>, sqlx::Error> =
        sqlx::query_scalar(&current_status_sql(kind))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await;

    match current {
        Ok(None) => not_found(kind.display_name()),
        Ok(Some(status)) => AppError::BadRequest(format!(
            "{} {} (current status: {})",
            kind.display_name(),
            reason,
            status
        )),
        Err(err) => err.into(),
    }
}

/// 404 unless a live row of `kind` with this id exists
pub(crate) async fn ensure_exists(
    conn: &mut PgConnection,
    kind: ResourceKind,
    id: i32,
) -> AppResult<()> {
    let exists: bool = sqlx::query_scalar(&exists_sql(kind))
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    if exists {
        Ok(())
    } else {
        Err(not_found(kind.display_name()))
    }
}

fn exists_sql(kind: ResourceKind) -> String {
    format!(
        "SELECT EXISTS(SELECT 1 FROM {} WHERE id = $1{})",
        kind.table(),
        live_row_condition(kind)
    )
}

fn live_row_condition(kind: ResourceKind) -> &'static str {
    if kind.soft_deletes() {
        " AND deleted_at IS NULL"
    } else {
        ""
    }
}

/// Binds: new status, assignee, location (kept when NULL), actor, id,
/// expected status
fn checkout_sql(kind: ResourceKind) -> String {
    format!(
        "UPDATE {} SET status = $1, assigned_to = $2, location_id = COALESCE($3, location_id), \
         updated_at = NOW(), updated_by = $4 \
         WHERE id = $5 AND status = $6{} RETURNING id",
        kind.table(),
        live_row_condition(kind)
    )
}

/// Binds: new status, return location (kept when NULL), actor, id, expected
/// status. Returns the assignee before the update.
fn checkin_sql(kind: ResourceKind) -> String {
    let table = kind.table();
    format!(
        "WITH previous AS (SELECT id, assigned_to FROM {table} WHERE id = $4) \
         UPDATE {table} AS t SET status = $1, assigned_to = NULL, \
         location_id = COALESCE($2, t.location_id), updated_at = NOW(), updated_by = $3 \
         FROM previous WHERE t.id = previous.id AND t.status = $5{live} \
         RETURNING previous.assigned_to",
        table = table,
        live = live_row_condition(kind).replace("deleted_at", "t.deleted_at")
    )
}

fn current_status_sql(kind: ResourceKind) -> String {
    format!(
        "SELECT status FROM {} WHERE id = $1{}",
        kind.table(),
        live_row_condition(kind)
    )
}

fn lock_status_sql(kind: ResourceKind) -> String {
    format!("{} FOR UPDATE", current_status_sql(kind))
}

/// A `transactions` row about to be appended
struct NewTransaction {
    kind: ResourceKind,
    id: i32,
    action: TransitionAction,
    from_status: ResourceStatus,
    to_status: ResourceStatus,
    assigned_to: Option<i32>,
    location_id: Option<i32>,
    checkout_date: Option<NaiveDate>,
    expected_return_date: Option<NaiveDate>,
    return_date: Option<NaiveDate>,
    purpose: Option<String>,
    notes: Option<String>,
    borrow_request_id: Option<i32>,
    actor: i32,
}

impl NewTransaction {
    async fn insert(self, conn: &mut PgConnection) -> AppResult<TransactionRecord> {
        let record = sqlx::query_as::<_, TransactionRecord>(
            r#"
            INSERT INTO transactions (
                resource_kind, resource_id, action, from_status, to_status, assigned_to,
                location_id, checkout_date, expected_return_date, return_date, purpose, notes,
                borrow_request_id, performed_by
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            RETURNING *
            "#,
        )
        .bind(self.kind)
        .bind(self.id)
        .bind(self.action)
        .bind(self.from_status)
        .bind(self.to_status)
        .bind(self.assigned_to)
        .bind(self.location_id)
        .bind(self.checkout_date)
        .bind(self.expected_return_date)
        .bind(self.return_date)
        .bind(self.purpose)
        .bind(self.notes)
        .bind(self.borrow_request_id)
        .bind(self.actor)
        .fetch_one(&mut *conn)
        .await?;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checkout_is_one_guarded_statement() {
        assert_eq!(
            checkout_sql(ResourceKind::Asset),
            "UPDATE assets SET status = $1, assigned_to = $2, location_id = COALESCE($3, location_id), \
             updated_at = NOW(), updated_by = $4 \
             WHERE id = $5 AND status = $6 AND deleted_at IS NULL RETURNING id"
        );
        assert!(checkout_sql(ResourceKind::Printer).contains("WHERE id = $5 AND status = $6 RETURNING id"));
    }

    #[test]
    fn test_checkin_returns_previous_assignee() {
        let sql = checkin_sql(ResourceKind::Asset);
        assert!(sql.starts_with(
            "WITH previous AS (SELECT id, assigned_to FROM assets WHERE id = $4) UPDATE assets AS t"
        ));
        assert!(sql.contains("t.status = $5 AND t.deleted_at IS NULL"));
        assert!(sql.ends_with("RETURNING previous.assigned_to"));

        let sql = checkin_sql(ResourceKind::Monitor);
        assert!(sql.contains("FROM previous WHERE t.id = previous.id AND t.status = $5 RETURNING"));
    }

    #[test]
    fn test_status_reads_respect_soft_delete() {
        assert_eq!(
            current_status_sql(ResourceKind::Asset),
            "SELECT status FROM assets WHERE id = $1 AND deleted_at IS NULL"
        );
        assert_eq!(
            lock_status_sql(ResourceKind::NetworkDevice),
            "SELECT status FROM network_devices WHERE id = $1 FOR UPDATE"
        );
    }

    #[test]
    fn test_existence_check_skips_deleted_assets() {
        assert_eq!(
            exists_sql(ResourceKind::Asset),
            "SELECT EXISTS(SELECT 1 FROM assets WHERE id = $1 AND deleted_at IS NULL)"
        );
        assert_eq!(
            exists_sql(ResourceKind::Computer),
            "SELECT EXISTS(SELECT 1 FROM computers WHERE id = $1)"
        );
    }
}
