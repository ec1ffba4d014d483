//! Borrow request workflows.
//!
//! Request rows are never updated. Submission and decisions append to
//! `borrow_request_events`; the current status is read from the
//! `borrow_request_status` view.

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{PgConnection, Pool, Postgres};

use super::{
    resources::not_found,
    transitions::{self, CheckOut},
    workflow::{self, Workflow},
};
use crate::{
    error::{AppError, AppResult},
    models::{
        borrow_request::{BorrowRequest, BorrowRequestEvent, CreateBorrowRequest},
        enums::{BorrowEventAction, BorrowStatus, ResourceKind},
        transaction::TransactionRecord,
    },
};

/// Outcome of approving or rejecting a request
#[derive(Debug, Clone, serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BorrowDecision {
    pub request: BorrowRequest,
    /// Check-out record written on approval
    pub transaction: Option<TransactionRecord>,
}

#[derive(Clone)]
pub struct BorrowRequestsRepository {
    pool: Pool<Postgres>,
}

impl BorrowRequestsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn submit(&self, requester: i32, data: CreateBorrowRequest) -> AppResult<BorrowRequest> {
        workflow::execute(&self.pool, SubmitBorrowRequest { requester, data }).await
    }

    pub async fn decide(
        &self,
        id: i32,
        approver: i32,
        approved: bool,
        reason: Option<String>,
        today: NaiveDate,
    ) -> AppResult<BorrowDecision> {
        workflow::execute(
            &self.pool,
            DecideBorrowRequest {
                id,
                approver,
                approved,
                reason,
                today,
            },
        )
        .await
    }

    /// Full event history of a request, oldest first
    pub async fn events(&self, id: i32) -> AppResult<Vec<BorrowRequestEvent>> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM borrow_requests WHERE id = $1)")
                .bind(id)
                .fetch_one(&self.pool)
                .await?;
        if !exists {
            return Err(not_found("Borrow request"));
        }

        let events = sqlx::query_as::<_, BorrowRequestEvent>(
            "SELECT * FROM borrow_request_events WHERE request_id = $1 ORDER BY created_at, id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;
        Ok(events)
    }
}

async fn fetch_request(conn: &mut PgConnection, id: i32) -> AppResult<BorrowRequest> {
    sqlx::query_as::<_, BorrowRequest>("SELECT * FROM borrow_request_status WHERE id = $1")
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?
        .ok_or_else(|| not_found("Borrow request"))
}

async fn append_event(
    conn: &mut PgConnection,
    request_id: i32,
    action: BorrowEventAction,
    actor: i32,
    reason: Option<String>,
) -> AppResult<()> {
    sqlx::query(
        "INSERT INTO borrow_request_events (request_id, action, actor_id, reason) VALUES ($1, $2, $3, $4)",
    )
    .bind(request_id)
    .bind(action)
    .bind(actor)
    .bind(reason)
    .execute(&mut *conn)
    .await?;
    Ok(())
}

struct SubmitBorrowRequest {
    requester: i32,
    data: CreateBorrowRequest,
}

#[async_trait]
impl Workflow for SubmitBorrowRequest {
    type Output = BorrowRequest;
    const NAME: &'static str = "submit_borrow_request";

    async fn run(self, conn: &mut PgConnection) -> AppResult<BorrowRequest> {
        let target = self.data.target;
        let kind = ResourceKind::from(target.kind);

        transitions::ensure_exists(conn, kind, target.resource_id).await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO borrow_requests
                (requester_id, target_kind, target_id, purpose, requested_from, requested_until, location_id)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(self.requester)
        .bind(target.kind)
        .bind(target.resource_id)
        .bind(self.data.purpose)
        .bind(self.data.requested_from)
        .bind(self.data.requested_until)
        .bind(self.data.location_id)
        .fetch_one(&mut *conn)
        .await?;

        append_event(conn, id, BorrowEventAction::Submitted, self.requester, None).await?;

        tracing::info!(id, kind = %target.kind, target = target.resource_id, "borrow request submitted");
        fetch_request(conn, id).await
    }
}

struct DecideBorrowRequest {
    id: i32,
    approver: i32,
    approved: bool,
    reason: Option<String>,
    today: NaiveDate,
}

#[async_trait]
impl Workflow for DecideBorrowRequest {
    type Output = BorrowDecision;
    const NAME: &'static str = "decide_borrow_request";

    async fn run(self, conn: &mut PgConnection) -> AppResult<BorrowDecision> {
        // Serializes concurrent decisions on the same request
        let locked: Option<i32> =
            sqlx::query_scalar("SELECT id FROM borrow_requests WHERE id = $1 FOR UPDATE")
                .bind(self.id)
                .fetch_optional(&mut *conn)
                .await?;
        if locked.is_none() {
            return Err(not_found("Borrow request"));
        }

        let request = fetch_request(conn, self.id).await?;
        if request.status != BorrowStatus::Pending {
            return Err(AppError::BadRequest(format!(
                "Borrow request is not pending (current status: {})",
                request.status
            )));
        }

        let (action, reason) = if self.approved {
            (BorrowEventAction::Approved, None)
        } else {
            (BorrowEventAction::Rejected, self.reason)
        };
        append_event(conn, self.id, action, self.approver, reason).await?;

        let transaction = if self.approved {
            let outcome = transitions::check_out(
                conn,
                CheckOut {
                    kind: request.target_kind.into(),
                    id: request.target_id,
                    assigned_to: request.requester_id,
                    location_id: request.location_id,
                    checkout_date: request.requested_from.unwrap_or(self.today),
                    expected_return_date: request.requested_until,
                    purpose: request.purpose.clone(),
                    borrow_request_id: Some(request.id),
                    actor: self.approver,
                },
            )
            .await?;
            Some(outcome.transaction)
        } else {
            None
        };

        tracing::info!(id = self.id, approved = self.approved, "borrow request decided");

        Ok(BorrowDecision {
            request: fetch_request(conn, self.id).await?,
            transaction,
        })
    }
}
