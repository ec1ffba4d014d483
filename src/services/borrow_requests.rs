//! Borrow request service

use validator::Validate;

use super::today;
use crate::{
    error::AppResult,
    models::borrow_request::{
        ApproveBorrowRequest, BorrowRequest, BorrowRequestEvent, CreateBorrowRequest,
    },
    repository::{borrow_requests::BorrowDecision, Repository},
};

#[derive(Clone)]
pub struct BorrowRequestsService {
    repository: Repository,
}

impl BorrowRequestsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn submit(&self, requester: i32, data: CreateBorrowRequest) -> AppResult<BorrowRequest> {
        data.validate()?;
        data.check_dates()?;
        self.repository.borrow_requests.submit(requester, data).await
    }

    /// Approves (checking the target out to the requester) or rejects
    pub async fn decide(
        &self,
        id: i32,
        approver: i32,
        decision: ApproveBorrowRequest,
    ) -> AppResult<BorrowDecision> {
        self.repository
            .borrow_requests
            .decide(
                id,
                approver,
                decision.approved,
                decision.rejection_reason,
                today(),
            )
            .await
    }

    pub async fn events(&self, id: i32) -> AppResult<Vec<BorrowRequestEvent>> {
        self.repository.borrow_requests.events(id).await
    }
}
