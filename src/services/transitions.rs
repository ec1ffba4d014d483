//! Check-out, check-in and status change service

use super::today;
use crate::{
    error::{AppError, AppResult},
    models::{
        enums::ResourceKind,
        transaction::{CheckinRequest, CheckoutRequest, StatusChangeRequest, TransitionOutcome},
    },
    repository::{
        transitions::{ChangeStatus, CheckIn, CheckOut},
        Repository,
    },
};

#[derive(Clone)]
pub struct TransitionsService {
    repository: Repository,
}

impl TransitionsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn check_out(
        &self,
        kind: ResourceKind,
        id: i32,
        request: CheckoutRequest,
        actor: i32,
    ) -> AppResult<TransitionOutcome> {
        let today = today();
        request.check_dates(today)?;

        self.repository
            .transitions
            .check_out(CheckOut {
                kind,
                id,
                assigned_to: request.assigned_to,
                location_id: Some(request.assigned_location),
                checkout_date: request.checkout_date.unwrap_or(today),
                expected_return_date: request.expected_return_date,
                purpose: request.purpose_reason,
                borrow_request_id: None,
                actor,
            })
            .await
    }

    pub async fn check_in(
        &self,
        kind: ResourceKind,
        id: i32,
        request: CheckinRequest,
        actor: i32,
    ) -> AppResult<TransitionOutcome> {
        self.repository
            .transitions
            .check_in(CheckIn {
                kind,
                id,
                return_date: request.return_date.unwrap_or_else(today),
                return_location: request.return_location,
                notes: request.notes,
                actor,
            })
            .await
    }

    pub async fn change_status(
        &self,
        kind: ResourceKind,
        id: i32,
        request: StatusChangeRequest,
        actor: i32,
    ) -> AppResult<TransitionOutcome> {
        if !request.status.is_manual_target() {
            return Err(AppError::Validation(
                "Use check-out to put a resource in use".to_string(),
            ));
        }

        self.repository
            .transitions
            .change_status(ChangeStatus {
                kind,
                id,
                status: request.status,
                notes: request.notes,
                actor,
            })
            .await
    }
}
