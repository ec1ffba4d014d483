//! Transactional workflow executor.
//!
//! A [`Workflow`] is a short sequence of dependent statements. [`execute`]
//! runs it on one pooled connection inside a single transaction: commit when
//! every step succeeded, roll back and return the step's error unchanged
//! otherwise. The connection goes back to the pool on every exit path.

use async_trait::async_trait;
use sqlx::{PgConnection, PgPool};

use crate::error::AppResult;

#[async_trait]
pub trait Workflow: Send {
    type Output: Send;

    /// Name used in logs
    const NAME: &'static str;

    async fn run(self, conn: &mut PgConnection) -> AppResult<Self::Output>;
}

pub async fn execute<W: Workflow>(pool: &PgPool, workflow: W) -> AppResult<W::Output> {
    let mut tx = pool.begin().await?;

    match workflow.run(&mut *tx).await {
        Ok(output) => {
            tx.commit().await?;
            tracing::debug!(workflow = W::NAME, "workflow committed");
            Ok(output)
        }
        Err(err) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::error!(workflow = W::NAME, "rollback failed: {:?}", rollback_err);
            }
            tracing::warn!(workflow = W::NAME, "workflow rolled back: {}", err);
            Err(err)
        }
    }
}
