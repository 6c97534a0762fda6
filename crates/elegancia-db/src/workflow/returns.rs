//! # Return Coordinator
//!
//! Reverses a whole sale: refund row, stock back on the shelf, sale marked
//! `returned`. A sale can be returned once.

use chrono::Utc;
use elegancia_core::validation::validate_reason;
use elegancia_core::{AuditOperation, CoreError, RequestContext, Return, Role, SaleStatus};
use serde_json::json;
use tracing::{info, warn};

use crate::audit::AuditRecorder;
use crate::error::{DbError, WorkflowError, WorkflowResult};
use crate::pool::Database;
use crate::repository::{new_id, returns, sale};

#[derive(Debug, Clone)]
pub struct ReturnCoordinator {
    db: Database,
    audit: AuditRecorder,
}

impl ReturnCoordinator {
    pub fn new(db: Database, audit: AuditRecorder) -> Self {
        ReturnCoordinator { db, audit }
    }

    /// Returns every line of `sale_id` and refunds its total.
    ///
    /// ## Errors
    /// - `Forbidden` unless salesperson or manager
    /// - validation error for an empty reason
    /// - `SaleNotFound`
    /// - `SaleAlreadyReturned`
    pub async fn create_return(
        &self,
        ctx: &RequestContext,
        sale_id: &str,
        reason: &str,
    ) -> WorkflowResult<Return> {
        ctx.require(&[Role::Salesperson, Role::Manager], "register returns")?;
        let reason = validate_reason(reason)?;

        let ret = match self.record(ctx, sale_id, reason).await {
            Ok(ret) => ret,
            Err(e) => {
                warn!(sale_id = %sale_id, operator_id = %ctx.actor_id, error = %e, "Return rejected");
                return Err(e);
            }
        };

        info!(
            return_id = %ret.id,
            sale_id = %ret.sale_id,
            refund_cents = ret.refund_cents,
            "Return recorded"
        );

        self.audit
            .record(
                ctx,
                AuditOperation::Insert,
                "returns",
                None,
                Some(json!({
                    "returnId": ret.id,
                    "saleId": ret.sale_id,
                    "refundCents": ret.refund_cents,
                })),
            )
            .await;

        Ok(ret)
    }

    async fn record(&self, ctx: &RequestContext, sale_id: &str, reason: String) -> WorkflowResult<Return> {
        let mut uow = self.db.begin_unit_of_work().await?;

        let original = sale::find_in(uow.conn(), sale_id)
            .await?
            .ok_or_else(|| CoreError::SaleNotFound(sale_id.to_string()))?;
        if original.status == SaleStatus::Returned {
            return Err(CoreError::SaleAlreadyReturned(sale_id.to_string()).into());
        }

        let now = Utc::now();
        let ret = Return {
            id: new_id(),
            sale_id: original.id.clone(),
            operator_id: ctx.actor_id.clone(),
            reason,
            refund_cents: original.total_cents,
            created_at: now,
        };
        returns::insert_return_in(uow.conn(), &ret)
            .await
            .map_err(|e| match e {
                DbError::UniqueViolation { .. } => {
                    WorkflowError::from(CoreError::SaleAlreadyReturned(sale_id.to_string()))
                }
                other => other.into(),
            })?;

        let lines = sale::lines_in(uow.conn(), &original.id).await?;
        for line in &lines {
            uow.ledger().restore(&line.variant_id, line.quantity).await?;
        }

        if !sale::mark_returned_in(uow.conn(), &original.id, now).await? {
            return Err(CoreError::SaleAlreadyReturned(sale_id.to_string()).into());
        }

        uow.commit().await?;
        Ok(ret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{recorder, test_db};

    #[tokio::test]
    async fn test_empty_reason_is_rejected() {
        let db = test_db().await;
        let coordinator = ReturnCoordinator::new(db.clone(), recorder(&db));
        let ctx = RequestContext::new("seller-1", Role::Salesperson, None);

        assert!(matches!(
            coordinator.create_return(&ctx, &new_id(), "   ").await,
            Err(WorkflowError::Rejected(CoreError::Validation(_)))
        ));
    }

    #[tokio::test]
    async fn test_unknown_sale() {
        let db = test_db().await;
        let coordinator = ReturnCoordinator::new(db.clone(), recorder(&db));
        let ctx = RequestContext::new("manager-1", Role::Manager, None);

        assert!(matches!(
            coordinator.create_return(&ctx, "no-such-sale", "defeito").await,
            Err(WorkflowError::Rejected(CoreError::SaleNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_stock_clerk_cannot_return() {
        let db = test_db().await;
        let coordinator = ReturnCoordinator::new(db.clone(), recorder(&db));
        let ctx = RequestContext::new("clerk-1", Role::StockClerk, None);

        assert!(matches!(
            coordinator.create_return(&ctx, &new_id(), "defeito").await,
            Err(WorkflowError::Rejected(CoreError::Forbidden { .. }))
        ));
    }
}
