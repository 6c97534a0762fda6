//! # Sale Coordinator
//!
//! Records a sale: customer check, stock reservation, sale and line rows,
//! and the customer's last purchase, all in one unit of work.

use chrono::Utc;
use elegancia_core::{
    AuditOperation, CoreError, RequestContext, Role, Sale, SaleDraft, SaleLine, SaleStatus,
    SaleTotals,
};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

use crate::audit::AuditRecorder;
use crate::error::WorkflowResult;
use crate::pool::Database;
use crate::repository::{customer, new_id, sale};

/// What the caller gets back for a recorded sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleReceipt {
    pub sale_id: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    pub total_cents: i64,
}

#[derive(Debug, Clone)]
pub struct SaleCoordinator {
    db: Database,
    audit: AuditRecorder,
}

impl SaleCoordinator {
    pub fn new(db: Database, audit: AuditRecorder) -> Self {
        SaleCoordinator { db, audit }
    }

    /// Records a sale on behalf of `ctx`.
    ///
    /// ## Errors
    /// - `Forbidden` unless salesperson or manager
    /// - validation errors from [`SaleTotals::compute`]
    /// - `CustomerNotFound` for a missing or inactive customer
    /// - `InsufficientStock` for the first line that cannot be reserved
    ///   (an unknown variant has 0 available); later lines are not attempted
    ///
    /// Every error leaves storage untouched.
    pub async fn create_sale(&self, ctx: &RequestContext, draft: SaleDraft) -> WorkflowResult<SaleReceipt> {
        ctx.require(&[Role::Salesperson, Role::Manager], "create sales")?;
        let totals = SaleTotals::compute(&draft)?;

        let result = self.record(ctx, &draft, &totals).await;
        let receipt = match result {
            Ok(receipt) => receipt,
            Err(e) => {
                warn!(
                    customer_id = %draft.customer_id,
                    operator_id = %ctx.actor_id,
                    error = %e,
                    "Sale rejected"
                );
                return Err(e);
            }
        };

        info!(
            sale_id = %receipt.sale_id,
            customer_id = %draft.customer_id,
            operator_id = %ctx.actor_id,
            total = %totals.total,
            "Sale recorded"
        );

        self.audit
            .record(
                ctx,
                AuditOperation::Insert,
                "sales",
                None,
                Some(json!({
                    "saleId": receipt.sale_id,
                    "customerId": draft.customer_id,
                    "totalCents": receipt.total_cents,
                })),
            )
            .await;

        Ok(receipt)
    }

    async fn record(
        &self,
        ctx: &RequestContext,
        draft: &SaleDraft,
        totals: &SaleTotals,
    ) -> WorkflowResult<SaleReceipt> {
        let mut uow = self.db.begin_unit_of_work().await?;

        let active = customer::find_in(uow.conn(), &draft.customer_id)
            .await?
            .filter(|c| c.is_active());
        if active.is_none() {
            return Err(CoreError::CustomerNotFound(draft.customer_id.clone()).into());
        }

        let now = Utc::now();
        let sale = Sale {
            id: new_id(),
            customer_id: draft.customer_id.clone(),
            operator_id: ctx.actor_id.clone(),
            subtotal_cents: totals.subtotal.cents(),
            discount_cents: totals.discount.cents(),
            total_cents: totals.total.cents(),
            status: SaleStatus::Completed,
            created_at: now,
            updated_at: now,
        };
        sale::insert_sale_in(uow.conn(), &sale).await?;

        for (index, (line, subtotal)) in draft.lines.iter().zip(&totals.line_subtotals).enumerate() {
            uow.ledger().reserve(&line.variant_id, line.quantity).await?;

            let row = SaleLine {
                id: new_id(),
                sale_id: sale.id.clone(),
                line_no: index as i64 + 1,
                variant_id: line.variant_id.clone(),
                quantity: line.quantity,
                unit_price_cents: line.unit_price_cents,
                subtotal_cents: subtotal.cents(),
            };
            sale::insert_line_in(uow.conn(), &row).await?;
        }

        customer::touch_last_purchase_in(uow.conn(), &sale.customer_id, now).await?;
        uow.commit().await?;

        Ok(SaleReceipt {
            sale_id: sale.id,
            subtotal_cents: sale.subtotal_cents,
            discount_cents: sale.discount_cents,
            total_cents: sale.total_cents,
        })
    }
}
