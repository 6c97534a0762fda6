//! # Inventory Ledger
//!
//! The only code that moves stock during sales and returns.
//!
//! ## Reservation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  reserve(A, 3)                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  UPDATE product_variants                                                │
//! │     SET stock_quantity = stock_quantity - 3                             │
//! │   WHERE id = A AND stock_quantity >= 3      ← check + decrement in one  │
//! │       │                                                                 │
//! │       ├── 1 row  ──► Ok                                                 │
//! │       │                                                                 │
//! │       └── 0 rows ──► SELECT stock_quantity WHERE id = A                 │
//! │                          ├── no row  ──► InsufficientStock{A, 0, 3}     │
//! │                          └── 2       ──► InsufficientStock{A, 2, 3}     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Both operations run on the connection of the enclosing
//! [`UnitOfWork`](crate::UnitOfWork); nothing is durable until it commits.

use chrono::Utc;
use elegancia_core::CoreError;
use sqlx::SqliteConnection;
use tracing::{debug, warn};

use crate::error::WorkflowResult;

/// Stock operations on an open unit of work.
pub struct InventoryLedger<'c> {
    conn: &'c mut SqliteConnection,
}

impl<'c> InventoryLedger<'c> {
    pub(crate) fn new(conn: &'c mut SqliteConnection) -> Self {
        InventoryLedger { conn }
    }

    /// Takes `quantity` units of a variant, or fails without touching it.
    ///
    /// ## Errors
    /// [`CoreError::InsufficientStock`] with the units actually available.
    /// An unknown variant has none available.
    pub async fn reserve(&mut self, variant_id: &str, quantity: i64) -> WorkflowResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE product_variants
            SET stock_quantity = stock_quantity - ?2,
                updated_at = ?3
            WHERE id = ?1 AND stock_quantity >= ?2
            "#,
        )
        .bind(variant_id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 1 {
            debug!(variant_id = %variant_id, quantity, "Stock reserved");
            return Ok(());
        }

        let available: Option<i64> =
            sqlx::query_scalar("SELECT stock_quantity FROM product_variants WHERE id = ?1")
                .bind(variant_id)
                .fetch_optional(&mut *self.conn)
                .await?;

        if available.is_none() {
            warn!(variant_id = %variant_id, "Reservation refused: unknown variant");
        } else {
            warn!(
                variant_id = %variant_id,
                ?available,
                requested = quantity,
                "Reservation refused: insufficient stock"
            );
        }
        Err(CoreError::InsufficientStock {
            variant_id: variant_id.to_string(),
            available: available.unwrap_or(0),
            requested: quantity,
        }
        .into())
    }

    /// Puts `quantity` units back.
    ///
    /// ## Errors
    /// - [`CoreError::VariantNotFound`]
    pub async fn restore(&mut self, variant_id: &str, quantity: i64) -> WorkflowResult<()> {
        let result = sqlx::query(
            r#"
            UPDATE product_variants
            SET stock_quantity = stock_quantity + ?2,
                updated_at = ?3
            WHERE id = ?1
            "#,
        )
        .bind(variant_id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(CoreError::VariantNotFound(variant_id.to_string()).into());
        }

        debug!(variant_id = %variant_id, quantity, "Stock restored");
        Ok(())
    }

    /// Current stock of a variant as seen by this unit of work.
    pub async fn available(&mut self, variant_id: &str) -> WorkflowResult<i64> {
        let available: Option<i64> =
            sqlx::query_scalar("SELECT stock_quantity FROM product_variants WHERE id = ?1")
                .bind(variant_id)
                .fetch_optional(&mut *self.conn)
                .await?;

        available.ok_or_else(|| CoreError::VariantNotFound(variant_id.to_string()).into())
    }
}

#[cfg(test)]
mod tests {
    use crate::error::WorkflowError;
    use crate::test_support::{seed_variant, test_db};
    use elegancia_core::CoreError;

    #[tokio::test]
    async fn test_reserve_decrements_stock() {
        let db = test_db().await;
        let variant = seed_variant(&db, "VST-AZ-M", 5).await;

        let mut uow = db.begin_unit_of_work().await.unwrap();
        uow.ledger().reserve(&variant, 3).await.unwrap();
        assert_eq!(uow.ledger().available(&variant).await.unwrap(), 2);
        uow.commit().await.unwrap();

        assert_eq!(db.inventory().get(&variant).await.unwrap().unwrap().stock_quantity, 2);
    }

    #[tokio::test]
    async fn test_reserve_exact_stock_reaches_zero() {
        let db = test_db().await;
        let variant = seed_variant(&db, "VST-AZ-P", 2).await;

        let mut uow = db.begin_unit_of_work().await.unwrap();
        uow.ledger().reserve(&variant, 2).await.unwrap();
        assert_eq!(uow.ledger().available(&variant).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reserve_more_than_available_reports_both_counts() {
        let db = test_db().await;
        let variant = seed_variant(&db, "VST-AZ-G", 2).await;

        let mut uow = db.begin_unit_of_work().await.unwrap();
        let err = uow.ledger().reserve(&variant, 3).await.unwrap_err();

        match err {
            WorkflowError::Rejected(CoreError::InsufficientStock {
                variant_id,
                available,
                requested,
            }) => {
                assert_eq!(variant_id, variant);
                assert_eq!(available, 2);
                assert_eq!(requested, 3);
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // untouched
        assert_eq!(uow.ledger().available(&variant).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_unknown_variant() {
        let db = test_db().await;

        let mut uow = db.begin_unit_of_work().await.unwrap();
        let missing = uuid::Uuid::new_v4().to_string();

        match uow.ledger().reserve(&missing, 1).await {
            Err(WorkflowError::Rejected(CoreError::InsufficientStock {
                variant_id,
                available,
                requested,
            })) => {
                assert_eq!(variant_id, missing);
                assert_eq!(available, 0);
                assert_eq!(requested, 1);
            }
            other => panic!("expected insufficient stock, got {other:?}"),
        }
        assert!(matches!(
            uow.ledger().restore(&missing, 1).await,
            Err(WorkflowError::Rejected(CoreError::VariantNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_restore_increments_and_rollback_discards() {
        let db = test_db().await;
        let variant = seed_variant(&db, "CAL-LN-38", 1).await;

        let mut uow = db.begin_unit_of_work().await.unwrap();
        uow.ledger().restore(&variant, 4).await.unwrap();
        assert_eq!(uow.ledger().available(&variant).await.unwrap(), 5);
        drop(uow);

        assert_eq!(db.inventory().get(&variant).await.unwrap().unwrap().stock_quantity, 1);
    }
}
