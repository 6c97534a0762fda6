//! # Return Repository
//!
//! Recorded returns. Rows are written only by the return workflow.

use elegancia_core::Return;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};

#[derive(Debug, Clone)]
pub struct ReturnRepository {
    pool: SqlitePool,
}

impl ReturnRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReturnRepository { pool }
    }

    /// The return recorded against a sale, if any.
    pub async fn get_by_sale(&self, sale_id: &str) -> DbResult<Option<Return>> {
        let ret = sqlx::query_as::<_, Return>(
            r#"
            SELECT id, sale_id, operator_id, reason, refund_cents, created_at
            FROM returns
            WHERE sale_id = ?1
            "#,
        )
        .bind(sale_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(ret)
    }
}

/// ## Returns
/// * `Err(DbError::UniqueViolation)` - the sale already has a return
pub(crate) async fn insert_return_in(conn: &mut SqliteConnection, ret: &Return) -> DbResult<()> {
    debug!(id = %ret.id, sale_id = %ret.sale_id, refund_cents = ret.refund_cents, "Inserting return");

    sqlx::query(
        r#"
        INSERT INTO returns (id, sale_id, operator_id, reason, refund_cents, created_at)
        VALUES (?1, ?2, ?3, ?4, ?5, ?6)
        "#,
    )
    .bind(&ret.id)
    .bind(&ret.sale_id)
    .bind(&ret.operator_id)
    .bind(&ret.reason)
    .bind(ret.refund_cents)
    .bind(ret.created_at)
    .execute(conn)
    .await
    .map_err(|e| DbError::from(e).with_duplicate("saleId", &ret.sale_id))?;

    Ok(())
}
