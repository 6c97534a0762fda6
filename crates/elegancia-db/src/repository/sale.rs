//! # Sale Repository
//!
//! Database operations for sales and sale lines.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. RECORD (SaleCoordinator, one unit of work)                         │
//! │     └── insert_sale_in()   Sale { status: completed }                  │
//! │     └── insert_line_in()   SaleLine #1, #2, ... (after reservation)    │
//! │                                                                         │
//! │  2. (OPTIONAL) RETURN (ReturnCoordinator, one unit of work)            │
//! │     └── mark_returned_in() Sale { status: returned }                   │
//! │                                                                         │
//! │  Nothing else ever changes a sale.                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use elegancia_core::{Sale, SaleDetail, SaleLine, SaleLineDetail, SaleStatus, SaleSummary};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;

/// Repository for sale reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Most recent sales first, with customer name and line count.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SaleSummary>> {
        let sales = sqlx::query_as::<_, SaleSummary>(
            r#"
            SELECT s.id, s.customer_id, c.name AS customer_name, s.operator_id,
                   s.total_cents, s.status,
                   (SELECT COUNT(*) FROM sale_lines l WHERE l.sale_id = s.id) AS line_count,
                   s.created_at
            FROM sales s
            INNER JOIN customers c ON c.id = s.customer_id
            ORDER BY s.created_at DESC, s.id
            LIMIT ?1
            "#,
        )
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        debug!(count = sales.len(), "Listed recent sales");
        Ok(sales)
    }

    /// Gets a sale by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Sale>> {
        let mut conn = self.pool.acquire().await?;
        find_in(&mut conn, id).await
    }

    /// Sale header, customer name and enriched lines.
    pub async fn get_detail(&self, id: &str) -> DbResult<Option<SaleDetail>> {
        let Some(sale) = self.get_by_id(id).await? else {
            return Ok(None);
        };

        let customer_name: String = sqlx::query_scalar("SELECT name FROM customers WHERE id = ?1")
            .bind(&sale.customer_id)
            .fetch_one(&self.pool)
            .await?;

        let lines = sqlx::query_as::<_, SaleLineDetail>(
            r#"
            SELECT l.line_no, l.variant_id, v.sku, p.name AS product_name,
                   v.color, v.size, l.quantity, l.unit_price_cents, l.subtotal_cents
            FROM sale_lines l
            INNER JOIN product_variants v ON v.id = l.variant_id
            INNER JOIN products p ON p.id = v.product_id
            WHERE l.sale_id = ?1
            ORDER BY l.line_no
            "#,
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(Some(SaleDetail {
            sale,
            customer_name,
            lines,
        }))
    }
}

// =============================================================================
// Unit-of-work steps
// =============================================================================

pub(crate) async fn find_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Sale>> {
    let sale = sqlx::query_as::<_, Sale>(
        r#"
        SELECT id, customer_id, operator_id, subtotal_cents, discount_cents,
               total_cents, status, created_at, updated_at
        FROM sales
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(sale)
}

pub(crate) async fn lines_in(conn: &mut SqliteConnection, sale_id: &str) -> DbResult<Vec<SaleLine>> {
    let lines = sqlx::query_as::<_, SaleLine>(
        r#"
        SELECT id, sale_id, line_no, variant_id, quantity, unit_price_cents, subtotal_cents
        FROM sale_lines
        WHERE sale_id = ?1
        ORDER BY line_no
        "#,
    )
    .bind(sale_id)
    .fetch_all(conn)
    .await?;

    Ok(lines)
}

pub(crate) async fn insert_sale_in(conn: &mut SqliteConnection, sale: &Sale) -> DbResult<()> {
    debug!(id = %sale.id, total_cents = sale.total_cents, "Inserting sale");

    sqlx::query(
        r#"
        INSERT INTO sales (
            id, customer_id, operator_id, subtotal_cents, discount_cents,
            total_cents, status, created_at, updated_at
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        "#,
    )
    .bind(&sale.id)
    .bind(&sale.customer_id)
    .bind(&sale.operator_id)
    .bind(sale.subtotal_cents)
    .bind(sale.discount_cents)
    .bind(sale.total_cents)
    .bind(sale.status)
    .bind(sale.created_at)
    .bind(sale.updated_at)
    .execute(conn)
    .await?;

    Ok(())
}

pub(crate) async fn insert_line_in(conn: &mut SqliteConnection, line: &SaleLine) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO sale_lines (
            id, sale_id, line_no, variant_id, quantity, unit_price_cents, subtotal_cents
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
        "#,
    )
    .bind(&line.id)
    .bind(&line.sale_id)
    .bind(line.line_no)
    .bind(&line.variant_id)
    .bind(line.quantity)
    .bind(line.unit_price_cents)
    .bind(line.subtotal_cents)
    .execute(conn)
    .await?;

    Ok(())
}

/// Moves a completed sale to `returned`.
///
/// ## Returns
/// `false` if the sale was not `completed` (nothing changed).
pub(crate) async fn mark_returned_in(
    conn: &mut SqliteConnection,
    id: &str,
    at: DateTime<Utc>,
) -> DbResult<bool> {
    let result = sqlx::query(
        "UPDATE sales SET status = ?2, updated_at = ?3 WHERE id = ?1 AND status = ?4",
    )
    .bind(id)
    .bind(SaleStatus::Returned)
    .bind(at)
    .bind(SaleStatus::Completed)
    .execute(conn)
    .await?;

    Ok(result.rows_affected() == 1)
}
