//! # Report Repository
//!
//! Read-only aggregates for the dashboard and manager reports.
//!
//! Every sales figure counts `completed` sales only. Date ranges are
//! inclusive UTC calendar days matched on `date(created_at)`.

use chrono::NaiveDate;
use elegancia_core::{DashboardStats, SaleStatus, SalesByCollection, SalesByDay, SalesBySeller};
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

#[derive(Debug, Clone)]
pub struct ReportRepository {
    pool: SqlitePool,
}

impl ReportRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReportRepository { pool }
    }

    /// Headline numbers: completed sales, active customers, low stock.
    pub async fn dashboard(&self) -> DbResult<DashboardStats> {
        let stats = sqlx::query_as::<_, DashboardStats>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM sales WHERE status = ?1) AS completed_sales,
                (SELECT COALESCE(SUM(total_cents), 0) FROM sales WHERE status = ?1)
                    AS completed_sales_cents,
                (SELECT COUNT(*) FROM customers WHERE status = 'active') AS active_customers,
                (SELECT COUNT(*)
                   FROM product_variants v
                   INNER JOIN products p ON p.id = v.product_id
                  WHERE p.is_active = 1 AND v.stock_quantity <= v.min_stock_quantity)
                    AS low_stock_variants
            "#,
        )
        .bind(SaleStatus::Completed)
        .fetch_one(&self.pool)
        .await?;

        Ok(stats)
    }

    /// One row per day with completed sales, oldest first.
    pub async fn sales_by_day(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<SalesByDay>> {
        debug!(%from, %to, "Sales by day report");

        let rows = sqlx::query_as::<_, SalesByDay>(
            r#"
            SELECT date(created_at) AS day,
                   COUNT(*) AS sale_count,
                   COALESCE(SUM(total_cents), 0) AS total_cents
            FROM sales
            WHERE status = ?1 AND date(created_at) BETWEEN ?2 AND ?3
            GROUP BY date(created_at)
            ORDER BY day
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Completed sales per operator, best seller first.
    pub async fn sales_by_seller(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<SalesBySeller>> {
        debug!(%from, %to, "Sales by seller report");

        let rows = sqlx::query_as::<_, SalesBySeller>(
            r#"
            SELECT operator_id,
                   COUNT(*) AS sale_count,
                   COALESCE(SUM(total_cents), 0) AS total_cents
            FROM sales
            WHERE status = ?1 AND date(created_at) BETWEEN ?2 AND ?3
            GROUP BY operator_id
            ORDER BY total_cents DESC, operator_id
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }

    /// Line revenue per collection. Sale-level discounts are not spread
    /// over lines, so totals here are pre-discount.
    pub async fn sales_by_collection(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> DbResult<Vec<SalesByCollection>> {
        debug!(%from, %to, "Sales by collection report");

        let rows = sqlx::query_as::<_, SalesByCollection>(
            r#"
            SELECT c.id AS collection_id,
                   c.name AS collection_name,
                   COUNT(DISTINCT s.id) AS sale_count,
                   COALESCE(SUM(l.subtotal_cents), 0) AS total_cents,
                   COALESCE(SUM(l.quantity), 0) AS units_sold
            FROM sale_lines l
            INNER JOIN sales s ON s.id = l.sale_id
            INNER JOIN product_variants v ON v.id = l.variant_id
            INNER JOIN products p ON p.id = v.product_id
            INNER JOIN collections c ON c.id = p.collection_id
            WHERE s.status = ?1 AND date(s.created_at) BETWEEN ?2 AND ?3
            GROUP BY c.id, c.name
            ORDER BY total_cents DESC, c.name
            "#,
        )
        .bind(SaleStatus::Completed)
        .bind(from.to_string())
        .bind(to.to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use chrono::Utc;

    #[tokio::test]
    async fn test_empty_database_reports_zeroes() {
        let db = test_db().await;
        let reports = db.reports();

        assert_eq!(reports.dashboard().await.unwrap(), DashboardStats::default());

        let today = Utc::now().date_naive();
        assert!(reports.sales_by_day(today, today).await.unwrap().is_empty());
        assert!(reports.sales_by_seller(today, today).await.unwrap().is_empty());
        assert!(reports.sales_by_collection(today, today).await.unwrap().is_empty());
    }
}
