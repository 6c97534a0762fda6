//! # Inventory Repository
//!
//! Stock listings and the administrative stock override.
//!
//! Sales and returns never come through here: they move stock through the
//! [`InventoryLedger`](crate::ledger::InventoryLedger) inside their own
//! unit of work.

use chrono::Utc;
use elegancia_core::validation::validate_stock_quantity;
use elegancia_core::{InventoryItem, ProductVariant};
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbResult, WorkflowResult};
use crate::unit_of_work::WriteGate;

/// Optional inventory filters.
#[derive(Debug, Clone, Default)]
pub struct InventoryFilter {
    /// Case-insensitive substring of the product name.
    pub product_name: Option<String>,
    pub collection_id: Option<String>,
}

/// Outcome of an administrative override.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAdjustment {
    pub variant_id: String,
    pub previous_quantity: i64,
    pub new_quantity: i64,
}

/// Repository for inventory reads and overrides.
#[derive(Debug, Clone)]
pub struct InventoryRepository {
    pool: SqlitePool,
    gate: WriteGate,
}

impl InventoryRepository {
    pub fn new(pool: SqlitePool, gate: WriteGate) -> Self {
        InventoryRepository { pool, gate }
    }

    /// Variants of active products, optionally filtered.
    ///
    /// Ordered by product name, color, size.
    pub async fn list(&self, filter: &InventoryFilter) -> DbResult<Vec<InventoryItem>> {
        let name_pattern = filter
            .product_name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| format!("%{}%", escape_like(s)));
        let collection_id = filter
            .collection_id
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty());

        debug!(?name_pattern, ?collection_id, "Listing inventory");

        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT v.id AS variant_id, v.sku, p.id AS product_id, p.name AS product_name,
                   c.id AS collection_id, c.name AS collection_name,
                   v.color, v.size, v.stock_quantity, v.min_stock_quantity
            FROM product_variants v
            INNER JOIN products p ON p.id = v.product_id
            INNER JOIN collections c ON c.id = p.collection_id
            WHERE p.is_active = 1
              AND (?1 IS NULL OR p.name LIKE ?1 ESCAPE '\')
              AND (?2 IS NULL OR c.id = ?2)
            ORDER BY p.name, v.color, v.size
            "#,
        )
        .bind(name_pattern)
        .bind(collection_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Variants at or below their minimum stock, lowest stock first.
    pub async fn low_stock(&self) -> DbResult<Vec<InventoryItem>> {
        let items = sqlx::query_as::<_, InventoryItem>(
            r#"
            SELECT v.id AS variant_id, v.sku, p.id AS product_id, p.name AS product_name,
                   c.id AS collection_id, c.name AS collection_name,
                   v.color, v.size, v.stock_quantity, v.min_stock_quantity
            FROM product_variants v
            INNER JOIN products p ON p.id = v.product_id
            INNER JOIN collections c ON c.id = p.collection_id
            WHERE p.is_active = 1
              AND v.stock_quantity <= v.min_stock_quantity
            ORDER BY v.stock_quantity, p.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    pub async fn get(&self, variant_id: &str) -> DbResult<Option<ProductVariant>> {
        let variant = sqlx::query_as::<_, ProductVariant>(
            r#"
            SELECT id, product_id, sku, color, size, stock_quantity,
                   min_stock_quantity, created_at, updated_at
            FROM product_variants
            WHERE id = ?1
            "#,
        )
        .bind(variant_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(variant)
    }

    /// Administrative override: sets the stock of a variant to an absolute
    /// value (stock count, damaged goods...).
    ///
    /// ## Errors
    /// - validation error for a negative quantity
    /// - `CoreError::VariantNotFound`
    pub async fn set_quantity(&self, variant_id: &str, quantity: i64) -> WorkflowResult<StockAdjustment> {
        validate_stock_quantity("quantity", quantity)?;

        let mut uow = self.gate.begin(&self.pool).await?;

        let previous = uow.ledger().available(variant_id).await?;

        sqlx::query("UPDATE product_variants SET stock_quantity = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(variant_id)
            .bind(quantity)
            .bind(Utc::now())
            .execute(uow.conn())
            .await?;
        uow.commit().await?;

        info!(
            variant_id = %variant_id,
            previous,
            quantity,
            "Stock overridden"
        );

        Ok(StockAdjustment {
            variant_id: variant_id.to_string(),
            previous_quantity: previous,
            new_quantity: quantity,
        })
    }

    /// Number of variants at or below their minimum stock.
    pub async fn count_low_stock(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM product_variants v
            INNER JOIN products p ON p.id = v.product_id
            WHERE p.is_active = 1 AND v.stock_quantity <= v.min_stock_quantity
            "#,
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(count)
    }
}

/// Escapes LIKE wildcards so user input matches literally.
fn escape_like(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::WorkflowError;
    use crate::repository::catalog::{NewProduct, NewVariant};
    use crate::{Database, DbConfig};
    use elegancia_core::CoreError;

    async fn stocked_db() -> (Database, String, String) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();
        let verao = catalog.create_collection("Verão").await.unwrap();
        let inverno = catalog.create_collection("Inverno").await.unwrap();

        let vestido = catalog
            .create_product(NewProduct {
                collection_id: verao.id.clone(),
                name: "Vestido 100% Seda".into(),
                description: None,
                base_price_cents: 38990,
            })
            .await
            .unwrap();
        let casaco = catalog
            .create_product(NewProduct {
                collection_id: inverno.id.clone(),
                name: "Casaco Lã".into(),
                description: None,
                base_price_cents: 59990,
            })
            .await
            .unwrap();

        let low = catalog
            .create_variant(
                &vestido.id,
                NewVariant {
                    sku: "VST-AZ-M".into(),
                    color: "Azul".into(),
                    size: "M".into(),
                    stock_quantity: 1,
                    min_stock_quantity: 2,
                },
            )
            .await
            .unwrap();
        catalog
            .create_variant(
                &casaco.id,
                NewVariant {
                    sku: "CAS-PT-G".into(),
                    color: "Preto".into(),
                    size: "G".into(),
                    stock_quantity: 10,
                    min_stock_quantity: 2,
                },
            )
            .await
            .unwrap();

        (db, low.id, inverno.id)
    }

    #[tokio::test]
    async fn test_list_filters() {
        let (db, _, inverno_id) = stocked_db().await;
        let inventory = db.inventory();

        assert_eq!(inventory.list(&InventoryFilter::default()).await.unwrap().len(), 2);

        let by_name = inventory
            .list(&InventoryFilter {
                product_name: Some("vestido".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_name.len(), 1);
        assert_eq!(by_name[0].sku, "VST-AZ-M");

        let by_collection = inventory
            .list(&InventoryFilter {
                collection_id: Some(inverno_id),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(by_collection.len(), 1);
        assert_eq!(by_collection[0].sku, "CAS-PT-G");
    }

    #[tokio::test]
    async fn test_like_wildcards_are_literal() {
        let (db, _, _) = stocked_db().await;
        let hits = db
            .inventory()
            .list(&InventoryFilter {
                product_name: Some("100%".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);

        let none = db
            .inventory()
            .list(&InventoryFilter {
                product_name: Some("_asaco".into()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn test_low_stock() {
        let (db, low_id, _) = stocked_db().await;
        let low = db.inventory().low_stock().await.unwrap();
        assert_eq!(low.len(), 1);
        assert_eq!(low[0].variant_id, low_id);
        assert_eq!(db.inventory().count_low_stock().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_set_quantity_reports_previous() {
        let (db, low_id, _) = stocked_db().await;

        let adjustment = db.inventory().set_quantity(&low_id, 12).await.unwrap();
        assert_eq!(adjustment.previous_quantity, 1);
        assert_eq!(adjustment.new_quantity, 12);

        let variant = db.inventory().get(&low_id).await.unwrap().unwrap();
        assert_eq!(variant.stock_quantity, 12);
        assert!(db.inventory().low_stock().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_set_quantity_rejections() {
        let (db, low_id, _) = stocked_db().await;

        assert!(matches!(
            db.inventory().set_quantity(&low_id, -1).await,
            Err(WorkflowError::Rejected(CoreError::Validation(_)))
        ));
        assert!(matches!(
            db.inventory().set_quantity("missing", 3).await,
            Err(WorkflowError::Rejected(CoreError::VariantNotFound(_)))
        ));
        assert_eq!(db.inventory().get(&low_id).await.unwrap().unwrap().stock_quantity, 1);
    }
}
