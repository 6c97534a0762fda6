//! # Catalog Repository
//!
//! Collections, products and their sellable variants.
//!
//! ```text
//! Collection "Verão 2026"
//!   └── Product "Vestido Seda"   base R$389,90
//!         ├── Variant VST-SEDA-AZ-P   Azul / P   stock 4
//!         ├── Variant VST-SEDA-AZ-M   Azul / M   stock 7
//!         └── Variant VST-SEDA-VM-M   Vermelho / M stock 0
//! ```
//!
//! Stock is set once here, at variant creation. Afterwards only the
//! inventory ledger and the administrative override change it.

use chrono::Utc;
use elegancia_core::{Collection, Product, ProductListing, ProductVariant};
use sqlx::SqlitePool;
use tracing::debug;

use super::new_id;
use crate::error::{DbError, DbResult};
use crate::unit_of_work::WriteGate;

/// A validated product ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub collection_id: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price_cents: i64,
}

/// A validated variant ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewVariant {
    pub sku: String,
    pub color: String,
    pub size: String,
    pub stock_quantity: i64,
    pub min_stock_quantity: i64,
}

/// Repository for catalog database operations.
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
    gate: WriteGate,
}

impl CatalogRepository {
    pub fn new(pool: SqlitePool, gate: WriteGate) -> Self {
        CatalogRepository { pool, gate }
    }

    // =========================================================================
    // Collections
    // =========================================================================

    pub async fn list_collections(&self) -> DbResult<Vec<Collection>> {
        let collections = sqlx::query_as::<_, Collection>(
            "SELECT id, name, created_at FROM collections ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(collections)
    }

    pub async fn get_collection(&self, id: &str) -> DbResult<Option<Collection>> {
        let collection = sqlx::query_as::<_, Collection>(
            "SELECT id, name, created_at FROM collections WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(collection)
    }

    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - name already taken
    pub async fn create_collection(&self, name: &str) -> DbResult<Collection> {
        debug!(name = %name, "Inserting collection");

        let collection = Collection {
            id: new_id(),
            name: name.to_string(),
            created_at: Utc::now(),
        };

        let mut uow = self.gate.begin(&self.pool).await?;
        sqlx::query("INSERT INTO collections (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(&collection.id)
            .bind(&collection.name)
            .bind(collection.created_at)
            .execute(uow.conn())
            .await
            .map_err(|e| DbError::from(e).with_duplicate("name", name))?;
        uow.commit().await?;

        Ok(collection)
    }

    // =========================================================================
    // Products
    // =========================================================================

    /// Active products with their collection name, ordered by name.
    pub async fn list_products(&self) -> DbResult<Vec<ProductListing>> {
        let products = sqlx::query_as::<_, ProductListing>(
            r#"
            SELECT p.id, p.collection_id, c.name AS collection_name,
                   p.name, p.description, p.base_price_cents
            FROM products p
            INNER JOIN collections c ON c.id = p.collection_id
            WHERE p.is_active = 1
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    pub async fn get_product(&self, id: &str) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(
            r#"
            SELECT id, collection_id, name, description, base_price_cents,
                   is_active, created_at, updated_at
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// ## Returns
    /// * `Err(DbError::NotFound)` - the collection does not exist
    pub async fn create_product(&self, new: NewProduct) -> DbResult<Product> {
        debug!(name = %new.name, collection_id = %new.collection_id, "Inserting product");

        let now = Utc::now();
        let product = Product {
            id: new_id(),
            collection_id: new.collection_id,
            name: new.name,
            description: new.description,
            base_price_cents: new.base_price_cents,
            is_active: true,
            created_at: now,
            updated_at: now,
        };

        let mut uow = self.gate.begin(&self.pool).await?;

        let collection_exists: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM collections WHERE id = ?1")
                .bind(&product.collection_id)
                .fetch_optional(uow.conn())
                .await?;
        if collection_exists.is_none() {
            return Err(DbError::not_found("Collection", &product.collection_id));
        }

        sqlx::query(
            r#"
            INSERT INTO products (
                id, collection_id, name, description, base_price_cents,
                is_active, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&product.id)
        .bind(&product.collection_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.base_price_cents)
        .bind(product.is_active)
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(uow.conn())
        .await?;
        uow.commit().await?;

        Ok(product)
    }

    // =========================================================================
    // Variants
    // =========================================================================

    /// Variants of a product, ordered by color then size.
    pub async fn list_variants(&self, product_id: &str) -> DbResult<Vec<ProductVariant>> {
        let variants = sqlx::query_as::<_, ProductVariant>(
            r#"
            SELECT id, product_id, sku, color, size, stock_quantity,
                   min_stock_quantity, created_at, updated_at
            FROM product_variants
            WHERE product_id = ?1
            ORDER BY color, size
            "#,
        )
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(variants)
    }

    /// ## Returns
    /// * `Err(DbError::NotFound)` - the product does not exist or is inactive
    /// * `Err(DbError::UniqueViolation)` - SKU taken, or color/size already
    ///   exists for this product
    pub async fn create_variant(&self, product_id: &str, new: NewVariant) -> DbResult<ProductVariant> {
        debug!(product_id = %product_id, sku = %new.sku, "Inserting variant");

        let now = Utc::now();
        let variant = ProductVariant {
            id: new_id(),
            product_id: product_id.to_string(),
            sku: new.sku,
            color: new.color,
            size: new.size,
            stock_quantity: new.stock_quantity,
            min_stock_quantity: new.min_stock_quantity,
            created_at: now,
            updated_at: now,
        };

        let mut uow = self.gate.begin(&self.pool).await?;

        let product_active: Option<bool> =
            sqlx::query_scalar("SELECT is_active FROM products WHERE id = ?1")
                .bind(product_id)
                .fetch_optional(uow.conn())
                .await?;
        if product_active != Some(true) {
            return Err(DbError::not_found("Product", product_id));
        }

        sqlx::query(
            r#"
            INSERT INTO product_variants (
                id, product_id, sku, color, size, stock_quantity,
                min_stock_quantity, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&variant.id)
        .bind(&variant.product_id)
        .bind(&variant.sku)
        .bind(&variant.color)
        .bind(&variant.size)
        .bind(variant.stock_quantity)
        .bind(variant.min_stock_quantity)
        .bind(variant.created_at)
        .bind(variant.updated_at)
        .execute(uow.conn())
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } if field.contains(".sku") => {
                DbError::duplicate("sku", &variant.sku)
            }
            DbError::UniqueViolation { .. } => DbError::duplicate(
                "variant",
                format!("{} / {}", variant.color, variant.size),
            ),
            other => other,
        })?;
        uow.commit().await?;

        Ok(variant)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn vestido(collection_id: &str) -> NewProduct {
        NewProduct {
            collection_id: collection_id.to_string(),
            name: "Vestido Seda".into(),
            description: Some("Seda pura".into()),
            base_price_cents: 38990,
        }
    }

    fn variant(sku: &str, color: &str, size: &str) -> NewVariant {
        NewVariant {
            sku: sku.into(),
            color: color.into(),
            size: size.into(),
            stock_quantity: 5,
            min_stock_quantity: 2,
        }
    }

    #[tokio::test]
    async fn test_catalog_tree() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        let verao = catalog.create_collection("Verão 2026").await.unwrap();
        let product = catalog.create_product(vestido(&verao.id)).await.unwrap();
        catalog
            .create_variant(&product.id, variant("VST-AZ-M", "Azul", "M"))
            .await
            .unwrap();
        catalog
            .create_variant(&product.id, variant("VST-AZ-P", "Azul", "P"))
            .await
            .unwrap();

        let listed = catalog.list_products().await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].collection_name, "Verão 2026");

        let variants = catalog.list_variants(&product.id).await.unwrap();
        let sizes: Vec<_> = variants.iter().map(|v| v.size.as_str()).collect();
        assert_eq!(sizes, vec!["M", "P"]);
    }

    #[tokio::test]
    async fn test_duplicates_are_named() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        let verao = catalog.create_collection("Verão 2026").await.unwrap();
        assert!(matches!(
            catalog.create_collection("Verão 2026").await,
            Err(DbError::UniqueViolation { ref field, .. }) if field == "name"
        ));

        let product = catalog.create_product(vestido(&verao.id)).await.unwrap();
        catalog
            .create_variant(&product.id, variant("VST-AZ-M", "Azul", "M"))
            .await
            .unwrap();

        assert!(matches!(
            catalog.create_variant(&product.id, variant("VST-AZ-M", "Preto", "M")).await,
            Err(DbError::UniqueViolation { ref field, .. }) if field == "sku"
        ));
        assert!(matches!(
            catalog.create_variant(&product.id, variant("VST-AZ-M2", "Azul", "M")).await,
            Err(DbError::UniqueViolation { ref field, .. }) if field == "variant"
        ));
    }

    #[tokio::test]
    async fn test_missing_parents() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let catalog = db.catalog();

        assert!(matches!(
            catalog.create_product(vestido("missing")).await,
            Err(DbError::NotFound { ref entity, .. }) if entity == "Collection"
        ));
        assert!(matches!(
            catalog.create_variant("missing", variant("X-1", "Azul", "M")).await,
            Err(DbError::NotFound { ref entity, .. }) if entity == "Product"
        ));
    }
}
