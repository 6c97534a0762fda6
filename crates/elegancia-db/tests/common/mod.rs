//! Shared fixtures for the workflow tests.

#![allow(dead_code)]

use async_trait::async_trait;
use elegancia_core::{Preferences, RequestContext, Role};
use elegancia_db::{
    AuditRecorder, AuditSink, Database, DbConfig, DbError, DbResult, NewAuditEntry, NewCustomer,
    NewProduct, NewVariant, ReturnCoordinator, SaleCoordinator,
};
use std::sync::Arc;

pub async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

pub fn seller() -> RequestContext {
    RequestContext::new("seller-1", Role::Salesperson, Some("192.168.0.10".into()))
}

pub fn manager() -> RequestContext {
    RequestContext::new("manager-1", Role::Manager, Some("192.168.0.11".into()))
}

pub fn coordinators(db: &Database) -> (SaleCoordinator, ReturnCoordinator) {
    let audit = AuditRecorder::for_database(db);
    (
        SaleCoordinator::new(db.clone(), audit.clone()),
        ReturnCoordinator::new(db.clone(), audit),
    )
}

/// Sink that refuses every entry.
pub struct FailingSink;

#[async_trait]
impl AuditSink for FailingSink {
    async fn append(&self, _entry: &NewAuditEntry) -> DbResult<()> {
        Err(DbError::ConnectionFailed("audit storage offline".into()))
    }
}

pub fn failing_recorder() -> AuditRecorder {
    AuditRecorder::new(Arc::new(FailingSink))
}

pub async fn active_customer(db: &Database, national_id: &str) -> String {
    db.customers()
        .create(NewCustomer {
            name: format!("Cliente {national_id}"),
            national_id: national_id.to_string(),
            email: None,
            phone: None,
            address: None,
            preferences: Preferences::default(),
        })
        .await
        .unwrap()
        .id
}

/// A product of the given collection with one variant per `(sku, stock)`.
pub async fn product_with_variants(
    db: &Database,
    collection: &str,
    product: &str,
    variants: &[(&str, i64)],
) -> Vec<String> {
    let catalog = db.catalog();
    let collection = match catalog
        .list_collections()
        .await
        .unwrap()
        .into_iter()
        .find(|c| c.name == collection)
    {
        Some(existing) => existing,
        None => catalog.create_collection(collection).await.unwrap(),
    };

    let product = catalog
        .create_product(NewProduct {
            collection_id: collection.id,
            name: product.to_string(),
            description: None,
            base_price_cents: 1000,
        })
        .await
        .unwrap();

    let mut ids = Vec::new();
    for (idx, (sku, stock)) in variants.iter().enumerate() {
        let variant = catalog
            .create_variant(
                &product.id,
                NewVariant {
                    sku: sku.to_string(),
                    color: "Preto".into(),
                    size: ["P", "M", "G", "GG"][idx % 4].into(),
                    stock_quantity: *stock,
                    min_stock_quantity: 1,
                },
            )
            .await
            .unwrap();
        ids.push(variant.id);
    }
    ids
}

pub async fn stock_of(db: &Database, variant_id: &str) -> i64 {
    db.inventory()
        .get(variant_id)
        .await
        .unwrap()
        .unwrap()
        .stock_quantity
}

pub async fn count_rows(db: &Database, table: &str) -> i64 {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(db.pool())
        .await
        .unwrap()
}
