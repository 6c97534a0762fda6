//! # elegancia-db: Database Layer for the Elegância Back-Office
//!
//! Storage, units of work and the transactional workflows (sale, return)
//! on top of SQLite.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Database Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                      apps/api handlers                          │   │
//! │  └──────────────┬──────────────────────────────┬───────────────────┘   │
//! │                 │ reads / CRUD                 │ sale, return          │
//! │                 ▼                              ▼                        │
//! │  ┌──────────────────────────┐    ┌──────────────────────────────────┐  │
//! │  │  Repositories            │    │  Workflows                       │  │
//! │  │  customers, catalog,     │    │  SaleCoordinator                 │  │
//! │  │  inventory, sales,       │◄───│  ReturnCoordinator               │  │
//! │  │  returns, audit, reports │    │   └── InventoryLedger            │  │
//! │  └────────────┬─────────────┘    └───────────────┬──────────────────┘  │
//! │               │                                  │                      │
//! │               ▼                                  ▼                      │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │  Database { SqlitePool, WriteGate }  ──► UnitOfWork (writes)    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │               │                                                         │
//! │               ▼                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           SQLite (WAL) ── migrations/sqlite/0001_*.sql          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database and workflow error types
//! - [`unit_of_work`] - Write gate and transaction wrapper
//! - [`ledger`] - Stock reservation and restoration
//! - [`audit`] - Audit sink and best-effort recorder
//! - [`repository`] - Repository implementations
//! - [`workflow`] - Sale and return coordinators
//!
//! ## Usage
//!
//! ```rust,ignore
//! use elegancia_db::{Database, DbConfig, SaleCoordinator};
//!
//! let db = Database::new(DbConfig::new("./elegancia.db")).await?;
//! let sales = SaleCoordinator::new(db.clone(), AuditRecorder::for_database(&db));
//! let receipt = sales.create_sale(&ctx, draft).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod audit;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod unit_of_work;
pub mod workflow;

// =============================================================================
// Re-exports
// =============================================================================

pub use audit::{AuditRecorder, AuditSink, NewAuditEntry, SqliteAuditSink};
pub use error::{DbError, DbResult, WorkflowError, WorkflowResult};
pub use ledger::InventoryLedger;
pub use pool::{Database, DbConfig};
pub use unit_of_work::UnitOfWork;
pub use workflow::{ReturnCoordinator, SaleCoordinator, SaleReceipt};

// Repository re-exports for convenience
pub use repository::catalog::{CatalogRepository, NewProduct, NewVariant};
pub use repository::customer::{CustomerChanges, CustomerRepository, NewCustomer};
pub use repository::inventory::{InventoryFilter, InventoryRepository, StockAdjustment};
pub use repository::report::ReportRepository;
pub use repository::sale::SaleRepository;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::audit::AuditRecorder;
    use crate::repository::catalog::{NewProduct, NewVariant};
    use crate::repository::customer::NewCustomer;
    use crate::{Database, DbConfig};
    use elegancia_core::Preferences;

    pub async fn test_db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn recorder(db: &Database) -> AuditRecorder {
        AuditRecorder::for_database(db)
    }

    /// Creates a variant (under its own collection and product) and returns
    /// its id.
    pub async fn seed_variant(db: &Database, sku: &str, stock: i64) -> String {
        let catalog = db.catalog();
        let collection = catalog
            .create_collection(&format!("Coleção {sku}"))
            .await
            .unwrap();
        let product = catalog
            .create_product(NewProduct {
                collection_id: collection.id,
                name: format!("Peça {sku}"),
                description: None,
                base_price_cents: 1000,
            })
            .await
            .unwrap();
        catalog
            .create_variant(
                &product.id,
                NewVariant {
                    sku: sku.to_string(),
                    color: "Azul".into(),
                    size: "M".into(),
                    stock_quantity: stock,
                    min_stock_quantity: 0,
                },
            )
            .await
            .unwrap()
            .id
    }

    /// Creates an active customer and returns its id.
    pub async fn seed_customer(db: &Database) -> String {
        db.customers()
            .create(NewCustomer {
                name: "Ana Souza".into(),
                national_id: "52998224725".into(),
                email: None,
                phone: None,
                address: None,
                preferences: Preferences::default(),
            })
            .await
            .unwrap()
            .id
    }
}
