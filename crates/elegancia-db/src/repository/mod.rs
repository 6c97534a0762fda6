//! # Repository Module
//!
//! Database repository implementations for the back-office.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Reads vs Writes                                      │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.customers().list_active()      ──► pool (any connection)   │
//! │       │                                                                 │
//! │       │  db.customers().create(new)        ──► UnitOfWork (write gate) │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Workflows (sale, return) call the crate-private `*_in` functions      │
//! │  below with the connection of their own unit of work, so every step   │
//! │  lands in one transaction.                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CustomerRepository`](customer::CustomerRepository) - Customer CRUD (soft delete)
//! - [`CatalogRepository`](catalog::CatalogRepository) - Collections, products, variants
//! - [`InventoryRepository`](inventory::InventoryRepository) - Stock listings and override
//! - [`SaleRepository`](sale::SaleRepository) - Sale listing and detail
//! - [`ReturnRepository`](returns::ReturnRepository) - Recorded returns
//! - [`AuditRepository`](audit::AuditRepository) - Audit log append and trail
//! - [`ReportRepository`](report::ReportRepository) - Dashboard and manager reports

use uuid::Uuid;

pub mod audit;
pub mod catalog;
pub mod customer;
pub mod inventory;
pub mod report;
pub mod returns;
pub mod sale;

/// Generates a new entity id (UUID v4).
pub fn new_id() -> String {
    Uuid::new_v4().to_string()
}
