//! # elegancia-core: Pure Business Logic for the Elegância Back-Office
//!
//! This crate contains the domain model and every business rule that can be
//! expressed without touching storage: money arithmetic, sale totals, input
//! validation, roles and the per-request identity context.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Elegância Back-Office                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    apps/api (axum)                              │   │
//! │  │   JWT identity ──► role check ──► workflow / repository call    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ elegancia-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  totals   │  │ validation│  │   │
//! │  │   │ Customer  │  │   Money   │  │ SaleDraft │  │   rules   │  │   │
//! │  │   │ Sale/Line │  │           │  │ SaleTotals│  │   checks  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           elegancia-db (ledger, workflows, repositories)        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain entities (Customer, ProductVariant, Sale, Return, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`context`] - Roles and the request-scoped identity passed to workflows
//! - [`totals`] - Sale draft validation and subtotal/discount/total math
//! - [`error`] - Domain error types
//! - [`validation`] - Field-level input validation
//! - [`report`] - Aggregate rows for dashboard and manager reports
//!
//! ## Example Usage
//!
//! ```rust
//! use elegancia_core::money::Money;
//!
//! // R$10.00 × 2 + R$5.00 × 1
//! let subtotal = Money::from_cents(1000) * 2_i64 + Money::from_cents(500);
//! assert_eq!(subtotal.cents(), 2500);
//! ```

pub mod context;
pub mod error;
pub mod money;
pub mod report;
pub mod totals;
pub mod types;
pub mod validation;

// These allow users to do `use elegancia_core::Money` instead of
// `use elegancia_core::money::Money`
pub use context::{RequestContext, Role};
pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use report::{DashboardStats, SalesByCollection, SalesByDay, SalesBySeller};
pub use totals::{SaleDraft, SaleLineDraft, SaleTotals};
pub use types::*;

/// Maximum number of lines accepted in a single sale.
///
/// ## Business Reason
/// Keeps a single unit of work (and the write lock it holds) short.
pub const MAX_SALE_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// Prevents accidental over-ordering (typing 1000 instead of 10).
pub const MAX_LINE_QUANTITY: i64 = 999;

/// Maximum rows returned by the audit trail report.
pub const MAX_AUDIT_TRAIL_ROWS: u32 = 1000;

/// Number of most recent sales returned by the sales listing.
pub const RECENT_SALES_LIMIT: u32 = 100;
