//! # Transactional Workflows
//!
//! Multi-step operations that must commit or fail as a whole.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleCoordinator::create_sale                                          │
//! │     role ─► totals ─► [ customer ─► sale ─► reserve+line × N           │
//! │                         ─► last purchase ─► COMMIT ] ─► audit          │
//! │                                                                         │
//! │  ReturnCoordinator::create_return                                      │
//! │     role ─► reason ─► [ sale ─► return row ─► restore × N              │
//! │                         ─► status RETURNED ─► COMMIT ] ─► audit        │
//! │                                                                         │
//! │  [ ... ] = one UnitOfWork. Any Err inside drops it: ROLLBACK.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod returns;
pub mod sale;

pub use returns::ReturnCoordinator;
pub use sale::{SaleCoordinator, SaleReceipt};
