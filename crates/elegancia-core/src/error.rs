//! # Error Types
//!
//! Domain-specific error types for elegancia-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  elegancia-core errors (this file)                                     │
//! │  ├── CoreError        - Business rule violations                       │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  elegancia-db errors (separate crate)                                  │
//! │  ├── DbError          - Database operation failures                    │
//! │  └── WorkflowError    - CoreError | DbError from a unit of work        │
//! │                                                                         │
//! │  API errors (apps/api)                                                 │
//! │  └── ApiError         - What the HTTP client sees (reason key + text)  │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → WorkflowError → ApiError          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Business rule violations.
///
/// Every variant aborts the unit of work it was raised in.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Customer does not exist or is INACTIVE.
    ///
    /// Inactive customers are reported exactly like missing ones: a sale
    /// can only be recorded against an active customer.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// Sale does not exist.
    #[error("Sale not found: {0}")]
    SaleNotFound(String),

    /// Product variant does not exist.
    #[error("Product variant not found: {0}")]
    VariantNotFound(String),

    /// Product does not exist or is inactive.
    #[error("Product not found: {0}")]
    ProductNotFound(String),

    /// Collection does not exist.
    #[error("Collection not found: {0}")]
    CollectionNotFound(String),

    /// Reservation failed: the variant has fewer units than requested.
    ///
    /// ## User Workflow
    /// ```text
    /// POST /sales  line { variant: A, quantity: 3 }
    ///      │
    ///      ▼
    /// reserve(A, 3)  stock = 2
    ///      │
    ///      ▼
    /// InsufficientStock { variant_id: A, available: 2, requested: 3 }
    ///      │
    ///      ▼
    /// Unit of work rolled back, 409 { variantId: A }
    /// ```
    #[error("Insufficient stock for variant {variant_id}: available {available}, requested {requested}")]
    InsufficientStock {
        variant_id: String,
        available: i64,
        requested: i64,
    },

    /// The sale was already returned; a second return would refund twice.
    #[error("Sale {0} has already been returned")]
    SaleAlreadyReturned(String),

    /// The caller's role does not allow the operation.
    #[error("Role {role} is not allowed to {action}")]
    Forbidden { role: String, action: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// True for the "entity missing" family of errors.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::CustomerNotFound(_)
                | CoreError::SaleNotFound(_)
                | CoreError::VariantNotFound(_)
                | CoreError::ProductNotFound(_)
                | CoreError::CollectionNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised before any write so a rejected request never opens a unit of work.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (invalid UUID, malformed national ID, ...).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// The discount would make the sale total negative.
    #[error("discount {discount_cents} exceeds subtotal {subtotal_cents}")]
    DiscountExceedsSubtotal {
        discount_cents: i64,
        subtotal_cents: i64,
    },

    /// Date range with start after end.
    #[error("date range start {from} is after end {to}")]
    InvalidDateRange { from: String, to: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insufficient_stock_message_names_variant() {
        let err = CoreError::InsufficientStock {
            variant_id: "VAR-1".to_string(),
            available: 2,
            requested: 3,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for variant VAR-1: available 2, requested 3"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "reason".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
        assert!(!core_err.is_not_found());
    }

    #[test]
    fn test_not_found_family() {
        assert!(CoreError::CustomerNotFound("c".into()).is_not_found());
        assert!(CoreError::SaleNotFound("s".into()).is_not_found());
        assert!(!CoreError::SaleAlreadyReturned("s".into()).is_not_found());
    }
}
