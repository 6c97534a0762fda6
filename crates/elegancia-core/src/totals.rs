//! # Sale Totals
//!
//! Validates a sale request and computes its amounts before anything is
//! written.
//!
//! ## Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  lines: [{A, qty 2, R$10,00}, {B, qty 1, R$5,00}]   discount R$0,00    │
//! │                                                                         │
//! │  line subtotals      2 × 1000 = 2000     1 × 500 = 500                  │
//! │  subtotal            Σ = 2500                                           │
//! │  total               2500 − 0 = 2500                                    │
//! │                                                                         │
//! │  Rejected up front:                                                     │
//! │    • no lines / more than MAX_SALE_LINES                                │
//! │    • quantity ≤ 0 or > MAX_LINE_QUANTITY                                │
//! │    • unit price < 0, discount < 0                                       │
//! │    • discount > subtotal (the total would go negative)                  │
//! │    • arithmetic overflow                                                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{validate_line_quantity, validate_price_cents, ValidationResult};
use crate::MAX_SALE_LINES;

/// One requested line of a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleLineDraft {
    pub variant_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
}

/// A sale as requested by the caller, not yet validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaleDraft {
    pub customer_id: String,
    pub lines: Vec<SaleLineDraft>,
    #[serde(default)]
    pub discount_cents: i64,
}

/// Amounts of a validated sale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleTotals {
    /// Per-line subtotals, in input order.
    pub line_subtotals: Vec<Money>,
    pub subtotal: Money,
    pub discount: Money,
    pub total: Money,
}

impl SaleTotals {
    /// Validates `draft` and computes its totals.
    ///
    /// Pure function: the customer and the variants are checked later,
    /// inside the unit of work. Ids are not inspected here, so an unknown
    /// customer is always `CustomerNotFound` and an unknown variant always a
    /// stock conflict, whatever their shape.
    pub fn compute(draft: &SaleDraft) -> ValidationResult<SaleTotals> {
        if draft.lines.is_empty() {
            return Err(ValidationError::Required {
                field: "lines".to_string(),
            });
        }
        if draft.lines.len() > MAX_SALE_LINES {
            return Err(ValidationError::OutOfRange {
                field: "lines".to_string(),
                min: 1,
                max: MAX_SALE_LINES as i64,
            });
        }

        let mut line_subtotals = Vec::with_capacity(draft.lines.len());
        let mut subtotal = Money::zero();

        for line in &draft.lines {
            validate_line_quantity(line.quantity)?;
            validate_price_cents("unitPriceCents", line.unit_price_cents)?;

            let line_subtotal = Money::from_cents(line.unit_price_cents)
                .checked_multiply_quantity(line.quantity)
                .ok_or_else(|| overflow("lines"))?;
            subtotal = subtotal
                .checked_add(line_subtotal)
                .ok_or_else(|| overflow("lines"))?;
            line_subtotals.push(line_subtotal);
        }

        if draft.discount_cents < 0 {
            return Err(ValidationError::MustNotBeNegative {
                field: "discountCents".to_string(),
            });
        }
        let discount = Money::from_cents(draft.discount_cents);
        if discount > subtotal {
            return Err(ValidationError::DiscountExceedsSubtotal {
                discount_cents: discount.cents(),
                subtotal_cents: subtotal.cents(),
            });
        }

        Ok(SaleTotals {
            line_subtotals,
            subtotal,
            discount,
            total: subtotal - discount,
        })
    }
}

fn overflow(field: &str) -> ValidationError {
    ValidationError::OutOfRange {
        field: field.to_string(),
        min: 0,
        max: i64::MAX,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CUSTOMER: &str = "6f1c1f9e-2f7a-4a55-9d0f-0c7b1b1a0001";
    const VARIANT_A: &str = "6f1c1f9e-2f7a-4a55-9d0f-0c7b1b1a000a";
    const VARIANT_B: &str = "6f1c1f9e-2f7a-4a55-9d0f-0c7b1b1a000b";

    fn line(variant: &str, quantity: i64, unit_price_cents: i64) -> SaleLineDraft {
        SaleLineDraft {
            variant_id: variant.to_string(),
            quantity,
            unit_price_cents,
        }
    }

    fn draft(lines: Vec<SaleLineDraft>, discount_cents: i64) -> SaleDraft {
        SaleDraft {
            customer_id: CUSTOMER.to_string(),
            lines,
            discount_cents,
        }
    }

    #[test]
    fn test_two_lines_no_discount() {
        let totals = SaleTotals::compute(&draft(
            vec![line(VARIANT_A, 2, 1000), line(VARIANT_B, 1, 500)],
            0,
        ))
        .unwrap();

        assert_eq!(
            totals.line_subtotals,
            vec![Money::from_cents(2000), Money::from_cents(500)]
        );
        assert_eq!(totals.subtotal.cents(), 2500);
        assert_eq!(totals.total.cents(), 2500);
    }

    #[test]
    fn test_discount_is_subtracted() {
        let totals = SaleTotals::compute(&draft(vec![line(VARIANT_A, 3, 1000)], 450)).unwrap();
        assert_eq!(totals.subtotal.cents(), 3000);
        assert_eq!(totals.discount.cents(), 450);
        assert_eq!(totals.total.cents(), 2550);
    }

    #[test]
    fn test_discount_equal_to_subtotal_gives_zero_total() {
        let totals = SaleTotals::compute(&draft(vec![line(VARIANT_A, 1, 800)], 800)).unwrap();
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_discount_above_subtotal_is_rejected() {
        let err = SaleTotals::compute(&draft(vec![line(VARIANT_A, 1, 800)], 801)).unwrap_err();
        assert!(matches!(
            err,
            ValidationError::DiscountExceedsSubtotal {
                discount_cents: 801,
                subtotal_cents: 800
            }
        ));
    }

    #[test]
    fn test_negative_discount_is_rejected() {
        let err = SaleTotals::compute(&draft(vec![line(VARIANT_A, 1, 800)], -1)).unwrap_err();
        assert!(matches!(err, ValidationError::MustNotBeNegative { .. }));
    }

    #[test]
    fn test_empty_sale_is_rejected() {
        let err = SaleTotals::compute(&draft(vec![], 0)).unwrap_err();
        assert!(matches!(err, ValidationError::Required { ref field } if field == "lines"));
    }

    #[test]
    fn test_bad_line_values_are_rejected() {
        assert!(SaleTotals::compute(&draft(vec![line(VARIANT_A, 0, 100)], 0)).is_err());
        assert!(SaleTotals::compute(&draft(vec![line(VARIANT_A, -2, 100)], 0)).is_err());
        assert!(SaleTotals::compute(&draft(vec![line(VARIANT_A, 1, -100)], 0)).is_err());
    }

    #[test]
    fn test_ids_are_left_to_the_lookup() {
        let mut sale = draft(vec![line("legacy-sku-id", 1, 100)], 0);
        sale.customer_id = "cliente-42".to_string();

        let totals = SaleTotals::compute(&sale).unwrap();
        assert_eq!(totals.total.cents(), 100);
    }

    #[test]
    fn test_free_line_is_allowed() {
        let totals = SaleTotals::compute(&draft(vec![line(VARIANT_A, 1, 0)], 0)).unwrap();
        assert!(totals.total.is_zero());
    }

    #[test]
    fn test_overflow_is_rejected() {
        let err =
            SaleTotals::compute(&draft(vec![line(VARIANT_A, 999, i64::MAX / 2)], 0)).unwrap_err();
        assert!(matches!(err, ValidationError::OutOfRange { .. }));
    }

    #[test]
    fn test_discount_defaults_to_zero_when_absent() {
        let json = format!(
            r#"{{"customerId":"{}","lines":[{{"variantId":"{}","quantity":1,"unitPriceCents":100}}]}}"#,
            CUSTOMER, VARIANT_A
        );
        let parsed: SaleDraft = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.discount_cents, 0);
    }
}
