//! # Money Module
//!
//! Provides the `Money` type: an amount of Brazilian reais held as integer
//! centavos.
//!
//! ## Where Money Flows
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  SaleLine.unit_price × quantity ──► SaleLine.subtotal                   │
//! │                                          │                              │
//! │                              Σ lines ────▼                              │
//! │                                     Sale.subtotal                       │
//! │                                          │  − discount                  │
//! │                                          ▼                              │
//! │                                     Sale.total ──► Return.refund        │
//! │                                                                         │
//! │  0.1 + 0.2 = 0.30000000000000004 never happens here: every amount is   │
//! │  an i64 count of centavos, persisted and sent on the wire as such.     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use elegancia_core::money::Money;
//!
//! let price = Money::from_cents(18990); // R$189,90
//! let line = price.checked_multiply_quantity(2).unwrap();
//! assert_eq!(line.cents(), 37980);
//! assert_eq!(line.to_string(), "R$379,80");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Sub, SubAssign};
use ts_rs::TS;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in centavos.
///
/// Signed so the difference of two amounts is always representable, but
/// every persisted amount (prices, subtotals, totals, refunds) is ≥ 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from centavos.
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from reais and centavos.
    ///
    /// ```rust
    /// use elegancia_core::money::Money;
    ///
    /// assert_eq!(Money::from_reais(10, 0).cents(), 1000);
    /// assert_eq!(Money::from_reais(-5, 50).cents(), -550);
    /// ```
    #[inline]
    pub const fn from_reais(reais: i64, centavos: i64) -> Self {
        if reais < 0 {
            Money(reais * 100 - centavos)
        } else {
            Money(reais * 100 + centavos)
        }
    }

    /// Returns the value in centavos.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Whole reais (truncated toward zero).
    #[inline]
    pub const fn reais(&self) -> i64 {
        self.0 / 100
    }

    /// Centavos portion, always 0-99.
    #[inline]
    pub const fn centavos_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Line subtotal: unit price × quantity, `None` on overflow.
    ///
    /// ## User Workflow
    /// ```text
    /// Variant: Vestido Seda Azul M   R$10,00
    /// Quantity: 2
    ///      │
    ///      ▼
    /// checked_multiply_quantity(2) ← THIS FUNCTION
    ///      │
    ///      ▼
    /// Line subtotal: R$20,00
    /// ```
    #[inline]
    pub const fn checked_multiply_quantity(&self, qty: i64) -> Option<Self> {
        match self.0.checked_mul(qty) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }

    /// Sum of two amounts, `None` on overflow.
    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Self> {
        match self.0.checked_add(other.0) {
            Some(v) => Some(Money(v)),
            None => None,
        }
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Brazilian notation: `R$1.234,56`.
///
/// For logs and seed output; clients format amounts themselves.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let digits = self.reais().unsigned_abs().to_string();

        let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                grouped.push('.');
            }
            grouped.push(ch);
        }

        write!(f, "{}R${},{:02}", sign, grouped, self.centavos_part())
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0 + other.0)
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 += other.0;
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0 - other.0)
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 -= other.0;
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0 * qty)
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

impl From<i64> for Money {
    fn from(cents: i64) -> Self {
        Money(cents)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_reais() {
        let money = Money::from_reais(189, 90);
        assert_eq!(money.cents(), 18990);
        assert_eq!(money.reais(), 189);
        assert_eq!(money.centavos_part(), 90);
    }

    #[test]
    fn test_display_brazilian_notation() {
        assert_eq!(Money::from_cents(1099).to_string(), "R$10,99");
        assert_eq!(Money::from_cents(0).to_string(), "R$0,00");
        assert_eq!(Money::from_cents(123456789).to_string(), "R$1.234.567,89");
        assert_eq!(Money::from_cents(-550).to_string(), "-R$5,50");
    }

    #[test]
    fn test_sum_of_line_subtotals() {
        // 2 × R$10,00 + 1 × R$5,00
        let lines = [Money::from_cents(1000) * 2, Money::from_cents(500) * 1];
        let subtotal: Money = lines.into_iter().sum();
        assert_eq!(subtotal.cents(), 2500);
    }

    #[test]
    fn test_checked_multiply_detects_overflow() {
        assert_eq!(
            Money::from_cents(299).checked_multiply_quantity(3),
            Some(Money::from_cents(897))
        );
        assert_eq!(Money::from_cents(i64::MAX).checked_multiply_quantity(2), None);
        assert_eq!(Money::from_cents(i64::MAX).checked_add(Money::from_cents(1)), None);
    }

    #[test]
    fn test_serializes_as_plain_integer() {
        let json = serde_json::to_string(&Money::from_cents(2500)).unwrap();
        assert_eq!(json, "2500");
    }
}
