//! # Validation Module
//!
//! Field-level input validation for the back-office API.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractors (axum + serde)                               │
//! │  └── Shape and type of the JSON body                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  └── Business rules on single fields (CPF, SKU, quantities, ...)       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: SQLite                                                       │
//! │  ├── CHECK (stock_quantity >= 0), CHECK (quantity > 0)                 │
//! │  ├── UNIQUE (national_id), UNIQUE (sku), UNIQUE (returns.sale_id)      │
//! │  └── Foreign keys                                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use elegancia_core::validation::{normalize_national_id, validate_line_quantity};
//!
//! assert_eq!(normalize_national_id("529.982.247-25").unwrap(), "52998224725");
//! assert!(validate_line_quantity(0).is_err());
//! ```

use chrono::NaiveDate;
use serde_json::Value;

use crate::error::ValidationError;
use crate::types::Preferences;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Trims `value` and checks it is non-empty and at most `max` characters.
///
/// Returns the trimmed value.
pub fn validate_required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

/// Trims an optional free-text field; blank becomes `None`.
pub fn validate_optional_text(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> ValidationResult<Option<String>> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => validate_required_text(field, v, max).map(Some),
    }
}

/// Customer, product and collection names: 1-150 characters.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<String> {
    validate_required_text(field, name, 150)
}

/// Return reason: required, up to 500 characters.
pub fn validate_reason(reason: &str) -> ValidationResult<String> {
    validate_required_text("reason", reason, 500)
}

/// Normalizes a CPF to its 11 digits and verifies its check digits.
///
/// Accepts both `52998224725` and `529.982.247-25`.
///
/// ## Rules
/// - Exactly 11 digits once `.` and `-` are removed
/// - Not a single repeated digit (`111.111.111-11` passes the checksum but
///   is never issued)
/// - Both check digits match
pub fn normalize_national_id(raw: &str) -> ValidationResult<String> {
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "nationalId".to_string(),
        reason: reason.to_string(),
    };

    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::Required {
            field: "nationalId".to_string(),
        });
    }

    let mut digits = Vec::with_capacity(11);
    for c in raw.chars() {
        match c {
            '0'..='9' => digits.push(c as u32 - '0' as u32),
            '.' | '-' => {}
            _ => return Err(invalid("must contain only digits, '.' and '-'")),
        }
    }

    if digits.len() != 11 {
        return Err(invalid("must have 11 digits"));
    }
    if digits.iter().all(|d| *d == digits[0]) {
        return Err(invalid("must not be a repeated digit"));
    }

    let check = |len: usize| -> u32 {
        let sum: u32 = digits[..len]
            .iter()
            .enumerate()
            .map(|(i, d)| d * (len as u32 + 1 - i as u32))
            .sum();
        (sum * 10) % 11 % 10
    };
    if check(9) != digits[9] || check(10) != digits[10] {
        return Err(invalid("check digits do not match"));
    }

    Ok(digits.iter().map(|d| char::from(b'0' + *d as u8)).collect())
}

/// Optional e-mail: blank means absent, otherwise `local@domain` with a dot
/// in the domain.
pub fn validate_email(email: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(email) = validate_optional_text("email", email, 254)? else {
        return Ok(None);
    };

    let well_formed = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !well_formed || email.contains(char::is_whitespace) {
        return Err(ValidationError::InvalidFormat {
            field: "email".to_string(),
            reason: "must look like name@domain.tld".to_string(),
        });
    }

    Ok(Some(email))
}

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only letters, digits, hyphens and underscores
///
/// ```rust
/// use elegancia_core::validation::validate_sku;
///
/// assert!(validate_sku("VST-SEDA-AZ-M").is_ok());
/// assert!(validate_sku("").is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<String> {
    let sku = validate_required_text("sku", sku, 50)?;

    if !sku
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(sku)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates the quantity of a sale line.
///
/// ## User Workflow
/// ```text
/// POST /sales  { lines: [{ quantity: 0, ... }] }
///      │
///      ▼
/// validate_line_quantity(0) ← THIS FUNCTION
///      │
///      ├── qty <= 0?  → 400 "quantity must be positive"
///      ├── qty > 999? → 400 "quantity must be between 1 and 999"
///      └── OK → reservation inside the unit of work
/// ```
pub fn validate_line_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Stock counts and thresholds: zero or more.
pub fn validate_stock_quantity(field: &str, qty: i64) -> ValidationResult<()> {
    if qty < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Prices in cents: zero (free item) or more.
pub fn validate_price_cents(field: &str, cents: i64) -> ValidationResult<()> {
    if cents < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

// =============================================================================
// Structured Validators
// =============================================================================

/// Customer preferences must be a JSON object. `null` means "none".
pub fn validate_preferences(value: Option<Value>) -> ValidationResult<Preferences> {
    match value {
        None | Some(Value::Null) => Ok(Preferences::default()),
        Some(v) => Preferences::from_value(v).ok_or_else(|| ValidationError::InvalidFormat {
            field: "preferences".to_string(),
            reason: "must be a JSON object".to_string(),
        }),
    }
}

/// Report ranges are inclusive and must not be reversed.
pub fn validate_date_range(from: NaiveDate, to: NaiveDate) -> ValidationResult<()> {
    if from > to {
        return Err(ValidationError::InvalidDateRange {
            from: from.to_string(),
            to: to.to_string(),
        });
    }
    Ok(())
}

/// Validates a UUID string.
///
/// ```rust
/// use elegancia_core::validation::validate_uuid;
///
/// assert!(validate_uuid("saleId", "550e8400-e29b-41d4-a716-446655440000").is_ok());
/// assert!(validate_uuid("saleId", "not-a-uuid").is_err());
/// ```
pub fn validate_uuid(field: &str, id: &str) -> ValidationResult<()> {
    if id.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    uuid::Uuid::parse_str(id).map_err(|_| ValidationError::InvalidFormat {
        field: field.to_string(),
        reason: "must be a valid UUID".to_string(),
    })?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_national_id() {
        assert_eq!(normalize_national_id("529.982.247-25").unwrap(), "52998224725");
        assert_eq!(normalize_national_id("11144477735").unwrap(), "11144477735");
        assert_eq!(normalize_national_id(" 123.456.789-09 ").unwrap(), "12345678909");

        // wrong check digit
        assert!(normalize_national_id("529.982.247-26").is_err());
        // repeated digit
        assert!(normalize_national_id("111.111.111-11").is_err());
        // length
        assert!(normalize_national_id("5299822472").is_err());
        assert!(normalize_national_id("529/982/247-25").is_err());
        assert!(matches!(
            normalize_national_id(""),
            Err(ValidationError::Required { .. })
        ));
    }

    #[test]
    fn test_validate_email() {
        assert_eq!(
            validate_email(Some(" ana@elegancia.com.br ")).unwrap(),
            Some("ana@elegancia.com.br".to_string())
        );
        assert_eq!(validate_email(None).unwrap(), None);
        assert_eq!(validate_email(Some("  ")).unwrap(), None);
        assert!(validate_email(Some("ana")).is_err());
        assert!(validate_email(Some("ana@local")).is_err());
        assert!(validate_email(Some("@elegancia.com")).is_err());
    }

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("VST-SEDA-AZ-M").is_ok());
        assert!(validate_sku("calca_linho_38").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(51)).is_err());
    }

    #[test]
    fn test_validate_line_quantity() {
        assert!(validate_line_quantity(1).is_ok());
        assert!(validate_line_quantity(999).is_ok());

        assert!(validate_line_quantity(0).is_err());
        assert!(validate_line_quantity(-1).is_err());
        assert!(validate_line_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_stock_and_price() {
        assert!(validate_stock_quantity("quantity", 0).is_ok());
        assert!(validate_stock_quantity("quantity", -1).is_err());
        assert!(validate_price_cents("basePriceCents", 0).is_ok());
        assert!(validate_price_cents("basePriceCents", -100).is_err());
    }

    #[test]
    fn test_validate_reason() {
        assert_eq!(validate_reason("  defeito na costura ").unwrap(), "defeito na costura");
        assert!(validate_reason("").is_err());
        assert!(validate_reason(&"x".repeat(501)).is_err());
    }

    #[test]
    fn test_validate_preferences() {
        assert!(validate_preferences(None).unwrap().is_empty());
        assert!(validate_preferences(Some(Value::Null)).unwrap().is_empty());
        assert!(validate_preferences(Some(json!({"size": "P"}))).is_ok());
        assert!(validate_preferences(Some(json!([1, 2]))).is_err());
    }

    #[test]
    fn test_validate_date_range() {
        let d = |s: &str| NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap();
        assert!(validate_date_range(d("2026-01-01"), d("2026-01-31")).is_ok());
        assert!(validate_date_range(d("2026-01-31"), d("2026-01-31")).is_ok());
        assert!(validate_date_range(d("2026-02-01"), d("2026-01-31")).is_err());
    }

    #[test]
    fn test_validate_uuid() {
        assert!(validate_uuid("id", "550e8400-e29b-41d4-a716-446655440000").is_ok());
        assert!(validate_uuid("id", "").is_err());
        assert!(validate_uuid("id", "123").is_err());
    }
}
