//! # Domain Types
//!
//! Core domain types used throughout the Elegância back-office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────┐   ┌──────────────┐   ┌────────────────┐               │
//! │  │  Collection  │1─N│   Product    │1─N│ ProductVariant │               │
//! │  │  name        │   │  base_price  │   │ sku color size │               │
//! │  └──────────────┘   └──────────────┘   │ stock_quantity │               │
//! │                                        └───────▲────────┘               │
//! │                                                │ N                      │
//! │  ┌──────────────┐   ┌──────────────┐   ┌───────┴────────┐               │
//! │  │   Customer   │1─N│     Sale     │1─N│    SaleLine    │               │
//! │  │  national_id │   │  status      │   │ qty × price    │               │
//! │  │  preferences │   │  total_cents │   └────────────────┘               │
//! │  └──────────────┘   └──────┬───────┘                                    │
//! │                            │ 1                                          │
//! │                     ┌──────┴───────┐   ┌────────────────┐               │
//! │                     │    Return    │   │   AuditEntry   │ append-only   │
//! │                     │ refund=total │   │ before / after │               │
//! │                     └──────────────┘   └────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every entity is identified by a UUID v4 string. Amounts are integer
//! centavos (`*_cents` fields); see [`crate::money`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Catalog
// =============================================================================

/// A named group of products ("Verão 2026", "Alfaiataria", ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Collection {
    pub id: String,
    pub name: String,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A product model. Stock lives on its variants, never on the product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Product {
    pub id: String,
    pub collection_id: String,
    pub name: String,
    pub description: Option<String>,
    /// Reference price; each sale line carries its own unit price.
    pub base_price_cents: i64,
    /// Soft delete flag.
    pub is_active: bool,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn base_price(&self) -> Money {
        Money::from_cents(self.base_price_cents)
    }
}

/// Product row joined with its collection name, as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductListing {
    pub id: String,
    pub collection_id: String,
    pub collection_name: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price_cents: i64,
}

/// A sellable product + color + size combination with its own stock count.
///
/// `stock_quantity` is only ever changed by the inventory ledger
/// (reserve/restore) or the administrative override, and never drops
/// below zero.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ProductVariant {
    pub id: String,
    pub product_id: String,
    pub sku: String,
    pub color: String,
    pub size: String,
    pub stock_quantity: i64,
    pub min_stock_quantity: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl ProductVariant {
    /// At or below the restock threshold.
    #[inline]
    pub fn is_low_stock(&self) -> bool {
        self.stock_quantity <= self.min_stock_quantity
    }
}

/// Inventory view of a variant: stock plus the names a stock clerk needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct InventoryItem {
    pub variant_id: String,
    pub sku: String,
    pub product_id: String,
    pub product_name: String,
    pub collection_id: String,
    pub collection_name: String,
    pub color: String,
    pub size: String,
    pub stock_quantity: i64,
    pub min_stock_quantity: i64,
}

// =============================================================================
// Customer
// =============================================================================

/// Customer lifecycle. Deleting a customer moves it to `Inactive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum CustomerStatus {
    Active,
    Inactive,
}

impl Default for CustomerStatus {
    fn default() -> Self {
        CustomerStatus::Active
    }
}

/// Free-form customer preferences (sizes, favourite colors, notes...).
///
/// Opaque to the back-office: any JSON object is accepted and stored as-is.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Preferences(Map<String, Value>);

impl Preferences {
    pub fn new(map: Map<String, Value>) -> Self {
        Preferences(map)
    }

    /// Accepts a JSON value only if it is an object.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Preferences(map)),
            _ => None,
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    /// CPF, 11 digits without punctuation. Unique.
    pub national_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    #[cfg_attr(feature = "sqlx", sqlx(json))]
    #[ts(type = "Record<string, unknown>")]
    pub preferences: Preferences,
    pub status: CustomerStatus,
    #[ts(as = "Option<String>")]
    pub last_purchase_at: Option<DateTime<Utc>>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Customer {
    #[inline]
    pub fn is_active(&self) -> bool {
        self.status == CustomerStatus::Active
    }
}

// =============================================================================
// Sale
// =============================================================================

/// The status of a sale.
///
/// A sale is born `Completed`; the only transition is to `Returned`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "lowercase"))]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SaleStatus {
    Completed,
    Returned,
}

impl fmt::Display for SaleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SaleStatus::Completed => write!(f, "completed"),
            SaleStatus::Returned => write!(f, "returned"),
        }
    }
}

/// A recorded sale. Immutable apart from the status transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Sale {
    pub id: String,
    pub customer_id: String,
    /// Actor who recorded the sale (the seller).
    pub operator_id: String,
    pub subtotal_cents: i64,
    pub discount_cents: i64,
    /// Always `subtotal_cents - discount_cents`, never negative.
    pub total_cents: i64,
    pub status: SaleStatus,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line of a sale. Owned by its sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLine {
    pub id: String,
    pub sale_id: String,
    /// 1-based position in the order the caller submitted the lines.
    pub line_no: i64,
    pub variant_id: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    /// `quantity × unit_price_cents`
    pub subtotal_cents: i64,
}

/// Sale listing row (newest first) with the customer's name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleSummary {
    pub id: String,
    pub customer_id: String,
    pub customer_name: String,
    pub operator_id: String,
    pub total_cents: i64,
    pub status: SaleStatus,
    pub line_count: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

/// A sale line enriched with what was sold.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleLineDetail {
    pub line_no: i64,
    pub variant_id: String,
    pub sku: String,
    pub product_name: String,
    pub color: String,
    pub size: String,
    pub quantity: i64,
    pub unit_price_cents: i64,
    pub subtotal_cents: i64,
}

/// Full sale detail: header, customer name and lines in position order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SaleDetail {
    pub sale: Sale,
    pub customer_name: String,
    pub lines: Vec<SaleLineDetail>,
}

// =============================================================================
// Return
// =============================================================================

/// The reversal of a whole sale. At most one per sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Return {
    pub id: String,
    pub sale_id: String,
    pub operator_id: String,
    pub reason: String,
    /// Equal to the returned sale's total.
    pub refund_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Audit
// =============================================================================

/// Kind of mutation an audit entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum AuditOperation {
    Insert,
    Update,
    Delete,
}

impl fmt::Display for AuditOperation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuditOperation::Insert => write!(f, "INSERT"),
            AuditOperation::Update => write!(f, "UPDATE"),
            AuditOperation::Delete => write!(f, "DELETE"),
        }
    }
}

/// One row of the append-only audit log.
///
/// `before_value` / `after_value` hold JSON text snapshots of the affected
/// fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AuditEntry {
    pub id: String,
    pub actor_id: String,
    pub operation: AuditOperation,
    /// Table-level name of the affected entity ("sales", "customers", ...).
    pub entity_kind: String,
    pub before_value: Option<String>,
    pub after_value: Option<String>,
    /// Client address the request came from, when known.
    pub origin: Option<String>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_preferences_accept_only_objects() {
        let prefs = Preferences::from_value(json!({"size": "M", "colors": ["azul"]})).unwrap();
        assert_eq!(prefs.get("size"), Some(&json!("M")));

        assert!(Preferences::from_value(json!(["M"])).is_none());
        assert!(Preferences::from_value(json!("M")).is_none());
    }

    #[test]
    fn test_preferences_serialize_as_plain_object() {
        let prefs = Preferences::from_value(json!({"size": "G"})).unwrap();
        assert_eq!(serde_json::to_value(&prefs).unwrap(), json!({"size": "G"}));
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(SaleStatus::Returned).unwrap(), json!("returned"));
        assert_eq!(serde_json::to_value(CustomerStatus::Inactive).unwrap(), json!("inactive"));
        assert_eq!(serde_json::to_value(AuditOperation::Update).unwrap(), json!("UPDATE"));
    }

    #[test]
    fn test_low_stock_threshold_is_inclusive() {
        let now = Utc::now();
        let mut variant = ProductVariant {
            id: "v".into(),
            product_id: "p".into(),
            sku: "VST-AZ-M".into(),
            color: "Azul".into(),
            size: "M".into(),
            stock_quantity: 3,
            min_stock_quantity: 3,
            created_at: now,
            updated_at: now,
        };
        assert!(variant.is_low_stock());
        variant.stock_quantity = 4;
        assert!(!variant.is_low_stock());
    }
}
