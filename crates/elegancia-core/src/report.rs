//! # Report Rows
//!
//! Read-only aggregates served to managers. Only `completed` sales count;
//! returned sales drop out of every sales figure.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Sales of one calendar day (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesByDay {
    /// `YYYY-MM-DD`
    pub day: String,
    pub sale_count: i64,
    pub total_cents: i64,
}

/// Sales recorded by one operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesBySeller {
    pub operator_id: String,
    pub sale_count: i64,
    pub total_cents: i64,
}

/// Sales of one collection, summed from sale lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct SalesByCollection {
    pub collection_id: String,
    pub collection_name: String,
    /// Distinct sales with at least one line from the collection.
    pub sale_count: i64,
    pub total_cents: i64,
    pub units_sold: i64,
}

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct DashboardStats {
    pub completed_sales: i64,
    pub completed_sales_cents: i64,
    pub active_customers: i64,
    pub low_stock_variants: i64,
}
