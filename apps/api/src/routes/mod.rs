//! HTTP routes.
//!
//! | Module        | Paths                                            |
//! |---------------|--------------------------------------------------|
//! | [`system`]    | `/health`, `/dashboard`                          |
//! | [`customers`] | `/customers`, `/customers/{id}`                  |
//! | [`catalog`]   | `/collections`, `/products`, `/products/{id}/variants` |
//! | [`inventory`] | `/inventory`, `/inventory/low-stock`, `/inventory/{variantId}` |
//! | [`sales`]     | `/sales`, `/sales/{id}`                          |
//! | [`returns`]   | `/returns`                                       |
//! | [`reports`]   | `/reports/*`                                     |

use axum::extract::FromRequest;
use axum::routing::{get, post, put};
use axum::Router;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ApiError;
use crate::AppState;

pub mod catalog;
pub mod customers;
pub mod inventory;
pub mod reports;
pub mod returns;
pub mod sales;
pub mod system;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(system::health))
        .route("/dashboard", get(system::dashboard))
        .route("/customers", get(customers::list).post(customers::create))
        .route(
            "/customers/{id}",
            get(customers::get).put(customers::update).delete(customers::deactivate),
        )
        .route(
            "/collections",
            get(catalog::list_collections).post(catalog::create_collection),
        )
        .route("/products", get(catalog::list_products).post(catalog::create_product))
        .route(
            "/products/{id}/variants",
            get(catalog::list_variants).post(catalog::create_variant),
        )
        .route("/inventory", get(inventory::list))
        .route("/inventory/low-stock", get(inventory::low_stock))
        .route("/inventory/{variant_id}", put(inventory::adjust))
        .route("/sales", get(sales::list).post(sales::create))
        .route("/sales/{id}", get(sales::detail))
        .route("/returns", post(returns::create))
        .route("/reports/sales-by-period", get(reports::sales_by_period))
        .route("/reports/sales-by-seller", get(reports::sales_by_seller))
        .route("/reports/sales-by-collection", get(reports::sales_by_collection))
        .route("/reports/audit", get(reports::audit_trail))
}

/// JSON body whose rejections use the API error body.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(ApiError))]
pub struct ApiJson<T>(pub T);

/// JSON snapshot of a value for the audit log.
pub(crate) fn snapshot<T: Serialize>(value: &T) -> Option<Value> {
    serde_json::to_value(value).ok()
}

/// Distinguishes an absent field (`None`) from an explicit `null`
/// (`Some(None)`) in partial updates.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
