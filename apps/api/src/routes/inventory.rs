//! Inventory routes: listing, low-stock alerts and manual overrides.

use axum::extract::{Path, Query, State};
use axum::Json;
use elegancia_core::validation::{validate_optional_text, validate_uuid};
use elegancia_core::{AuditOperation, InventoryItem, Role};
use elegancia_db::{InventoryFilter, StockAdjustment};
use serde::Deserialize;
use serde_json::json;

use super::ApiJson;
use crate::auth::Caller;
use crate::error::ApiResult;
use crate::AppState;

const MAX_ADJUST_REASON_LEN: usize = 500;

/// Audit reason of an override sent without one.
pub const DEFAULT_ADJUST_REASON: &str = "Ajuste manual";

#[derive(Debug, Default, Deserialize)]
pub struct InventoryQuery {
    /// Substring of the product name.
    pub product: Option<String>,
    /// Collection id.
    pub collection: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockRequest {
    pub quantity: i64,
    pub reason: Option<String>,
}

pub async fn list(
    State(state): State<AppState>,
    _caller: Caller,
    Query(query): Query<InventoryQuery>,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    let filter = InventoryFilter {
        product_name: query.product,
        collection_id: query.collection.filter(|c| !c.trim().is_empty()),
    };
    Ok(Json(state.db.inventory().list(&filter).await?))
}

/// Variants at or below their minimum stock.
pub async fn low_stock(
    State(state): State<AppState>,
    _caller: Caller,
) -> ApiResult<Json<Vec<InventoryItem>>> {
    Ok(Json(state.db.inventory().low_stock().await?))
}

/// Sets the absolute stock of a variant. Stock clerks and managers only.
pub async fn adjust(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(variant_id): Path<String>,
    ApiJson(req): ApiJson<AdjustStockRequest>,
) -> ApiResult<Json<StockAdjustment>> {
    ctx.require(&[Role::StockClerk, Role::Manager], "adjust stock")?;
    validate_uuid("variantId", &variant_id)?;
    let reason = validate_optional_text("reason", req.reason.as_deref(), MAX_ADJUST_REASON_LEN)?
        .unwrap_or_else(|| DEFAULT_ADJUST_REASON.to_string());

    let adjustment = state.db.inventory().set_quantity(&variant_id, req.quantity).await?;

    state
        .audit
        .record(
            &ctx,
            AuditOperation::Update,
            "product_variants",
            Some(json!({
                "variantId": adjustment.variant_id,
                "stockQuantity": adjustment.previous_quantity,
            })),
            Some(json!({
                "variantId": adjustment.variant_id,
                "stockQuantity": adjustment.new_quantity,
                "reason": reason,
            })),
        )
        .await;

    Ok(Json(adjustment))
}
