//! Collections, products and variants.
//!
//! Reads are open to every role; creation is reserved to managers.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use elegancia_core::validation::{
    validate_name, validate_optional_text, validate_price_cents, validate_required_text,
    validate_sku, validate_stock_quantity, validate_uuid,
};
use elegancia_core::{
    AuditOperation, Collection, CoreError, ProductListing, ProductVariant, Role,
};
use elegancia_db::{DbError, NewProduct, NewVariant};
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{snapshot, ApiJson};
use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const MAX_DESCRIPTION_LEN: usize = 1000;
const MAX_COLOR_LEN: usize = 50;
const MAX_SIZE_LEN: usize = 20;

#[derive(Debug, Deserialize)]
pub struct CreateCollectionRequest {
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub collection_id: String,
    pub name: String,
    pub description: Option<String>,
    pub base_price_cents: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariantRequest {
    pub sku: String,
    pub color: String,
    pub size: String,
    #[serde(default)]
    pub stock_quantity: i64,
    #[serde(default)]
    pub min_stock_quantity: i64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionCreated {
    pub collection_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCreated {
    pub product_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantCreated {
    pub variant_id: String,
}

// =============================================================================
// Collections
// =============================================================================

pub async fn list_collections(
    State(state): State<AppState>,
    _caller: Caller,
) -> ApiResult<Json<Vec<Collection>>> {
    Ok(Json(state.db.catalog().list_collections().await?))
}

pub async fn create_collection(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiJson(req): ApiJson<CreateCollectionRequest>,
) -> ApiResult<(StatusCode, Json<CollectionCreated>)> {
    ctx.require(&[Role::Manager], "create collections")?;
    let name = validate_name("name", &req.name)?;

    let collection = state.db.catalog().create_collection(&name).await?;
    info!(collection_id = %collection.id, name = %collection.name, "Collection created");

    state
        .audit
        .record(&ctx, AuditOperation::Insert, "collections", None, snapshot(&collection))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(CollectionCreated {
            collection_id: collection.id,
        }),
    ))
}

// =============================================================================
// Products
// =============================================================================

/// Active products with their collection name.
pub async fn list_products(
    State(state): State<AppState>,
    _caller: Caller,
) -> ApiResult<Json<Vec<ProductListing>>> {
    Ok(Json(state.db.catalog().list_products().await?))
}

pub async fn create_product(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiJson(req): ApiJson<CreateProductRequest>,
) -> ApiResult<(StatusCode, Json<ProductCreated>)> {
    ctx.require(&[Role::Manager], "create products")?;

    validate_uuid("collectionId", &req.collection_id)?;
    validate_price_cents("basePriceCents", req.base_price_cents)?;
    let new = NewProduct {
        collection_id: req.collection_id,
        name: validate_name("name", &req.name)?,
        description: validate_optional_text(
            "description",
            req.description.as_deref(),
            MAX_DESCRIPTION_LEN,
        )?,
        base_price_cents: req.base_price_cents,
    };

    let collection_id = new.collection_id.clone();
    let product = state
        .db
        .catalog()
        .create_product(new)
        .await
        .map_err(|err| match err {
            DbError::NotFound { .. } => CoreError::CollectionNotFound(collection_id).into(),
            other => ApiError::from(other),
        })?;
    info!(product_id = %product.id, name = %product.name, "Product created");

    state
        .audit
        .record(&ctx, AuditOperation::Insert, "products", None, snapshot(&product))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(ProductCreated {
            product_id: product.id,
        }),
    ))
}

// =============================================================================
// Variants
// =============================================================================

pub async fn list_variants(
    State(state): State<AppState>,
    _caller: Caller,
    Path(product_id): Path<String>,
) -> ApiResult<Json<Vec<ProductVariant>>> {
    let catalog = state.db.catalog();
    if catalog.get_product(&product_id).await?.is_none() {
        return Err(CoreError::ProductNotFound(product_id).into());
    }

    Ok(Json(catalog.list_variants(&product_id).await?))
}

pub async fn create_variant(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(product_id): Path<String>,
    ApiJson(req): ApiJson<CreateVariantRequest>,
) -> ApiResult<(StatusCode, Json<VariantCreated>)> {
    ctx.require(&[Role::Manager], "create variants")?;

    validate_stock_quantity("stockQuantity", req.stock_quantity)?;
    validate_stock_quantity("minStockQuantity", req.min_stock_quantity)?;
    let new = NewVariant {
        sku: validate_sku(&req.sku)?,
        color: validate_required_text("color", &req.color, MAX_COLOR_LEN)?,
        size: validate_required_text("size", &req.size, MAX_SIZE_LEN)?,
        stock_quantity: req.stock_quantity,
        min_stock_quantity: req.min_stock_quantity,
    };

    let variant = state
        .db
        .catalog()
        .create_variant(&product_id, new)
        .await
        .map_err(|err| match err {
            DbError::NotFound { .. } => CoreError::ProductNotFound(product_id.clone()).into(),
            other => ApiError::from(other),
        })?;
    info!(variant_id = %variant.id, sku = %variant.sku, "Variant created");

    state
        .audit
        .record(&ctx, AuditOperation::Insert, "product_variants", None, snapshot(&variant))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(VariantCreated {
            variant_id: variant.id,
        }),
    ))
}
