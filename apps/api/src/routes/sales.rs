//! Sale routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use elegancia_core::{CoreError, SaleDetail, SaleDraft, SaleSummary, RECENT_SALES_LIMIT};
use elegancia_db::SaleReceipt;

use super::ApiJson;
use crate::auth::Caller;
use crate::error::ApiResult;
use crate::AppState;

/// Most recent sales, newest first.
pub async fn list(State(state): State<AppState>, _caller: Caller) -> ApiResult<Json<Vec<SaleSummary>>> {
    Ok(Json(state.db.sales().list_recent(RECENT_SALES_LIMIT).await?))
}

/// Records a sale. All lines are reserved or none are.
pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiJson(draft): ApiJson<SaleDraft>,
) -> ApiResult<(StatusCode, Json<SaleReceipt>)> {
    let receipt = state.sales.create_sale(&ctx, draft).await?;
    Ok((StatusCode::CREATED, Json(receipt)))
}

pub async fn detail(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<SaleDetail>> {
    state
        .db
        .sales()
        .get_detail(&id)
        .await?
        .map(Json)
        .ok_or_else(|| CoreError::SaleNotFound(id).into())
}
