//! Return registration.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use super::ApiJson;
use crate::auth::Caller;
use crate::error::ApiResult;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReturnRequest {
    pub sale_id: String,
    pub reason: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnCreated {
    pub return_id: String,
    pub refund_cents: i64,
}

/// Returns a whole sale: refunds its total and puts every unit back.
pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiJson(req): ApiJson<CreateReturnRequest>,
) -> ApiResult<(StatusCode, Json<ReturnCreated>)> {
    let ret = state
        .returns
        .create_return(&ctx, &req.sale_id, &req.reason)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ReturnCreated {
            return_id: ret.id,
            refund_cents: ret.refund_cents,
        }),
    ))
}
