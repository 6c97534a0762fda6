//! Customer routes.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use elegancia_core::validation::{
    normalize_national_id, validate_email, validate_name, validate_optional_text,
    validate_preferences,
};
use elegancia_core::{AuditOperation, CoreError, Customer, CustomerStatus, Role};
use elegancia_db::{CustomerChanges, DbError, NewCustomer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::{present, snapshot, ApiJson};
use crate::auth::Caller;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

const MAX_PHONE_LEN: usize = 30;
const MAX_ADDRESS_LEN: usize = 300;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    pub name: String,
    pub national_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub preferences: Option<Value>,
}

/// Partial update. Absent fields are left alone; `null` clears an optional
/// field.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub email: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub phone: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub address: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub preferences: Option<Value>,
}

impl UpdateCustomerRequest {
    fn into_changes(self) -> ApiResult<CustomerChanges> {
        Ok(CustomerChanges {
            name: self.name.map(|n| validate_name("name", &n)).transpose()?,
            email: self.email.map(|e| validate_email(e.as_deref())).transpose()?,
            phone: self
                .phone
                .map(|p| validate_optional_text("phone", p.as_deref(), MAX_PHONE_LEN))
                .transpose()?,
            address: self
                .address
                .map(|a| validate_optional_text("address", a.as_deref(), MAX_ADDRESS_LEN))
                .transpose()?,
            preferences: self
                .preferences
                .map(|p| validate_preferences(Some(p)))
                .transpose()?,
        })
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerCreated {
    pub customer_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerDeactivated {
    pub customer_id: String,
    pub status: CustomerStatus,
}

/// Active customers by name.
pub async fn list(State(state): State<AppState>, _caller: Caller) -> ApiResult<Json<Vec<Customer>>> {
    Ok(Json(state.db.customers().list_active().await?))
}

pub async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    ApiJson(req): ApiJson<CreateCustomerRequest>,
) -> ApiResult<(StatusCode, Json<CustomerCreated>)> {
    let new = NewCustomer {
        name: validate_name("name", &req.name)?,
        national_id: normalize_national_id(&req.national_id)?,
        email: validate_email(req.email.as_deref())?,
        phone: validate_optional_text("phone", req.phone.as_deref(), MAX_PHONE_LEN)?,
        address: validate_optional_text("address", req.address.as_deref(), MAX_ADDRESS_LEN)?,
        preferences: validate_preferences(req.preferences)?,
    };

    let customer = state.db.customers().create(new).await?;
    info!(customer_id = %customer.id, actor_id = %ctx.actor_id, "Customer registered");

    state
        .audit
        .record(&ctx, AuditOperation::Insert, "customers", None, snapshot(&customer))
        .await;

    Ok((
        StatusCode::CREATED,
        Json(CustomerCreated {
            customer_id: customer.id,
        }),
    ))
}

/// Any status, so deactivated customers stay visible from their sales.
pub async fn get(
    State(state): State<AppState>,
    _caller: Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<Customer>> {
    state
        .db
        .customers()
        .get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| CoreError::CustomerNotFound(id).into())
}

pub async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
    ApiJson(req): ApiJson<UpdateCustomerRequest>,
) -> ApiResult<Json<Customer>> {
    let changes = req.into_changes()?;
    let (before, after) = state
        .db
        .customers()
        .update(&id, changes)
        .await
        .map_err(not_found_as_customer(&id))?;

    state
        .audit
        .record(&ctx, AuditOperation::Update, "customers", snapshot(&before), snapshot(&after))
        .await;

    Ok(Json(after))
}

/// Soft delete, managers only.
pub async fn deactivate(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(id): Path<String>,
) -> ApiResult<Json<CustomerDeactivated>> {
    ctx.require(&[Role::Manager], "deactivate customers")?;

    let before = state
        .db
        .customers()
        .deactivate(&id)
        .await
        .map_err(not_found_as_customer(&id))?;
    info!(customer_id = %id, actor_id = %ctx.actor_id, "Customer deactivated");

    state
        .audit
        .record(&ctx, AuditOperation::Delete, "customers", snapshot(&before), None)
        .await;

    Ok(Json(CustomerDeactivated {
        customer_id: id,
        status: CustomerStatus::Inactive,
    }))
}

fn not_found_as_customer(id: &str) -> impl FnOnce(DbError) -> ApiError + '_ {
    move |err| match err {
        DbError::NotFound { .. } => CoreError::CustomerNotFound(id.to_string()).into(),
        other => other.into(),
    }
}
