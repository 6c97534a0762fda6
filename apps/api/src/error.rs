//! Error types for the HTTP API.
//!
//! Every lower-layer error converts into [`ApiError`], which decides the
//! status code and the reason key of the JSON body:
//!
//! ```text
//! {"error": "insufficient_stock", "message": "...", "variantId": "..."}
//! ```
//!
//! Storage details (SQL text, constraint names) are logged, never returned.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use elegancia_core::{CoreError, ValidationError};
use elegancia_db::{DbError, WorkflowError};
use serde::Serialize;
use tracing::error;

/// Reason keys of the error body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    InsufficientStock,
    SaleAlreadyReturned,
    DuplicateKey,
    Forbidden,
    Unauthenticated,
    DatabaseError,
    Internal,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "not_found",
            ErrorCode::ValidationError => "validation_error",
            ErrorCode::InsufficientStock => "insufficient_stock",
            ErrorCode::SaleAlreadyReturned => "sale_already_returned",
            ErrorCode::DuplicateKey => "duplicate_key",
            ErrorCode::Forbidden => "forbidden",
            ErrorCode::Unauthenticated => "unauthenticated",
            ErrorCode::DatabaseError => "database_error",
            ErrorCode::Internal => "internal",
        }
    }

    pub const fn status(&self) -> StatusCode {
        match self {
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ValidationError => StatusCode::BAD_REQUEST,
            ErrorCode::InsufficientStock
            | ErrorCode::SaleAlreadyReturned
            | ErrorCode::DuplicateKey => StatusCode::CONFLICT,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
            ErrorCode::DatabaseError | ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// API errors.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ApiError {
    pub code: ErrorCode,
    pub message: String,
    /// Set for stock conflicts.
    pub variant_id: Option<String>,
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
            variant_id: None,
        }
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Unauthenticated, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::Internal, message)
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ErrorBody<'a> {
    error: &'static str,
    message: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    variant_id: Option<&'a str>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.code.as_str(),
            message: &self.message,
            variant_id: self.variant_id.as_deref(),
        };
        (self.code.status(), Json(body)).into_response()
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::new(ErrorCode::ValidationError, err.to_string())
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::InsufficientStock { ref variant_id, .. } => ApiError {
                code: ErrorCode::InsufficientStock,
                variant_id: Some(variant_id.clone()),
                message: err.to_string(),
            },
            CoreError::SaleAlreadyReturned(_) => {
                ApiError::new(ErrorCode::SaleAlreadyReturned, err.to_string())
            }
            CoreError::Forbidden { .. } => ApiError::new(ErrorCode::Forbidden, err.to_string()),
            CoreError::Validation(inner) => inner.into(),
            other if other.is_not_found() => ApiError::new(ErrorCode::NotFound, other.to_string()),
            other => ApiError::internal(other.to_string()),
        }
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { .. } => ApiError::new(ErrorCode::NotFound, err.to_string()),
            DbError::UniqueViolation { .. } => ApiError::new(ErrorCode::DuplicateKey, err.to_string()),
            DbError::ForeignKeyViolation { .. } => {
                ApiError::new(ErrorCode::ValidationError, "Referenced record does not exist")
            }
            other => {
                error!(error = %other, "Database error");
                ApiError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<WorkflowError> for ApiError {
    fn from(err: WorkflowError) -> Self {
        match err {
            WorkflowError::Rejected(e) => e.into(),
            WorkflowError::Storage(e) => e.into(),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::new(ErrorCode::ValidationError, rejection.body_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_conflict_carries_variant() {
        let err: ApiError = CoreError::InsufficientStock {
            variant_id: "v-1".into(),
            available: 2,
            requested: 3,
        }
        .into();

        assert_eq!(err.code.status(), StatusCode::CONFLICT);
        assert_eq!(err.code.as_str(), "insufficient_stock");
        assert_eq!(err.variant_id.as_deref(), Some("v-1"));
    }

    #[test]
    fn test_workflow_errors_map_by_layer() {
        let not_found: ApiError = WorkflowError::from(CoreError::CustomerNotFound("c".into())).into();
        assert_eq!(not_found.code, ErrorCode::NotFound);

        let validation: ApiError = WorkflowError::from(ValidationError::Required {
            field: "reason".into(),
        })
        .into();
        assert_eq!(validation.code.status(), StatusCode::BAD_REQUEST);

        let storage: ApiError = WorkflowError::from(DbError::QueryFailed("near SELECT".into())).into();
        assert_eq!(storage.code, ErrorCode::DatabaseError);
        assert!(!storage.message.contains("SELECT"));
    }

    #[test]
    fn test_duplicate_maps_to_conflict() {
        let err: ApiError = DbError::duplicate("nationalId", "52998224725").into();
        assert_eq!(err.code, ErrorCode::DuplicateKey);
        assert_eq!(err.code.status(), StatusCode::CONFLICT);
    }
}
