//! # Elegância API
//!
//! HTTP API of the Elegância Premium back-office.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Request Flow                                │
//! │                                                                         │
//! │  HTTP request                                                          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  TraceLayer ──► TimeoutLayer (expired ⇒ handler dropped ⇒ ROLLBACK)    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Caller extractor: Bearer JWT ──► RequestContext {actor, role, origin} │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  routes::*  role check ──► repository / SaleCoordinator /              │
//! │       │                    ReturnCoordinator ──► AuditRecorder         │
//! │       ▼                                                                 │
//! │  Json<T>  or  ApiError {error, message, variantId?}                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `BIND_ADDR` - Listen address (default: 0.0.0.0)
//! - `HTTP_PORT` - HTTP server port (default: 8080)
//! - `DATABASE_PATH` - SQLite file (default: ./elegancia.db)
//! - `DB_MAX_CONNECTIONS` - Pool size (default: 5)
//! - `JWT_SECRET` - Secret for JWT validation
//! - `JWT_ACCESS_LIFETIME_SECS` - Access token lifetime (default: 3600)
//! - `REQUEST_TIMEOUT_SECS` - Per-request timeout (default: 30)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use axum::Router;
use elegancia_db::{AuditRecorder, Database, ReturnCoordinator, SaleCoordinator};
use tower::ServiceBuilder;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

// Re-exports
pub use auth::{Caller, JwtManager};
pub use config::ApiConfig;
pub use error::{ApiError, ApiResult, ErrorCode};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub sales: SaleCoordinator,
    pub returns: ReturnCoordinator,
    pub audit: AuditRecorder,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    /// Wires the coordinators and the audit recorder around `db`.
    pub fn new(db: Database, jwt: JwtManager) -> Self {
        let audit = AuditRecorder::for_database(&db);
        AppState {
            sales: SaleCoordinator::new(db.clone(), audit.clone()),
            returns: ReturnCoordinator::new(db.clone(), audit.clone()),
            audit,
            db,
            jwt: Arc::new(jwt),
        }
    }
}

/// Builds the application router with tracing and the request timeout.
pub fn build_router(state: AppState, request_timeout: Duration) -> Router {
    with_layers(routes::router().with_state(state), request_timeout)
}

/// Request tracing, then a timeout answered with 408.
fn with_layers(router: Router, request_timeout: Duration) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(TimeoutLayer::with_status_code(
                StatusCode::REQUEST_TIMEOUT,
                request_timeout,
            )),
    )
}
