//! # Audit Recording
//!
//! Best-effort audit trail of every mutation.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  workflow / handler                                                    │
//! │       │  business change committed                                     │
//! │       ▼                                                                 │
//! │  AuditRecorder::record(ctx, INSERT, "sales", None, Some(after))        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  dyn AuditSink ──► SqliteAuditSink ──► audit_log (own unit of work)    │
//! │       │                                                                 │
//! │       └── Err ──► tracing::error!, swallowed                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The entry is written after the business change commits, so a failing
//! audit write never undoes a sale or a return.

use async_trait::async_trait;
use elegancia_core::{AuditOperation, RequestContext};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::error::DbResult;
use crate::pool::Database;
use crate::repository::audit::AuditRepository;

/// An audit entry before it gets an id and a timestamp.
#[derive(Debug, Clone, PartialEq)]
pub struct NewAuditEntry {
    pub actor_id: String,
    pub operation: AuditOperation,
    pub entity_kind: String,
    pub before: Option<Value>,
    pub after: Option<Value>,
    pub origin: Option<String>,
}

/// Destination of audit entries.
#[async_trait]
pub trait AuditSink: Send + Sync {
    async fn append(&self, entry: &NewAuditEntry) -> DbResult<()>;
}

/// Writes entries to the `audit_log` table.
#[derive(Debug, Clone)]
pub struct SqliteAuditSink {
    repo: AuditRepository,
}

impl SqliteAuditSink {
    pub fn new(repo: AuditRepository) -> Self {
        SqliteAuditSink { repo }
    }
}

#[async_trait]
impl AuditSink for SqliteAuditSink {
    async fn append(&self, entry: &NewAuditEntry) -> DbResult<()> {
        self.repo.append(entry).await.map(|_| ())
    }
}

/// Records audit entries for a request. Never fails.
#[derive(Clone)]
pub struct AuditRecorder {
    sink: Arc<dyn AuditSink>,
}

impl AuditRecorder {
    pub fn new(sink: Arc<dyn AuditSink>) -> Self {
        AuditRecorder { sink }
    }

    /// Recorder writing to the `audit_log` table of `db`.
    pub fn for_database(db: &Database) -> Self {
        AuditRecorder::new(Arc::new(SqliteAuditSink::new(db.audit_log())))
    }

    /// Appends an entry on behalf of `ctx`. A sink failure is logged and
    /// dropped.
    pub async fn record(
        &self,
        ctx: &RequestContext,
        operation: AuditOperation,
        entity_kind: &str,
        before: Option<Value>,
        after: Option<Value>,
    ) {
        let entry = NewAuditEntry {
            actor_id: ctx.actor_id.clone(),
            operation,
            entity_kind: entity_kind.to_string(),
            before,
            after,
            origin: ctx.origin.clone(),
        };

        if let Err(e) = self.sink.append(&entry).await {
            error!(
                actor_id = %entry.actor_id,
                operation = %entry.operation,
                entity_kind = %entry.entity_kind,
                error = %e,
                "Failed to write audit entry"
            );
        }
    }
}

impl std::fmt::Debug for AuditRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuditRecorder").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbError;
    use elegancia_core::Role;
    use serde_json::json;
    use std::sync::Mutex;

    /// Sink that refuses every entry.
    struct FailingSink;

    #[async_trait]
    impl AuditSink for FailingSink {
        async fn append(&self, _entry: &NewAuditEntry) -> DbResult<()> {
            Err(DbError::Internal("audit storage offline".into()))
        }
    }

    #[derive(Default)]
    struct MemorySink(Mutex<Vec<NewAuditEntry>>);

    #[async_trait]
    impl AuditSink for MemorySink {
        async fn append(&self, entry: &NewAuditEntry) -> DbResult<()> {
            self.0.lock().unwrap().push(entry.clone());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_record_carries_identity_and_origin() {
        let sink = Arc::new(MemorySink::default());
        let recorder = AuditRecorder::new(sink.clone());
        let ctx = RequestContext::new("manager-1", Role::Manager, Some("10.0.0.7".into()));

        recorder
            .record(&ctx, AuditOperation::Delete, "customers", Some(json!({"id": "c-1"})), None)
            .await;

        let entries = sink.0.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].actor_id, "manager-1");
        assert_eq!(entries[0].operation, AuditOperation::Delete);
        assert_eq!(entries[0].origin.as_deref(), Some("10.0.0.7"));
        assert!(entries[0].after.is_none());
    }

    #[tokio::test]
    async fn test_sink_failure_is_swallowed() {
        let recorder = AuditRecorder::new(Arc::new(FailingSink));
        let ctx = RequestContext::new("seller-1", Role::Salesperson, None);

        // returns unit, no panic
        recorder
            .record(&ctx, AuditOperation::Insert, "sales", None, Some(json!({})))
            .await;
    }
}
