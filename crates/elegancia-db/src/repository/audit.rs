//! # Audit Repository
//!
//! Append-only storage for audit entries. There is no update or delete.

use chrono::{NaiveDate, Utc};
use elegancia_core::AuditEntry;
use sqlx::SqlitePool;
use tracing::debug;

use super::new_id;
use crate::audit::NewAuditEntry;
use crate::error::DbResult;
use crate::unit_of_work::WriteGate;

#[derive(Debug, Clone)]
pub struct AuditRepository {
    pool: SqlitePool,
    gate: WriteGate,
}

impl AuditRepository {
    pub fn new(pool: SqlitePool, gate: WriteGate) -> Self {
        AuditRepository { pool, gate }
    }

    /// Appends one entry in its own unit of work.
    pub async fn append(&self, entry: &NewAuditEntry) -> DbResult<AuditEntry> {
        let stored = AuditEntry {
            id: new_id(),
            actor_id: entry.actor_id.clone(),
            operation: entry.operation,
            entity_kind: entry.entity_kind.clone(),
            before_value: entry.before.as_ref().map(|v| v.to_string()),
            after_value: entry.after.as_ref().map(|v| v.to_string()),
            origin: entry.origin.clone(),
            created_at: Utc::now(),
        };

        let mut uow = self.gate.begin(&self.pool).await?;
        sqlx::query(
            r#"
            INSERT INTO audit_log (
                id, actor_id, operation, entity_kind, before_value,
                after_value, origin, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&stored.id)
        .bind(&stored.actor_id)
        .bind(stored.operation)
        .bind(&stored.entity_kind)
        .bind(&stored.before_value)
        .bind(&stored.after_value)
        .bind(&stored.origin)
        .bind(stored.created_at)
        .execute(uow.conn())
        .await?;
        uow.commit().await?;

        debug!(
            id = %stored.id,
            operation = %stored.operation,
            entity_kind = %stored.entity_kind,
            "Audit entry appended"
        );
        Ok(stored)
    }

    /// Entries created between `from` and `to` (inclusive, UTC days),
    /// newest first.
    pub async fn trail(&self, from: NaiveDate, to: NaiveDate, limit: u32) -> DbResult<Vec<AuditEntry>> {
        let entries = sqlx::query_as::<_, AuditEntry>(
            r#"
            SELECT id, actor_id, operation, entity_kind, before_value,
                   after_value, origin, created_at
            FROM audit_log
            WHERE date(created_at) BETWEEN ?1 AND ?2
            ORDER BY created_at DESC, id
            LIMIT ?3
            "#,
        )
        .bind(from.to_string())
        .bind(to.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_db;
    use elegancia_core::AuditOperation;
    use serde_json::json;

    fn entry(kind: &str) -> NewAuditEntry {
        NewAuditEntry {
            actor_id: "manager-1".into(),
            operation: AuditOperation::Update,
            entity_kind: kind.into(),
            before: Some(json!({"name": "Ana"})),
            after: Some(json!({"name": "Ana Souza"})),
            origin: Some("10.0.0.7".into()),
        }
    }

    #[tokio::test]
    async fn test_append_and_trail() {
        let db = test_db().await;
        let audit = db.audit_log();

        audit.append(&entry("customers")).await.unwrap();
        audit.append(&entry("sales")).await.unwrap();

        let today = Utc::now().date_naive();
        let trail = audit.trail(today, today, 10).await.unwrap();
        assert_eq!(trail.len(), 2);
        assert!(trail[0].created_at >= trail[1].created_at);

        let stored = trail.iter().find(|e| e.entity_kind == "customers").unwrap();
        assert_eq!(stored.operation, AuditOperation::Update);
        assert_eq!(stored.origin.as_deref(), Some("10.0.0.7"));
        let before: serde_json::Value =
            serde_json::from_str(stored.before_value.as_deref().unwrap()).unwrap();
        assert_eq!(before, json!({"name": "Ana"}));
    }

    #[tokio::test]
    async fn test_trail_respects_range_and_limit() {
        let db = test_db().await;
        let audit = db.audit_log();
        for _ in 0..3 {
            audit.append(&entry("customers")).await.unwrap();
        }

        let today = Utc::now().date_naive();
        assert_eq!(audit.trail(today, today, 2).await.unwrap().len(), 2);

        let last_year = today - chrono::Duration::days(365);
        let old = audit
            .trail(last_year, last_year + chrono::Duration::days(1), 10)
            .await
            .unwrap();
        assert!(old.is_empty());
    }
}
