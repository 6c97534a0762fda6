//! # Unit of Work
//!
//! A database transaction that also holds the process-wide write gate.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  db.begin_unit_of_work()                                               │
//! │       │  1. wait for the write gate (one writer at a time)             │
//! │       │  2. BEGIN on a pooled connection                               │
//! │       ▼                                                                 │
//! │  uow.conn() ──► ledger reserve/restore, inserts, updates               │
//! │       │                                                                 │
//! │       ├── every step Ok ──► uow.commit()   COMMIT, gate released       │
//! │       │                                                                 │
//! │       └── any step Err / handler timed out / future dropped            │
//! │                          ──► drop(uow)     ROLLBACK, gate released     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! SQLite allows a single writer. Serializing writers in-process means a
//! unit of work never loses its read snapshot to another writer of this
//! process halfway through; `busy_timeout` covers writers from other
//! processes.

use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::ledger::InventoryLedger;

/// Process-wide gate serializing units of work.
#[derive(Debug, Clone, Default)]
pub struct WriteGate(Arc<Mutex<()>>);

impl WriteGate {
    pub fn new() -> Self {
        WriteGate::default()
    }

    /// Waits for the gate, then opens a transaction.
    pub async fn begin(&self, pool: &SqlitePool) -> DbResult<UnitOfWork> {
        let guard = self.0.clone().lock_owned().await;
        let tx = pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!("Unit of work started");
        Ok(UnitOfWork { tx, _guard: guard })
    }
}

/// An open transaction plus the write gate.
///
/// Commit is explicit. Dropping an uncommitted unit of work rolls it back.
pub struct UnitOfWork {
    // Field order matters: the transaction is dropped (rollback queued on
    // its connection) before the gate opens.
    tx: Transaction<'static, Sqlite>,
    _guard: OwnedMutexGuard<()>,
}

impl UnitOfWork {
    /// Connection every statement of this unit of work must run on.
    pub fn conn(&mut self) -> &mut SqliteConnection {
        &mut self.tx
    }

    /// Stock operations bound to this unit of work.
    pub fn ledger(&mut self) -> InventoryLedger<'_> {
        InventoryLedger::new(&mut self.tx)
    }

    /// Makes every change durable and releases the gate.
    pub async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Unit of work committed");
        Ok(())
    }

    /// Discards every change. Equivalent to dropping, but awaits the rollback.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;
        debug!("Unit of work rolled back");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{Database, DbConfig};

    async fn count_collections(db: &Database) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM collections")
            .fetch_one(db.pool())
            .await
            .unwrap()
    }

    async fn insert_collection(uow: &mut super::UnitOfWork, name: &str) {
        sqlx::query("INSERT INTO collections (id, name, created_at) VALUES (?1, ?2, ?3)")
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(name)
            .bind(chrono::Utc::now())
            .execute(uow.conn())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_commit_persists() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = db.begin_unit_of_work().await.unwrap();
        insert_collection(&mut uow, "Verão").await;
        uow.commit().await.unwrap();

        assert_eq!(count_collections(&db).await, 1);
    }

    #[tokio::test]
    async fn test_drop_without_commit_rolls_back() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        {
            let mut uow = db.begin_unit_of_work().await.unwrap();
            insert_collection(&mut uow, "Inverno").await;
        }

        assert_eq!(count_collections(&db).await, 0);
    }

    #[tokio::test]
    async fn test_explicit_rollback() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        let mut uow = db.begin_unit_of_work().await.unwrap();
        insert_collection(&mut uow, "Alfaiataria").await;
        uow.rollback().await.unwrap();

        assert_eq!(count_collections(&db).await, 0);
    }
}
