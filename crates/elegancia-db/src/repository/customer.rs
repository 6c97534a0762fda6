//! # Customer Repository
//!
//! Customer registration, updates and soft deletion.
//!
//! ## Customer Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create()  ──► status: active                                          │
//! │     │                                                                   │
//! │     ├── update()          name / email / phone / address / prefs      │
//! │     ├── sale recorded     last_purchase_at = now                       │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  deactivate() ──► status: inactive                                     │
//! │                   (row kept: sales still reference it; new sales       │
//! │                    for this customer fail with CustomerNotFound)       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use elegancia_core::{Customer, CustomerStatus, Preferences};
use sqlx::types::Json;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use super::new_id;
use crate::error::{DbError, DbResult};
use crate::unit_of_work::WriteGate;

/// A validated customer ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub name: String,
    /// Normalized CPF (11 digits).
    pub national_id: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub preferences: Preferences,
}

/// A partial update. `None` leaves the field untouched; for the optional
/// contact fields `Some(None)` clears the value.
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub email: Option<Option<String>>,
    pub phone: Option<Option<String>>,
    pub address: Option<Option<String>>,
    pub preferences: Option<Preferences>,
}

impl CustomerChanges {
    fn apply_to(self, customer: &mut Customer) {
        if let Some(name) = self.name {
            customer.name = name;
        }
        if let Some(email) = self.email {
            customer.email = email;
        }
        if let Some(phone) = self.phone {
            customer.phone = phone;
        }
        if let Some(address) = self.address {
            customer.address = address;
        }
        if let Some(preferences) = self.preferences {
            customer.preferences = preferences;
        }
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
    gate: WriteGate,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool, gate: WriteGate) -> Self {
        CustomerRepository { pool, gate }
    }

    /// Active customers, ordered by name.
    pub async fn list_active(&self) -> DbResult<Vec<Customer>> {
        let customers = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, national_id, email, phone, address, preferences,
                   status, last_purchase_at, created_at, updated_at
            FROM customers
            WHERE status = 'active'
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        debug!(count = customers.len(), "Listed active customers");
        Ok(customers)
    }

    /// Gets a customer by ID, whatever its status.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let customer = sqlx::query_as::<_, Customer>(
            r#"
            SELECT id, name, national_id, email, phone, address, preferences,
                   status, last_purchase_at, created_at, updated_at
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(customer)
    }

    /// Registers a customer.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - national ID already registered
    pub async fn create(&self, new: NewCustomer) -> DbResult<Customer> {
        debug!(national_id = %new.national_id, "Inserting customer");

        let now = Utc::now();
        let customer = Customer {
            id: new_id(),
            name: new.name,
            national_id: new.national_id,
            email: new.email,
            phone: new.phone,
            address: new.address,
            preferences: new.preferences,
            status: CustomerStatus::Active,
            last_purchase_at: None,
            created_at: now,
            updated_at: now,
        };

        let mut uow = self.gate.begin(&self.pool).await?;
        sqlx::query(
            r#"
            INSERT INTO customers (
                id, name, national_id, email, phone, address, preferences,
                status, last_purchase_at, created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)
            "#,
        )
        .bind(&customer.id)
        .bind(&customer.name)
        .bind(&customer.national_id)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(Json(&customer.preferences))
        .bind(customer.status)
        .bind(customer.last_purchase_at)
        .bind(customer.created_at)
        .bind(customer.updated_at)
        .execute(uow.conn())
        .await
        .map_err(|e| DbError::from(e).with_duplicate("nationalId", &customer.national_id))?;
        uow.commit().await?;

        Ok(customer)
    }

    /// Applies a partial update.
    ///
    /// ## Returns
    /// `(before, after)` snapshots for the audit log.
    pub async fn update(&self, id: &str, changes: CustomerChanges) -> DbResult<(Customer, Customer)> {
        debug!(id = %id, "Updating customer");

        let mut uow = self.gate.begin(&self.pool).await?;

        let before = find_in(uow.conn(), id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))?;

        let mut after = before.clone();
        changes.apply_to(&mut after);
        after.updated_at = Utc::now();

        sqlx::query(
            r#"
            UPDATE customers SET
                name = ?2,
                email = ?3,
                phone = ?4,
                address = ?5,
                preferences = ?6,
                updated_at = ?7
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(&after.name)
        .bind(&after.email)
        .bind(&after.phone)
        .bind(&after.address)
        .bind(Json(&after.preferences))
        .bind(after.updated_at)
        .execute(uow.conn())
        .await?;
        uow.commit().await?;

        Ok((before, after))
    }

    /// Soft-deletes a customer (status → inactive).
    ///
    /// ## Returns
    /// The customer as it was before deactivation.
    pub async fn deactivate(&self, id: &str) -> DbResult<Customer> {
        debug!(id = %id, "Deactivating customer");

        let mut uow = self.gate.begin(&self.pool).await?;

        let before = find_in(uow.conn(), id)
            .await?
            .ok_or_else(|| DbError::not_found("Customer", id))?;

        sqlx::query("UPDATE customers SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(CustomerStatus::Inactive)
            .bind(Utc::now())
            .execute(uow.conn())
            .await?;
        uow.commit().await?;

        Ok(before)
    }

    /// Number of active customers.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit-of-work steps
// =============================================================================

/// Reads a customer on the given connection.
pub(crate) async fn find_in(conn: &mut SqliteConnection, id: &str) -> DbResult<Option<Customer>> {
    let customer = sqlx::query_as::<_, Customer>(
        r#"
        SELECT id, name, national_id, email, phone, address, preferences,
               status, last_purchase_at, created_at, updated_at
        FROM customers
        WHERE id = ?1
        "#,
    )
    .bind(id)
    .fetch_optional(conn)
    .await?;

    Ok(customer)
}

/// Records the time of the customer's latest sale. Last writer wins.
pub(crate) async fn touch_last_purchase_in(
    conn: &mut SqliteConnection,
    id: &str,
    at: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query("UPDATE customers SET last_purchase_at = ?2, updated_at = ?2 WHERE id = ?1")
        .bind(id)
        .bind(at)
        .execute(conn)
        .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use serde_json::json;

    fn ana() -> NewCustomer {
        NewCustomer {
            name: "Ana Souza".into(),
            national_id: "52998224725".into(),
            email: Some("ana@example.com".into()),
            phone: None,
            address: None,
            preferences: Preferences::from_value(json!({"size": "M"})).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_create_and_get() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.customers().create(ana()).await.unwrap();

        let fetched = db.customers().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(fetched.name, "Ana Souza");
        assert_eq!(fetched.status, CustomerStatus::Active);
        assert_eq!(fetched.preferences.get("size"), Some(&json!("M")));
        assert!(fetched.last_purchase_at.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_national_id() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.customers().create(ana()).await.unwrap();

        let err = db.customers().create(ana()).await.unwrap_err();
        assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "nationalId"));
    }

    #[tokio::test]
    async fn test_partial_update_keeps_untouched_fields() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.customers().create(ana()).await.unwrap();

        let (before, after) = db
            .customers()
            .update(
                &created.id,
                CustomerChanges {
                    phone: Some(Some("+55 11 99999-0000".into())),
                    email: Some(None),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(before.email.as_deref(), Some("ana@example.com"));
        assert_eq!(after.email, None);
        assert_eq!(after.phone.as_deref(), Some("+55 11 99999-0000"));
        assert_eq!(after.name, "Ana Souza");

        let stored = db.customers().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.phone, after.phone);
    }

    #[tokio::test]
    async fn test_deactivate_hides_from_listing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let created = db.customers().create(ana()).await.unwrap();
        assert_eq!(db.customers().count_active().await.unwrap(), 1);

        let before = db.customers().deactivate(&created.id).await.unwrap();
        assert_eq!(before.status, CustomerStatus::Active);

        assert!(db.customers().list_active().await.unwrap().is_empty());
        let stored = db.customers().get_by_id(&created.id).await.unwrap().unwrap();
        assert_eq!(stored.status, CustomerStatus::Inactive);
    }

    #[tokio::test]
    async fn test_unknown_customer() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(matches!(
            db.customers().deactivate("nope").await,
            Err(DbError::NotFound { .. })
        ));
        assert!(matches!(
            db.customers().update("nope", CustomerChanges::default()).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
