//! Postgres-backed portal store.
//!
//! ## Error Mapping
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError |
//! |------------|----------------------|------------|
//! | Database (unique violation) | `23505` | `Conflict(field)`, field taken from the constraint name |
//! | Database (other) | any other | `Backend` |
//! | PoolClosed / network / decode | N/A | `Backend` |
//!
//! Updates that touch zero rows become `NotFound`.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use dealerhub_audit::AuditEntry;
use dealerhub_core::{AuditEntryId, CustomerId, DealerId, EmployeeId};
use dealerhub_dealers::Dealer;
use dealerhub_parties::{Customer, Employee};

use super::{AuditStore, CustomerStore, DealerStore, EmployeeStore, StoreError};

const SCHEMA: &str = include_str!("../../migrations/0001_portal.sql");

const DEALER_COLUMNS: &str = "id, username, email, company_name, primary_contact_name, \
     primary_contact_phone, address, password_hash, force_password_change, status, \
     suspension_reason, deletion_reason, deletion_date, created_at";

const EMPLOYEE_COLUMNS: &str = "id, dealer_id, first_name, last_name, phone, email, aadhar, \
     designation, joining_date, status, termination_reason, termination_date, created_at";

const CUSTOMER_COLUMNS: &str = "id, dealer_id, name_or_entity, customer_type, phone, email, \
     official_id, address, status, termination_reason, termination_date, created_at";

const AUDIT_COLUMNS: &str =
    "id, who_user_id, who_user_name, dealer_id, action_type, details, ip_address, timestamp";

/// Postgres-backed store. `Send + Sync`; the SQLx pool handles connection sharing.
#[derive(Debug, Clone)]
pub struct PostgresPortalStore {
    pool: Arc<PgPool>,
}

impl PostgresPortalStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool: Arc::new(pool) }
    }

    /// Connect and apply the schema.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        let store = Self::new(pool);
        store.migrate().await?;
        Ok(store)
    }

    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::raw_sql(SCHEMA)
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("migrate", e))?;
        Ok(())
    }
}

/// Nullable `dealer_id` bind value. `NULL` means "every dealer" in list queries.
fn dealer_param(dealer: Option<DealerId>) -> Option<Uuid> {
    dealer.map(Uuid::from)
}

#[async_trait]
impl DealerStore for PostgresPortalStore {
    #[instrument(skip(self, dealer), fields(dealer_id = %dealer.id), err)]
    async fn insert_dealer(&self, dealer: &Dealer) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO dealers ({DEALER_COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        ))
        .bind(dealer.id.as_uuid())
        .bind(&dealer.username)
        .bind(&dealer.email)
        .bind(&dealer.company_name)
        .bind(&dealer.primary_contact_name)
        .bind(&dealer.primary_contact_phone)
        .bind(&dealer.address)
        .bind(&dealer.password_hash)
        .bind(dealer.force_password_change)
        .bind(dealer.status.as_str())
        .bind(&dealer.suspension_reason)
        .bind(&dealer.deletion_reason)
        .bind(dealer.deletion_date)
        .bind(dealer.created_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_dealer", e))?;
        Ok(())
    }

    async fn get_dealer(&self, id: DealerId) -> Result<Option<Dealer>, StoreError> {
        let row = sqlx::query(&format!("SELECT {DEALER_COLUMNS} FROM dealers WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_dealer", e))?;
        row.as_ref().map(dealer_from_row).transpose()
    }

    async fn find_dealer_by_login(&self, identifier: &str) -> Result<Option<Dealer>, StoreError> {
        let row = sqlx::query(&format!(
            "SELECT {DEALER_COLUMNS} FROM dealers WHERE username = $1 OR email = $1 LIMIT 1"
        ))
        .bind(identifier)
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find_dealer_by_login", e))?;
        row.as_ref().map(dealer_from_row).transpose()
    }

    async fn list_dealers(&self) -> Result<Vec<Dealer>, StoreError> {
        let rows = sqlx::query(&format!("SELECT {DEALER_COLUMNS} FROM dealers ORDER BY created_at DESC"))
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("list_dealers", e))?;
        rows.iter().map(dealer_from_row).collect()
    }

    #[instrument(skip(self, dealer), fields(dealer_id = %dealer.id), err)]
    async fn update_dealer(&self, dealer: &Dealer) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE dealers SET
                email = $2,
                company_name = $3,
                primary_contact_name = $4,
                primary_contact_phone = $5,
                address = $6,
                password_hash = $7,
                force_password_change = $8,
                status = $9,
                suspension_reason = $10,
                deletion_reason = $11,
                deletion_date = $12
            WHERE id = $1
            "#,
        )
        .bind(dealer.id.as_uuid())
        .bind(&dealer.email)
        .bind(&dealer.company_name)
        .bind(&dealer.primary_contact_name)
        .bind(&dealer.primary_contact_phone)
        .bind(&dealer.address)
        .bind(&dealer.password_hash)
        .bind(dealer.force_password_change)
        .bind(dealer.status.as_str())
        .bind(&dealer.suspension_reason)
        .bind(&dealer.deletion_reason)
        .bind(dealer.deletion_date)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_dealer", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("dealer"));
        }
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for PostgresPortalStore {
    #[instrument(skip(self, employee), fields(employee_id = %employee.id), err)]
    async fn insert_employee(&self, employee: &Employee) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO employees ({EMPLOYEE_COLUMNS}, aadhar_norm) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)"
        ))
        .bind(employee.id.as_uuid())
        .bind(employee.dealer_id.as_uuid())
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.aadhar)
        .bind(&employee.designation)
        .bind(employee.joining_date)
        .bind(employee.status.as_str())
        .bind(&employee.termination_reason)
        .bind(employee.termination_date)
        .bind(employee.created_at)
        .bind(employee.aadhar_key())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_employee", e))?;
        Ok(())
    }

    async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        let row = sqlx::query(&format!("SELECT {EMPLOYEE_COLUMNS} FROM employees WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_employee", e))?;
        row.as_ref().map(employee_from_row).transpose()
    }

    async fn list_employees(&self, dealer: Option<DealerId>) -> Result<Vec<Employee>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {EMPLOYEE_COLUMNS} FROM employees \
             WHERE $1::uuid IS NULL OR dealer_id = $1 ORDER BY seq ASC"
        ))
        .bind(dealer_param(dealer))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_employees", e))?;
        rows.iter().map(employee_from_row).collect()
    }

    #[instrument(skip(self, employee), fields(employee_id = %employee.id), err)]
    async fn update_employee(&self, employee: &Employee) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE employees SET
                first_name = $2,
                last_name = $3,
                phone = $4,
                email = $5,
                aadhar = $6,
                aadhar_norm = $7,
                designation = $8,
                joining_date = $9,
                status = $10,
                termination_reason = $11,
                termination_date = $12
            WHERE id = $1
            "#,
        )
        .bind(employee.id.as_uuid())
        .bind(&employee.first_name)
        .bind(&employee.last_name)
        .bind(&employee.phone)
        .bind(&employee.email)
        .bind(&employee.aadhar)
        .bind(employee.aadhar_key())
        .bind(&employee.designation)
        .bind(employee.joining_date)
        .bind(employee.status.as_str())
        .bind(&employee.termination_reason)
        .bind(employee.termination_date)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_employee", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("employee"));
        }
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for PostgresPortalStore {
    #[instrument(skip(self, customer), fields(customer_id = %customer.id), err)]
    async fn insert_customer(&self, customer: &Customer) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO customers ({CUSTOMER_COLUMNS}, official_id_norm) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)"
        ))
        .bind(customer.id.as_uuid())
        .bind(customer.dealer_id.as_uuid())
        .bind(&customer.name_or_entity)
        .bind(customer.customer_type.as_str())
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.official_id)
        .bind(&customer.address)
        .bind(customer.status.as_str())
        .bind(&customer.termination_reason)
        .bind(customer.termination_date)
        .bind(customer.created_at)
        .bind(customer.official_id_key())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("insert_customer", e))?;
        Ok(())
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        let row = sqlx::query(&format!("SELECT {CUSTOMER_COLUMNS} FROM customers WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("get_customer", e))?;
        row.as_ref().map(customer_from_row).transpose()
    }

    async fn list_customers(&self, dealer: Option<DealerId>) -> Result<Vec<Customer>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {CUSTOMER_COLUMNS} FROM customers \
             WHERE $1::uuid IS NULL OR dealer_id = $1 ORDER BY seq ASC"
        ))
        .bind(dealer_param(dealer))
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_customers", e))?;
        rows.iter().map(customer_from_row).collect()
    }

    #[instrument(skip(self, customer), fields(customer_id = %customer.id), err)]
    async fn update_customer(&self, customer: &Customer) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE customers SET
                name_or_entity = $2,
                customer_type = $3,
                phone = $4,
                email = $5,
                official_id = $6,
                official_id_norm = $7,
                address = $8,
                status = $9,
                termination_reason = $10,
                termination_date = $11
            WHERE id = $1
            "#,
        )
        .bind(customer.id.as_uuid())
        .bind(&customer.name_or_entity)
        .bind(customer.customer_type.as_str())
        .bind(&customer.phone)
        .bind(&customer.email)
        .bind(&customer.official_id)
        .bind(customer.official_id_key())
        .bind(&customer.address)
        .bind(customer.status.as_str())
        .bind(&customer.termination_reason)
        .bind(customer.termination_date)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("update_customer", e))?;
        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound("customer"));
        }
        Ok(())
    }
}

#[async_trait]
impl AuditStore for PostgresPortalStore {
    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        sqlx::query(&format!(
            "INSERT INTO audit_logs ({AUDIT_COLUMNS}) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)"
        ))
        .bind(entry.id.as_uuid())
        .bind(&entry.who_user_id)
        .bind(&entry.who_user_name)
        .bind(dealer_param(entry.dealer_id))
        .bind(entry.action_type.as_str())
        .bind(&entry.details)
        .bind(&entry.ip_address)
        .bind(entry.timestamp)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("append_audit", e))?;
        Ok(())
    }

    async fn list_audit(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_logs ORDER BY timestamp DESC, seq DESC LIMIT $1"
        ))
        .bind(limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_audit", e))?;
        rows.iter().map(audit_from_row).collect()
    }

    async fn list_audit_for_dealer(&self, dealer: DealerId, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {AUDIT_COLUMNS} FROM audit_logs WHERE dealer_id = $1 \
             ORDER BY timestamp DESC, seq DESC LIMIT $2"
        ))
        .bind(dealer.as_uuid())
        .bind(limit as i64)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_audit_for_dealer", e))?;
        rows.iter().map(audit_from_row).collect()
    }
}

// Row mapping

fn parse_column<T>(row: &PgRow, column: &str) -> Result<T, StoreError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    let raw: String = row.try_get(column).map_err(|e| map_sqlx_error("decode", e))?;
    raw.parse()
        .map_err(|e: T::Err| StoreError::Backend(format!("bad {column} value '{raw}': {e}")))
}

fn dealer_from_row(row: &PgRow) -> Result<Dealer, StoreError> {
    let get = |e| map_sqlx_error("decode_dealer", e);
    Ok(Dealer {
        id: DealerId::from_uuid(row.try_get("id").map_err(get)?),
        username: row.try_get("username").map_err(get)?,
        email: row.try_get("email").map_err(get)?,
        company_name: row.try_get("company_name").map_err(get)?,
        primary_contact_name: row.try_get("primary_contact_name").map_err(get)?,
        primary_contact_phone: row.try_get("primary_contact_phone").map_err(get)?,
        address: row.try_get("address").map_err(get)?,
        password_hash: row.try_get("password_hash").map_err(get)?,
        force_password_change: row.try_get("force_password_change").map_err(get)?,
        status: parse_column(row, "status")?,
        suspension_reason: row.try_get("suspension_reason").map_err(get)?,
        deletion_reason: row.try_get("deletion_reason").map_err(get)?,
        deletion_date: row.try_get("deletion_date").map_err(get)?,
        created_at: row.try_get("created_at").map_err(get)?,
    })
}

fn employee_from_row(row: &PgRow) -> Result<Employee, StoreError> {
    let get = |e| map_sqlx_error("decode_employee", e);
    Ok(Employee {
        id: EmployeeId::from_uuid(row.try_get("id").map_err(get)?),
        dealer_id: DealerId::from_uuid(row.try_get("dealer_id").map_err(get)?),
        first_name: row.try_get("first_name").map_err(get)?,
        last_name: row.try_get("last_name").map_err(get)?,
        phone: row.try_get("phone").map_err(get)?,
        email: row.try_get("email").map_err(get)?,
        aadhar: row.try_get("aadhar").map_err(get)?,
        designation: row.try_get("designation").map_err(get)?,
        joining_date: row.try_get("joining_date").map_err(get)?,
        status: parse_column(row, "status")?,
        termination_reason: row.try_get("termination_reason").map_err(get)?,
        termination_date: row.try_get("termination_date").map_err(get)?,
        created_at: row.try_get("created_at").map_err(get)?,
    })
}

fn customer_from_row(row: &PgRow) -> Result<Customer, StoreError> {
    let get = |e| map_sqlx_error("decode_customer", e);
    Ok(Customer {
        id: CustomerId::from_uuid(row.try_get("id").map_err(get)?),
        dealer_id: DealerId::from_uuid(row.try_get("dealer_id").map_err(get)?),
        name_or_entity: row.try_get("name_or_entity").map_err(get)?,
        customer_type: parse_column(row, "customer_type")?,
        phone: row.try_get("phone").map_err(get)?,
        email: row.try_get("email").map_err(get)?,
        official_id: row.try_get("official_id").map_err(get)?,
        address: row.try_get("address").map_err(get)?,
        status: parse_column(row, "status")?,
        termination_reason: row.try_get("termination_reason").map_err(get)?,
        termination_date: row.try_get("termination_date").map_err(get)?,
        created_at: row.try_get("created_at").map_err(get)?,
    })
}

fn audit_from_row(row: &PgRow) -> Result<AuditEntry, StoreError> {
    let get = |e| map_sqlx_error("decode_audit", e);
    let dealer_id: Option<Uuid> = row.try_get("dealer_id").map_err(get)?;
    Ok(AuditEntry {
        id: AuditEntryId::from_uuid(row.try_get("id").map_err(get)?),
        who_user_id: row.try_get("who_user_id").map_err(get)?,
        who_user_name: row.try_get("who_user_name").map_err(get)?,
        dealer_id: dealer_id.map(DealerId::from_uuid),
        action_type: parse_column(row, "action_type")?,
        details: row.try_get("details").map_err(get)?,
        ip_address: row.try_get("ip_address").map_err(get)?,
        timestamp: row.try_get("timestamp").map_err(get)?,
    })
}

/// Map the constraint that fired to the public field name.
fn conflict_field(constraint: Option<&str>) -> &'static str {
    match constraint {
        Some("dealers_username_key") => "username",
        Some("dealers_email_key") => "email",
        Some("employees_aadhar_norm_key") => "aadhar",
        Some("customers_official_id_norm_key") => "officialId",
        _ => "record",
    }
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::Conflict(conflict_field(db_err.constraint()));
            }
            StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed => StoreError::Backend(format!("connection pool closed in {}", operation)),
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}
