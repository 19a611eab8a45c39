//! Persistence boundary for the portal.
//!
//! Each concern gets its own async trait so services can depend on exactly
//! what they use. Both backends enforce the uniqueness rules themselves:
//! the in-memory store checks under its write lock, Postgres through
//! `UNIQUE` constraints. A service-level pre-check is never the only guard.

use async_trait::async_trait;
use thiserror::Error;

use dealerhub_audit::AuditEntry;
use dealerhub_core::{CustomerId, DealerId, EmployeeId};
use dealerhub_dealers::Dealer;
use dealerhub_parties::{Customer, Employee};

pub mod memory;
pub mod postgres;

pub use memory::InMemoryPortalStore;
pub use postgres::PostgresPortalStore;

/// Store-level failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// A unique field is already taken. Carries the public field name.
    #[error("{0} already exists")]
    Conflict(&'static str),

    /// The row to update does not exist.
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Anything the caller cannot act on (connection, decoding, poisoned lock).
    #[error("storage backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait DealerStore: Send + Sync {
    /// Fails with `Conflict("username")` or `Conflict("email")`, deleted dealers included.
    async fn insert_dealer(&self, dealer: &Dealer) -> Result<(), StoreError>;

    async fn get_dealer(&self, id: DealerId) -> Result<Option<Dealer>, StoreError>;

    /// Lookup by username or email. `identifier` must already be lowercased.
    async fn find_dealer_by_login(&self, identifier: &str) -> Result<Option<Dealer>, StoreError>;

    /// Newest first.
    async fn list_dealers(&self) -> Result<Vec<Dealer>, StoreError>;

    /// Single-row replace. Re-checks email uniqueness against other dealers.
    async fn update_dealer(&self, dealer: &Dealer) -> Result<(), StoreError>;
}

#[async_trait]
pub trait EmployeeStore: Send + Sync {
    /// Fails with `Conflict("aadhar")` when any dealer already holds the identifier.
    async fn insert_employee(&self, employee: &Employee) -> Result<(), StoreError>;

    async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError>;

    /// Creation order. `None` lists every dealer's employees.
    async fn list_employees(&self, dealer: Option<DealerId>) -> Result<Vec<Employee>, StoreError>;

    async fn update_employee(&self, employee: &Employee) -> Result<(), StoreError>;
}

#[async_trait]
pub trait CustomerStore: Send + Sync {
    /// Fails with `Conflict("officialId")` when any dealer already holds the identifier.
    async fn insert_customer(&self, customer: &Customer) -> Result<(), StoreError>;

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError>;

    /// Creation order. `None` lists every dealer's customers.
    async fn list_customers(&self, dealer: Option<DealerId>) -> Result<Vec<Customer>, StoreError>;

    async fn update_customer(&self, customer: &Customer) -> Result<(), StoreError>;
}

/// Append-only: entries are never updated or removed.
#[async_trait]
pub trait AuditStore: Send + Sync {
    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StoreError>;

    /// Newest first, at most `limit` entries.
    async fn list_audit(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError>;

    /// Newest first, only entries scoped to `dealer`.
    async fn list_audit_for_dealer(&self, dealer: DealerId, limit: usize) -> Result<Vec<AuditEntry>, StoreError>;
}

/// Everything the portal persists.
pub trait PortalStore: DealerStore + EmployeeStore + CustomerStore + AuditStore {}

impl<T> PortalStore for T where T: DealerStore + EmployeeStore + CustomerStore + AuditStore {}
