use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;

use dealerhub_audit::AuditEntry;
use dealerhub_core::{CustomerId, DealerId, EmployeeId};
use dealerhub_dealers::Dealer;
use dealerhub_parties::{Customer, Employee};

use super::{AuditStore, CustomerStore, DealerStore, EmployeeStore, StoreError};

#[derive(Debug, Default)]
struct PortalState {
    dealers: Vec<Dealer>,
    employees: Vec<Employee>,
    customers: Vec<Customer>,
    audit: Vec<AuditEntry>,
}

/// In-memory portal store.
///
/// Intended for tests/dev. Rows are kept in insertion order; every
/// uniqueness check runs under the same write lock as the insert.
#[derive(Debug, Default)]
pub struct InMemoryPortalStore {
    state: RwLock<PortalState>,
}

impl InMemoryPortalStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, PortalState>, StoreError> {
        self.state
            .read()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, PortalState>, StoreError> {
        self.state
            .write()
            .map_err(|_| StoreError::Backend("lock poisoned".to_string()))
    }
}

fn newest_first(entries: impl DoubleEndedIterator<Item = AuditEntry>, limit: usize) -> Vec<AuditEntry> {
    // Reverse first so equal timestamps keep newest-inserted first after the stable sort.
    let mut out: Vec<AuditEntry> = entries.rev().collect();
    out.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    out.truncate(limit);
    out
}

#[async_trait]
impl DealerStore for InMemoryPortalStore {
    async fn insert_dealer(&self, dealer: &Dealer) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state.dealers.iter().any(|d| d.username == dealer.username) {
            return Err(StoreError::Conflict("username"));
        }
        if state.dealers.iter().any(|d| d.email == dealer.email) {
            return Err(StoreError::Conflict("email"));
        }
        state.dealers.push(dealer.clone());
        Ok(())
    }

    async fn get_dealer(&self, id: DealerId) -> Result<Option<Dealer>, StoreError> {
        Ok(self.read()?.dealers.iter().find(|d| d.id == id).cloned())
    }

    async fn find_dealer_by_login(&self, identifier: &str) -> Result<Option<Dealer>, StoreError> {
        Ok(self
            .read()?
            .dealers
            .iter()
            .find(|d| d.username == identifier || d.email == identifier)
            .cloned())
    }

    async fn list_dealers(&self) -> Result<Vec<Dealer>, StoreError> {
        let mut dealers = self.read()?.dealers.clone();
        dealers.reverse();
        dealers.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(dealers)
    }

    async fn update_dealer(&self, dealer: &Dealer) -> Result<(), StoreError> {
        let mut state = self.write()?;
        if state
            .dealers
            .iter()
            .any(|d| d.id != dealer.id && d.email == dealer.email)
        {
            return Err(StoreError::Conflict("email"));
        }
        let slot = state
            .dealers
            .iter_mut()
            .find(|d| d.id == dealer.id)
            .ok_or(StoreError::NotFound("dealer"))?;
        *slot = dealer.clone();
        Ok(())
    }
}

#[async_trait]
impl EmployeeStore for InMemoryPortalStore {
    async fn insert_employee(&self, employee: &Employee) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let key = employee.aadhar_key();
        if state.employees.iter().any(|e| e.aadhar_key() == key) {
            return Err(StoreError::Conflict("aadhar"));
        }
        state.employees.push(employee.clone());
        Ok(())
    }

    async fn get_employee(&self, id: EmployeeId) -> Result<Option<Employee>, StoreError> {
        Ok(self.read()?.employees.iter().find(|e| e.id == id).cloned())
    }

    async fn list_employees(&self, dealer: Option<DealerId>) -> Result<Vec<Employee>, StoreError> {
        Ok(self
            .read()?
            .employees
            .iter()
            .filter(|e| dealer.is_none_or(|d| e.dealer_id == d))
            .cloned()
            .collect())
    }

    async fn update_employee(&self, employee: &Employee) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let key = employee.aadhar_key();
        if state
            .employees
            .iter()
            .any(|e| e.id != employee.id && e.aadhar_key() == key)
        {
            return Err(StoreError::Conflict("aadhar"));
        }
        let slot = state
            .employees
            .iter_mut()
            .find(|e| e.id == employee.id)
            .ok_or(StoreError::NotFound("employee"))?;
        *slot = employee.clone();
        Ok(())
    }
}

#[async_trait]
impl CustomerStore for InMemoryPortalStore {
    async fn insert_customer(&self, customer: &Customer) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let key = customer.official_id_key();
        if state.customers.iter().any(|c| c.official_id_key() == key) {
            return Err(StoreError::Conflict("officialId"));
        }
        state.customers.push(customer.clone());
        Ok(())
    }

    async fn get_customer(&self, id: CustomerId) -> Result<Option<Customer>, StoreError> {
        Ok(self.read()?.customers.iter().find(|c| c.id == id).cloned())
    }

    async fn list_customers(&self, dealer: Option<DealerId>) -> Result<Vec<Customer>, StoreError> {
        Ok(self
            .read()?
            .customers
            .iter()
            .filter(|c| dealer.is_none_or(|d| c.dealer_id == d))
            .cloned()
            .collect())
    }

    async fn update_customer(&self, customer: &Customer) -> Result<(), StoreError> {
        let mut state = self.write()?;
        let key = customer.official_id_key();
        if state
            .customers
            .iter()
            .any(|c| c.id != customer.id && c.official_id_key() == key)
        {
            return Err(StoreError::Conflict("officialId"));
        }
        let slot = state
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or(StoreError::NotFound("customer"))?;
        *slot = customer.clone();
        Ok(())
    }
}

#[async_trait]
impl AuditStore for InMemoryPortalStore {
    async fn append_audit(&self, entry: &AuditEntry) -> Result<(), StoreError> {
        self.write()?.audit.push(entry.clone());
        Ok(())
    }

    async fn list_audit(&self, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let state = self.read()?;
        Ok(newest_first(state.audit.iter().cloned(), limit))
    }

    async fn list_audit_for_dealer(&self, dealer: DealerId, limit: usize) -> Result<Vec<AuditEntry>, StoreError> {
        let state = self.read()?;
        let scoped: Vec<AuditEntry> = state
            .audit
            .iter()
            .filter(|e| e.dealer_id == Some(dealer))
            .cloned()
            .collect();
        Ok(newest_first(scoped.into_iter(), limit))
    }
}
