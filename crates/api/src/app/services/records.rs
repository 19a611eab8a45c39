//! Tenant-scoped employee and customer operations.

use chrono::{DateTime, Utc};

use dealerhub_audit::{AuditAction, NewAuditEntry};
use dealerhub_core::{Aggregate, CustomerId, DealerId, DomainError, EmployeeId};
use dealerhub_dealers::DealerStatus;
use dealerhub_parties::{
    Customer, CustomerCommand, CustomerUpdate, Employee, EmployeeCommand, EmployeeUpdate, NewCustomer, NewEmployee,
};

use crate::app::errors::ApiError;
use crate::authz;
use crate::context::{ClientIp, PrincipalContext};

use super::AppServices;

impl AppServices {
    /// Newest first.
    pub async fn list_employees(
        &self,
        principal: &PrincipalContext,
        requested: Option<DealerId>,
    ) -> Result<Vec<Employee>, ApiError> {
        let owner = authz::owner_filter(principal, requested);
        let mut employees = self.store.list_employees(owner).await?;
        employees.reverse();
        Ok(employees)
    }

    pub async fn get_employee(&self, principal: &PrincipalContext, id: EmployeeId) -> Result<Employee, ApiError> {
        let employee = self
            .store
            .get_employee(id)
            .await?
            .ok_or(ApiError::not_found("employee"))?;
        authz::ensure_owner(principal, employee.dealer_id, "employee")?;
        Ok(employee)
    }

    pub async fn create_employee(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        requested_owner: Option<DealerId>,
        payload: NewEmployee,
    ) -> Result<Employee, ApiError> {
        let owner = self.resolve_owner(principal, requested_owner).await?;
        let employee = Employee::create(EmployeeId::new(), owner, payload.validated()?, self.clock.now());
        self.store.insert_employee(&employee).await?;

        self.record_tenant_action(
            principal,
            ip,
            owner,
            AuditAction::CreateEmployee,
            format!("Created employee {}", employee.full_name()),
        )
        .await;
        Ok(employee)
    }

    pub async fn update_employee(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        id: EmployeeId,
        update: EmployeeUpdate,
    ) -> Result<Employee, ApiError> {
        let employee = self
            .apply_employee_command(principal, id, EmployeeCommand::Update(update))
            .await?;
        self.record_tenant_action(
            principal,
            ip,
            employee.dealer_id,
            AuditAction::UpdateEmployee,
            format!("Updated employee {}", employee.full_name()),
        )
        .await;
        Ok(employee)
    }

    pub async fn terminate_employee(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        id: EmployeeId,
        reason: String,
        date: Option<DateTime<Utc>>,
    ) -> Result<Employee, ApiError> {
        let date = date.unwrap_or_else(|| self.clock.now());
        let employee = self
            .apply_employee_command(principal, id, EmployeeCommand::Terminate { reason, date })
            .await?;
        let details = format!(
            "Terminated employee {}: {}",
            employee.full_name(),
            employee.termination_reason.as_deref().unwrap_or_default()
        );
        self.record_tenant_action(principal, ip, employee.dealer_id, AuditAction::TerminateEmployee, details)
            .await;
        Ok(employee)
    }

    /// Newest first.
    pub async fn list_customers(
        &self,
        principal: &PrincipalContext,
        requested: Option<DealerId>,
    ) -> Result<Vec<Customer>, ApiError> {
        let owner = authz::owner_filter(principal, requested);
        let mut customers = self.store.list_customers(owner).await?;
        customers.reverse();
        Ok(customers)
    }

    pub async fn get_customer(&self, principal: &PrincipalContext, id: CustomerId) -> Result<Customer, ApiError> {
        let customer = self
            .store
            .get_customer(id)
            .await?
            .ok_or(ApiError::not_found("customer"))?;
        authz::ensure_owner(principal, customer.dealer_id, "customer")?;
        Ok(customer)
    }

    pub async fn create_customer(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        requested_owner: Option<DealerId>,
        payload: NewCustomer,
    ) -> Result<Customer, ApiError> {
        let owner = self.resolve_owner(principal, requested_owner).await?;
        let customer = Customer::create(CustomerId::new(), owner, payload.validated()?, self.clock.now());
        self.store.insert_customer(&customer).await?;

        self.record_tenant_action(
            principal,
            ip,
            owner,
            AuditAction::CreateCustomer,
            format!("Created customer {}", customer.name_or_entity),
        )
        .await;
        Ok(customer)
    }

    pub async fn update_customer(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        id: CustomerId,
        update: CustomerUpdate,
    ) -> Result<Customer, ApiError> {
        let customer = self
            .apply_customer_command(principal, id, CustomerCommand::Update(update))
            .await?;
        self.record_tenant_action(
            principal,
            ip,
            customer.dealer_id,
            AuditAction::UpdateCustomer,
            format!("Updated customer {}", customer.name_or_entity),
        )
        .await;
        Ok(customer)
    }

    pub async fn terminate_customer(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        id: CustomerId,
        reason: String,
        date: Option<DateTime<Utc>>,
    ) -> Result<Customer, ApiError> {
        let date = date.unwrap_or_else(|| self.clock.now());
        let customer = self
            .apply_customer_command(principal, id, CustomerCommand::Terminate { reason, date })
            .await?;
        let details = format!(
            "Terminated customer {}: {}",
            customer.name_or_entity,
            customer.termination_reason.as_deref().unwrap_or_default()
        );
        self.record_tenant_action(principal, ip, customer.dealer_id, AuditAction::TerminateCustomer, details)
            .await;
        Ok(customer)
    }

    /// Owner for a new record; an admin-named dealer must exist and not be deleted.
    async fn resolve_owner(&self, principal: &PrincipalContext, requested: Option<DealerId>) -> Result<DealerId, ApiError> {
        let owner = authz::owner_for_create(principal, requested)?;
        if principal.identity().is_admin() {
            let dealer = self.get_dealer(owner).await?;
            if dealer.status == DealerStatus::Deleted {
                return Err(DomainError::transition("dealer already deleted").into());
            }
        }
        Ok(owner)
    }

    async fn apply_employee_command(
        &self,
        principal: &PrincipalContext,
        id: EmployeeId,
        command: EmployeeCommand,
    ) -> Result<Employee, ApiError> {
        let mut employee = self.get_employee(principal, id).await?;
        employee.execute(&command)?;
        self.store.update_employee(&employee).await?;
        Ok(employee)
    }

    async fn apply_customer_command(
        &self,
        principal: &PrincipalContext,
        id: CustomerId,
        command: CustomerCommand,
    ) -> Result<Customer, ApiError> {
        let mut customer = self.get_customer(principal, id).await?;
        customer.execute(&command)?;
        self.store.update_customer(&customer).await?;
        Ok(customer)
    }

    async fn record_tenant_action(
        &self,
        principal: &PrincipalContext,
        ip: &ClientIp,
        owner: DealerId,
        action: AuditAction,
        details: String,
    ) {
        self.audit
            .record(NewAuditEntry::new(principal.actor(ip), action, details).scoped_to(owner))
            .await;
    }
}
