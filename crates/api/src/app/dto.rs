use axum::extract::{FromRequest, Request};
use axum::Json;
use chrono::{DateTime, NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use dealerhub_core::DealerId;
use dealerhub_dealers::{Dealer, DealerStatus};
use dealerhub_parties::{
    Customer, CustomerStatus, CustomerType, Employee, EmployeeStatus, NewCustomer, NewEmployee,
};

use crate::app::errors::ApiError;

/// `Json<T>` whose rejection renders as a 400 `validation_error`.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBody(value)),
            Err(rejection) => Err(ApiError::validation(rejection.body_text())),
        }
    }
}

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AdminLoginRequest {
    pub password: String,
}

/// `username` may also be the dealer's email.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ReasonRequest {
    pub reason: String,
}

#[derive(Debug, Deserialize)]
pub struct TerminateRequest {
    pub reason: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
}

/// `dealerId` is required when the admin creates a record and ignored for dealers.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmployeeRequest {
    #[serde(default)]
    pub dealer_id: Option<DealerId>,
    #[serde(flatten)]
    pub employee: NewEmployee,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub dealer_id: Option<DealerId>,
    #[serde(flatten)]
    pub customer: NewCustomer,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecordFilter {
    pub dealer_id: Option<DealerId>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    pub limit: Option<usize>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
}

// -------------------------
// Response DTOs
// -------------------------

/// Dealer as returned to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DealerView {
    pub id: DealerId,
    pub username: String,
    pub email: String,
    pub company_name: String,
    pub primary_contact_name: Option<String>,
    pub primary_contact_phone: Option<String>,
    pub address: Option<String>,
    pub force_password_change: bool,
    pub status: DealerStatus,
    pub suspension_reason: Option<String>,
    pub deletion_reason: Option<String>,
    pub deletion_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Dealer> for DealerView {
    fn from(d: &Dealer) -> Self {
        Self {
            id: d.id,
            username: d.username.clone(),
            email: d.email.clone(),
            company_name: d.company_name.clone(),
            primary_contact_name: d.primary_contact_name.clone(),
            primary_contact_phone: d.primary_contact_phone.clone(),
            address: d.address.clone(),
            force_password_change: d.force_password_change,
            status: d.status,
            suspension_reason: d.suspension_reason.clone(),
            deletion_reason: d.deletion_reason.clone(),
            deletion_date: d.deletion_date,
            created_at: d.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminView {
    pub id: String,
    pub username: String,
    pub role: &'static str,
}

/// Payload of `GET /api/auth/me`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum UserView {
    Admin(AdminView),
    Dealer(DealerUserView),
}

#[derive(Debug, Clone, Serialize)]
pub struct DealerUserView {
    #[serde(flatten)]
    pub dealer: DealerView,
    pub role: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeView {
    pub id: String,
    pub dealer_id: DealerId,
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: Option<String>,
    pub aadhar: String,
    pub designation: Option<String>,
    pub joining_date: Option<NaiveDate>,
    pub status: EmployeeStatus,
    pub termination_reason: Option<String>,
    pub termination_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Employee> for EmployeeView {
    fn from(e: &Employee) -> Self {
        Self {
            id: e.id.to_string(),
            dealer_id: e.dealer_id,
            first_name: e.first_name.clone(),
            last_name: e.last_name.clone(),
            phone: e.phone.clone(),
            email: e.email.clone(),
            aadhar: e.aadhar.clone(),
            designation: e.designation.clone(),
            joining_date: e.joining_date,
            status: e.status,
            termination_reason: e.termination_reason.clone(),
            termination_date: e.termination_date,
            created_at: e.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerView {
    pub id: String,
    pub dealer_id: DealerId,
    pub name_or_entity: String,
    pub customer_type: CustomerType,
    pub phone: String,
    pub email: Option<String>,
    pub official_id: String,
    pub address: Option<String>,
    pub status: CustomerStatus,
    pub termination_reason: Option<String>,
    pub termination_date: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl From<&Customer> for CustomerView {
    fn from(c: &Customer) -> Self {
        Self {
            id: c.id.to_string(),
            dealer_id: c.dealer_id,
            name_or_entity: c.name_or_entity.clone(),
            customer_type: c.customer_type,
            phone: c.phone.clone(),
            email: c.email.clone(),
            official_id: c.official_id.clone(),
            address: c.address.clone(),
            status: c.status,
            termination_reason: c.termination_reason.clone(),
            termination_date: c.termination_date,
            created_at: c.created_at,
        }
    }
}
