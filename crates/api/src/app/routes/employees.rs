//! Employee routes. Dealers see only their own rows; the admin sees all
//! and may narrow with `?dealerId=`.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use dealerhub_core::EmployeeId;
use dealerhub_parties::EmployeeUpdate;

use crate::app::dto::{CreateEmployeeRequest, EmployeeView, JsonBody, RecordFilter, TerminateRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::{ClientIp, PrincipalContext};

use super::common::parse_id;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_employees).post(create_employee))
        .route("/:id", get(get_employee).patch(update_employee))
        .route("/:id/terminate", post(terminate_employee))
}

/// GET /api/employees
pub async fn list_employees(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(filter): Query<RecordFilter>,
) -> Result<Json<Vec<EmployeeView>>, ApiError> {
    let employees = services.list_employees(&principal, filter.dealer_id).await?;
    Ok(Json(employees.iter().map(EmployeeView::from).collect()))
}

/// POST /api/employees
pub async fn create_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    JsonBody(body): JsonBody<CreateEmployeeRequest>,
) -> Result<(StatusCode, Json<EmployeeView>), ApiError> {
    let employee = services
        .create_employee(&principal, &ip, body.dealer_id, body.employee)
        .await?;
    Ok((StatusCode::CREATED, Json(EmployeeView::from(&employee))))
}

/// GET /api/employees/:id
pub async fn get_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Json<EmployeeView>, ApiError> {
    let id: EmployeeId = parse_id(&id)?;
    let employee = services.get_employee(&principal, id).await?;
    Ok(Json(EmployeeView::from(&employee)))
}

/// PATCH /api/employees/:id
pub async fn update_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<EmployeeUpdate>,
) -> Result<Json<EmployeeView>, ApiError> {
    let id: EmployeeId = parse_id(&id)?;
    let employee = services.update_employee(&principal, &ip, id, body).await?;
    Ok(Json(EmployeeView::from(&employee)))
}

/// POST /api/employees/:id/terminate
pub async fn terminate_employee(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<TerminateRequest>,
) -> Result<Json<EmployeeView>, ApiError> {
    let id: EmployeeId = parse_id(&id)?;
    let employee = services
        .terminate_employee(&principal, &ip, id, body.reason, body.date)
        .await?;
    Ok(Json(EmployeeView::from(&employee)))
}
