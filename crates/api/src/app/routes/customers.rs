//! Customer routes, scoped the same way as employees.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use dealerhub_core::CustomerId;
use dealerhub_parties::CustomerUpdate;

use crate::app::dto::{CreateCustomerRequest, CustomerView, JsonBody, RecordFilter, TerminateRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::{ClientIp, PrincipalContext};

use super::common::parse_id;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_customers).post(create_customer))
        .route("/:id", get(get_customer).patch(update_customer))
        .route("/:id/terminate", post(terminate_customer))
}

/// GET /api/customers
pub async fn list_customers(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Query(filter): Query<RecordFilter>,
) -> Result<Json<Vec<CustomerView>>, ApiError> {
    let customers = services.list_customers(&principal, filter.dealer_id).await?;
    Ok(Json(customers.iter().map(CustomerView::from).collect()))
}

/// POST /api/customers
pub async fn create_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    JsonBody(body): JsonBody<CreateCustomerRequest>,
) -> Result<(StatusCode, Json<CustomerView>), ApiError> {
    let customer = services
        .create_customer(&principal, &ip, body.dealer_id, body.customer)
        .await?;
    Ok((StatusCode::CREATED, Json(CustomerView::from(&customer))))
}

/// GET /api/customers/:id
pub async fn get_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Path(id): Path<String>,
) -> Result<Json<CustomerView>, ApiError> {
    let id: CustomerId = parse_id(&id)?;
    let customer = services.get_customer(&principal, id).await?;
    Ok(Json(CustomerView::from(&customer)))
}

/// PATCH /api/customers/:id
pub async fn update_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<CustomerUpdate>,
) -> Result<Json<CustomerView>, ApiError> {
    let id: CustomerId = parse_id(&id)?;
    let customer = services.update_customer(&principal, &ip, id, body).await?;
    Ok(Json(CustomerView::from(&customer)))
}

/// POST /api/customers/:id/terminate
pub async fn terminate_customer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<TerminateRequest>,
) -> Result<Json<CustomerView>, ApiError> {
    let id: CustomerId = parse_id(&id)?;
    let customer = services
        .terminate_customer(&principal, &ip, id, body.reason, body.date)
        .await?;
    Ok(Json(CustomerView::from(&customer)))
}
