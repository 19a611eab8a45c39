//! Admin dealer management.
//!
//! Every route here sits behind `require_admin`.

use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use dealerhub_core::DealerId;
use dealerhub_dealers::{DealerProfileUpdate, NewDealer};

use crate::app::dto::{DealerView, JsonBody, ReasonRequest};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::{ClientIp, PrincipalContext};

use super::common::parse_id;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_dealers).post(create_dealer))
        .route("/:id", get(get_dealer).patch(update_dealer))
        .route("/:id/suspend", post(suspend_dealer))
        .route("/:id/activate", post(activate_dealer))
        .route("/:id/delete", post(delete_dealer))
        .route("/:id/reset-password", post(reset_password))
}

// ─────────────────────────────────────────────────────────────────────────────
// Reads
// ─────────────────────────────────────────────────────────────────────────────

/// GET /api/admin/dealers - All dealers, newest first
pub async fn list_dealers(
    Extension(services): Extension<Arc<AppServices>>,
) -> Result<Json<Vec<DealerView>>, ApiError> {
    let dealers = services.list_dealers().await?;
    Ok(Json(dealers.iter().map(DealerView::from).collect()))
}

/// GET /api/admin/dealers/:id
pub async fn get_dealer(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> Result<Json<DealerView>, ApiError> {
    let id: DealerId = parse_id(&id)?;
    let dealer = services.get_dealer(id).await?;
    Ok(Json(DealerView::from(&dealer)))
}

// ─────────────────────────────────────────────────────────────────────────────
// Lifecycle
// ─────────────────────────────────────────────────────────────────────────────

/// POST /api/admin/dealers - Create a dealer with a temporary password
pub async fn create_dealer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    JsonBody(body): JsonBody<NewDealer>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (dealer, temp_password) = services.create_dealer(&principal, &ip, body).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "dealer": DealerView::from(&dealer),
            "tempPassword": temp_password,
        })),
    ))
}

/// PATCH /api/admin/dealers/:id - Edit profile fields
pub async fn update_dealer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<DealerProfileUpdate>,
) -> Result<Json<DealerView>, ApiError> {
    let id: DealerId = parse_id(&id)?;
    let dealer = services.update_dealer(&principal, &ip, id, body).await?;
    Ok(Json(DealerView::from(&dealer)))
}

/// POST /api/admin/dealers/:id/suspend
pub async fn suspend_dealer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ReasonRequest>,
) -> Result<Json<DealerView>, ApiError> {
    let id: DealerId = parse_id(&id)?;
    let dealer = services.suspend_dealer(&principal, &ip, id, body.reason).await?;
    Ok(Json(DealerView::from(&dealer)))
}

/// POST /api/admin/dealers/:id/activate
pub async fn activate_dealer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<String>,
) -> Result<Json<DealerView>, ApiError> {
    let id: DealerId = parse_id(&id)?;
    let dealer = services.activate_dealer(&principal, &ip, id).await?;
    Ok(Json(DealerView::from(&dealer)))
}

/// POST /api/admin/dealers/:id/delete - Soft delete; the row is kept
pub async fn delete_dealer(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<String>,
    JsonBody(body): JsonBody<ReasonRequest>,
) -> Result<Json<DealerView>, ApiError> {
    let id: DealerId = parse_id(&id)?;
    let dealer = services.delete_dealer(&principal, &ip, id, body.reason).await?;
    Ok(Json(DealerView::from(&dealer)))
}

/// POST /api/admin/dealers/:id/reset-password
pub async fn reset_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let id: DealerId = parse_id(&id)?;
    let temp_password = services.reset_dealer_password(&principal, &ip, id).await?;
    Ok(Json(json!({ "tempPassword": temp_password })))
}
