use std::sync::Arc;

use axum::{
    extract::{Extension, Path, Query},
    routing::get,
    Json, Router,
};

use dealerhub_audit::AuditEntry;
use dealerhub_core::DealerId;

use crate::app::dto::LimitQuery;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;

use super::common::parse_id;

/// Admin-only audit views.
pub fn router() -> Router {
    Router::new()
        .route("/", get(global_log))
        .route("/dealer/:id", get(dealer_log))
}

/// GET /api/audit?limit=N
pub async fn global_log(
    Extension(services): Extension<Arc<AppServices>>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    Ok(Json(services.audit_log(params.limit).await?))
}

/// GET /api/audit/dealer/:id?limit=N
pub async fn dealer_log(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    Query(params): Query<LimitQuery>,
) -> Result<Json<Vec<AuditEntry>>, ApiError> {
    let id: DealerId = parse_id(&id)?;
    Ok(Json(services.dealer_audit_log(id, params.limit).await?))
}
