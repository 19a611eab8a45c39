use std::sync::Arc;

use axum::{
    extract::{Extension, Query},
    routing::get,
    Json, Router,
};

use dealerhub_search::SearchIndexEntry;

use crate::app::dto::SearchParams;
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::{ClientIp, PrincipalContext};

pub fn router() -> Router {
    Router::new().route("/", get(search))
}

/// GET /api/search?q=
///
/// Searches every tenant. Queries shorter than two characters return `[]`.
pub async fn search(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchIndexEntry>>, ApiError> {
    Ok(Json(services.search(&principal, &ip, &params.q).await?))
}
