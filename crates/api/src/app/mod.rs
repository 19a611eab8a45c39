//! HTTP application wiring.
//!
//! - `services/`: store selection and the operations behind each route
//! - `routes/`: handlers, one file per area
//! - `dto.rs`: request bodies and response views
//! - `errors.rs`: error-to-response mapping

use std::sync::Arc;

use axum::{middleware::from_fn_with_state, Extension, Router};
use tower::ServiceBuilder;

use crate::config::AppConfig;
use crate::middleware;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

pub use services::AppServices;

/// Build the full HTTP router from configuration.
pub async fn build_app(config: &AppConfig) -> anyhow::Result<Router> {
    let services = Arc::new(services::build_services(config).await?);
    Ok(router_with(services))
}

/// Build the router around already-wired services.
pub fn router_with(services: Arc<AppServices>) -> Router {
    let auth_state = middleware::AuthState {
        services: services.clone(),
    };

    let protected = routes::router().layer(from_fn_with_state(auth_state.clone(), middleware::auth_middleware));

    Router::new()
        .merge(routes::public_router())
        .merge(protected)
        .layer(
            ServiceBuilder::new()
                .layer(from_fn_with_state(auth_state, middleware::request_context))
                .layer(Extension(services)),
        )
}
