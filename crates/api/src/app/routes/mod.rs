use axum::{middleware::from_fn, routing::get, Router};

use crate::middleware;

pub mod admin;
pub mod audit;
pub mod auth;
pub mod common;
pub mod customers;
pub mod employees;
pub mod search;
pub mod system;

/// Endpoints reachable without a session.
pub fn public_router() -> Router {
    Router::new()
        .route("/health", get(system::health))
        .merge(auth::public_router())
}

/// Endpoints that need a session. Admin-only trees are merged in here.
pub fn router() -> Router {
    Router::new()
        .merge(auth::router())
        .nest("/api/employees", employees::router())
        .nest("/api/customers", customers::router())
        .nest("/api/search", search::router())
        .merge(admin_router())
}

/// Dealer management and audit views.
pub fn admin_router() -> Router {
    Router::new()
        .nest("/api/admin/dealers", admin::router())
        .nest("/api/audit", audit::router())
        .layer(from_fn(middleware::require_admin))
}
