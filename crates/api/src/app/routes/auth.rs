//! Session routes: login, logout, current user and password flows.

use std::sync::Arc;

use axum::{
    extract::Extension,
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use crate::app::dto::{self, JsonBody};
use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::context::{ClientIp, PrincipalContext};
use crate::middleware::{clear_session_cookie, extract_credential, session_cookie};

/// Routes reachable without a session.
pub fn public_router() -> Router {
    Router::new()
        .route("/api/auth/admin/login", post(admin_login))
        .route("/api/auth/login", post(dealer_login))
        .route("/api/auth/me", get(me))
        .route("/api/auth/logout", post(logout))
        .route("/api/auth/forgot", post(forgot_password))
}

/// Routes that need a session.
pub fn router() -> Router {
    Router::new().route("/api/auth/change-password", post(change_password))
}

fn with_session_cookie(services: &AppServices, token: &str, body: serde_json::Value) -> Response {
    let cookie = session_cookie(token, services.tokens().ttl().num_seconds(), services.cookie_secure());
    (StatusCode::OK, [(header::SET_COOKIE, cookie)], Json(body)).into_response()
}

/// POST /api/auth/admin/login
pub async fn admin_login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ip): Extension<ClientIp>,
    JsonBody(body): JsonBody<dto::AdminLoginRequest>,
) -> Result<Response, ApiError> {
    let grant = services.admin_login(&body.password, &ip).await?;
    Ok(with_session_cookie(
        &services,
        &grant.token,
        json!({ "admin": grant.user, "token": grant.token }),
    ))
}

/// POST /api/auth/login
pub async fn dealer_login(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ip): Extension<ClientIp>,
    JsonBody(body): JsonBody<dto::LoginRequest>,
) -> Result<Response, ApiError> {
    let grant = services.dealer_login(&body.username, &body.password, &ip).await?;
    Ok(with_session_cookie(
        &services,
        &grant.token,
        json!({ "dealer": grant.user, "token": grant.token }),
    ))
}

/// GET /api/auth/me
pub async fn me(
    Extension(services): Extension<Arc<AppServices>>,
    headers: HeaderMap,
) -> Result<Json<serde_json::Value>, ApiError> {
    let token = extract_credential(&headers);
    let user = services.current_user(token.as_deref()).await?;
    Ok(Json(json!({ "user": user })))
}

/// POST /api/auth/logout
///
/// Only clears the cookie. The token itself stays valid until it expires.
pub async fn logout(Extension(services): Extension<Arc<AppServices>>) -> Response {
    (
        StatusCode::OK,
        [(header::SET_COOKIE, clear_session_cookie(services.cookie_secure()))],
        Json(json!({ "ok": true })),
    )
        .into_response()
}

/// POST /api/auth/forgot
pub async fn forgot_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(ip): Extension<ClientIp>,
    JsonBody(body): JsonBody<dto::ForgotPasswordRequest>,
) -> Json<serde_json::Value> {
    services.forgot_password(&body.username, &ip).await;
    Json(json!({ "ok": true }))
}

/// POST /api/auth/change-password
pub async fn change_password(
    Extension(services): Extension<Arc<AppServices>>,
    Extension(principal): Extension<PrincipalContext>,
    Extension(ip): Extension<ClientIp>,
    JsonBody(body): JsonBody<dto::ChangePasswordRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    services.change_password(&principal, &ip, &body.new_password).await?;
    Ok(Json(json!({ "ok": true })))
}
