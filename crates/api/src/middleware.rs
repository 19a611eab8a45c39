use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use tracing::info;

use dealerhub_auth::Role;
use dealerhub_core::DomainError;

use crate::app::errors::ApiError;
use crate::app::services::AppServices;
use crate::authz;
use crate::context::{ClientIp, PrincipalContext};

/// Name of the HTTP-only session cookie.
pub const SESSION_COOKIE: &str = "token";

#[derive(Clone)]
pub struct AuthState {
    pub services: Arc<AppServices>,
}

/// Resolve the session token and insert the [`PrincipalContext`].
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = extract_credential(req.headers()).ok_or(DomainError::Unauthenticated)?;
    let principal = state.services.authenticate(&token).await?;
    req.extensions_mut().insert(principal);
    Ok(next.run(req).await)
}

/// Admin-only routes. Runs inside [`auth_middleware`].
pub async fn require_admin(req: Request, next: Next) -> Result<Response, ApiError> {
    let principal = req
        .extensions()
        .get::<PrincipalContext>()
        .ok_or(DomainError::Unauthenticated)?;
    authz::require_role(principal, Role::Admin)?;
    Ok(next.run(req).await)
}

/// Insert the [`ClientIp`] and log one line per request.
pub async fn request_context(State(state): State<AuthState>, mut req: Request, next: Next) -> Response {
    let ip = client_ip(&req, state.services.trust_proxy());
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    req.extensions_mut().insert(ip.clone());

    let started = Instant::now();
    let response = next.run(req).await;
    info!(
        method = %method,
        path = %path,
        status = response.status().as_u16(),
        latency_ms = started.elapsed().as_millis() as u64,
        client_ip = %ip.as_str(),
        "request"
    );
    response
}

/// Session token from the `Authorization: Bearer` header, falling back to
/// the session cookie. The header wins when both are present.
pub fn extract_credential(headers: &HeaderMap) -> Option<String> {
    extract_bearer(headers)
        .or_else(|| extract_cookie(headers, SESSION_COOKIE))
        .map(str::to_string)
}

fn extract_bearer(headers: &HeaderMap) -> Option<&str> {
    let header = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = header.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then_some(token)
}

fn extract_cookie<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, value)| *key == name && !value.is_empty())
        .map(|(_, value)| value)
}

/// Peer address of the connection. `X-Forwarded-For` is client-controlled
/// and only read when the deployment sits behind a trusted proxy.
fn client_ip(req: &Request, trust_proxy: bool) -> ClientIp {
    if trust_proxy {
        if let Some(ip) = forwarded_for(req.headers()) {
            return ClientIp(ip.to_string());
        }
    }
    req.extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| ClientIp(addr.ip().to_string()))
        .unwrap_or_else(ClientIp::unknown)
}

fn forwarded_for(headers: &HeaderMap) -> Option<&str> {
    headers
        .get("x-forwarded-for")?
        .to_str()
        .ok()?
        .split(',')
        .next()
        .map(str::trim)
        .filter(|v| !v.is_empty())
}

/// `Set-Cookie` value carrying a fresh session token.
pub fn session_cookie(token: &str, max_age_secs: i64, secure: bool) -> String {
    let mut cookie = format!("{SESSION_COOKIE}={token}; HttpOnly; Path=/; SameSite=Lax; Max-Age={max_age_secs}");
    if secure {
        cookie.push_str("; Secure");
    }
    cookie
}

/// `Set-Cookie` value that clears the session cookie.
pub fn clear_session_cookie(secure: bool) -> String {
    session_cookie("", 0, secure)
}
