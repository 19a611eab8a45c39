use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use thiserror::Error;

use dealerhub_auth::TokenError;
use dealerhub_core::DomainError;
use dealerhub_infra::{CredentialError, StoreError};

/// Every failure a handler can return.
///
/// Rendered as `{ "error": <code>, "message": <text> }`. Backend failures
/// render a generic 500; their detail goes to the log only.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("{0}")]
    Internal(String),
}

impl From<CredentialError> for ApiError {
    fn from(err: CredentialError) -> Self {
        match err {
            CredentialError::Domain(e) => ApiError::Domain(e),
            CredentialError::Store(e) => ApiError::Store(e),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::Domain(DomainError::validation(msg))
    }

    pub fn not_found(what: &'static str) -> Self {
        ApiError::Domain(DomainError::not_found(what))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::Domain(e) => domain_error_to_response(e),
            ApiError::Store(StoreError::Conflict(field)) => {
                json_error(StatusCode::CONFLICT, "conflict", format!("{field} already exists"))
            }
            ApiError::Store(StoreError::NotFound(what)) => {
                json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found"))
            }
            ApiError::Store(StoreError::Backend(detail)) => internal(&detail),
            ApiError::Token(TokenError::Invalid) => {
                json_error(StatusCode::UNAUTHORIZED, "invalid_token", "invalid token")
            }
            ApiError::Token(TokenError::Expired) => {
                json_error(StatusCode::UNAUTHORIZED, "token_expired", "token expired")
            }
            ApiError::Token(TokenError::Signing(detail)) => internal(&detail),
            ApiError::Internal(detail) => internal(&detail),
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidCredentials => {
            json_error(StatusCode::UNAUTHORIZED, "invalid_credentials", "invalid credentials")
        }
        DomainError::Unauthenticated => {
            json_error(StatusCode::UNAUTHORIZED, "unauthenticated", "authentication required")
        }
        DomainError::Forbidden(msg) => json_error(StatusCode::FORBIDDEN, "forbidden", msg),
        DomainError::AccountNotActive(status) => json_error(
            StatusCode::FORBIDDEN,
            "account_not_active",
            format!("account is {status}"),
        ),
        DomainError::NotFound(what) => json_error(StatusCode::NOT_FOUND, "not_found", format!("{what} not found")),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::InvalidTransition(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_state", msg),
    }
}

fn internal(detail: &str) -> axum::response::Response {
    tracing::error!(error = %detail, "request failed");
    json_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "internal server error",
    )
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
