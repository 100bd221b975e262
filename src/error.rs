//! Common error types for the reference-data gateway

use axum::{
    extract::rejection::QueryRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("Upstream returned {status}: {message}")]
    UpstreamStatus { status: u16, message: String },

    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Upstream returned an invalid payload: {0}")]
    InvalidPayload(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Method not allowed: {0}")]
    MethodNotAllowed(String),

    #[error("Route not found: {0}")]
    NotFound(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error response format
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub message: String,
    pub r#type: String,
    pub code: Option<String>,
}

impl AppError {
    /// HTTP status this error is reported with
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Config(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::HttpClient(_)
            | AppError::UpstreamUnavailable(_)
            | AppError::InvalidPayload(_) => StatusCode::BAD_GATEWAY,
            // Relay the upstream's own failure status; anything that is not a
            // client or server error (1xx, 3xx) is reported as a bad gateway.
            AppError::UpstreamStatus { status, .. } => StatusCode::from_u16(*status)
                .ok()
                .filter(|s| s.is_client_error() || s.is_server_error())
                .unwrap_or(StatusCode::BAD_GATEWAY),
            AppError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    fn error_type(&self) -> (&'static str, Option<&'static str>) {
        match self {
            AppError::Config(_) | AppError::Internal(_) => ("server_error", None),
            AppError::HttpClient(_) | AppError::UpstreamUnavailable(_) => {
                ("upstream_error", Some("upstream_unavailable"))
            }
            AppError::UpstreamStatus { .. } => ("upstream_error", Some("upstream_status")),
            AppError::InvalidPayload(_) => ("upstream_error", Some("invalid_upstream_payload")),
            AppError::Timeout(_) => ("timeout_error", Some("upstream_timeout")),
            AppError::InvalidRequest(_) => ("invalid_request_error", Some("invalid_query")),
            AppError::MethodNotAllowed(_) => ("invalid_request_error", Some("method_not_allowed")),
            AppError::NotFound(_) => ("not_found_error", Some("route_not_found")),
        }
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::InvalidRequest(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_type, code) = self.error_type();

        let body = Json(ErrorResponse {
            error: ErrorDetail {
                message: self.to_string(),
                r#type: error_type.to_string(),
                code: code.map(|c| c.to_string()),
            },
        });

        (status, body).into_response()
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, AppError>;
