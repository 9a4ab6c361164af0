use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// AppError
///
/// The closed set of failure kinds that can cross the HTTP boundary. Every variant
/// fixes its status code at construction time, so any error that reaches the
/// boundary layer is guaranteed to resolve to a valid HTTP status.
///
/// Handlers and the authorization gate never build failure responses themselves;
/// they return an `AppError` and the `IntoResponse` impl below is the single place
/// that serializes it for the client.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AppError {
    /// No valid credential could be resolved for the request (401).
    #[error("{0}")]
    Unauthorized(String),
    /// The caller is authenticated but their role is not permitted (403).
    #[error("{0}")]
    Forbidden(String),
    /// The requested resource does not exist (404).
    #[error("{0}")]
    NotFound(String),
    /// The request conflicts with existing state, e.g. a duplicate username (409).
    #[error("{0}")]
    Conflict(String),
    /// An unexpected internal failure (500).
    #[error("{0}")]
    Internal(String),
}

/// ErrorBody
///
/// The wire shape every failure is rendered as: `{ "message": ..., "statusCode": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    pub message: String,
    pub status_code: u16,
}

impl AppError {
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict(message.into())
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(message.into())
    }

    /// The HTTP status code this error maps to. Fixed per variant.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The human-readable message carried by this error, unchanged from construction.
    pub fn message(&self) -> &str {
        match self {
            Self::Unauthorized(m)
            | Self::Forbidden(m)
            | Self::NotFound(m)
            | Self::Conflict(m)
            | Self::Internal(m) => m,
        }
    }
}

/// Boundary layer: the only place an `AppError` becomes an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 5xx failures are logged with their full message; the body still only
        // carries the message the error was constructed with.
        if status.is_server_error() {
            tracing::error!("internal error: {}", self.message());
        }

        let body = ErrorBody {
            message: self.message().to_string(),
            status_code: status.as_u16(),
        };

        (status, Json(body)).into_response()
    }
}

/// Database failures surface as internal errors. The sqlx detail goes to the log,
/// not to the client.
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        tracing::error!("database error: {:?}", err);
        Self::Internal("database error".to_string())
    }
}
