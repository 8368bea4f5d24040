//! Application error taxonomy and its HTTP mapping.
//!
//! Client-input errors ([`AppError::InvalidUrl`], [`AppError::InvalidCode`])
//! and [`AppError::NotFound`] are returned to the caller as-is. Store errors
//! are logged with their details and rendered as a generic server error.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Machine-readable error payload.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The submitted long URL is not an absolute http(s) URL.
    #[error("{message}")]
    InvalidUrl { message: String, details: Value },

    /// The short code contains characters outside the base62 alphabet.
    #[error("{message}")]
    InvalidCode { message: String, details: Value },

    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The durable store could not be reached or did not answer in time.
    #[error("{message}")]
    StoreUnavailable { message: String, details: Value },

    /// The durable store rejected a write.
    #[error("{message}")]
    StoreWriteFailed { message: String, details: Value },
}

impl AppError {
    pub fn invalid_url(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidUrl {
            message: message.into(),
            details,
        }
    }
    pub fn invalid_code(message: impl Into<String>, details: Value) -> Self {
        Self::InvalidCode {
            message: message.into(),
            details,
        }
    }
    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }
    pub fn store_unavailable(message: impl Into<String>, details: Value) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            details,
        }
    }
    pub fn store_write_failed(message: impl Into<String>, details: Value) -> Self {
        Self::StoreWriteFailed {
            message: message.into(),
            details,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidUrl { .. } | Self::InvalidCode { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::StoreUnavailable { .. } | Self::StoreWriteFailed { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::InvalidUrl { .. } => "invalid_url",
            Self::InvalidCode { .. } => "invalid_code",
            Self::NotFound { .. } => "not_found",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::StoreWriteFailed { .. } => "store_write_failed",
        }
    }

    /// Returns true for infrastructure failures (as opposed to client errors).
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Self::StoreUnavailable { .. } | Self::StoreWriteFailed { .. }
        )
    }

    fn details(&self) -> &Value {
        match self {
            Self::InvalidUrl { details, .. }
            | Self::InvalidCode { details, .. }
            | Self::NotFound { details, .. }
            | Self::StoreUnavailable { details, .. }
            | Self::StoreWriteFailed { details, .. } => details,
        }
    }

    /// Converts the error into the payload sent to clients.
    ///
    /// Store errors are reduced to a generic message; their details stay in the logs.
    pub fn to_error_info(&self) -> ErrorInfo {
        if self.is_store_error() {
            return ErrorInfo {
                code: self.error_code(),
                message: "Server error".to_string(),
                details: json!({}),
            };
        }

        ErrorInfo {
            code: self.error_code(),
            message: self.to_string(),
            details: self.details().clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.is_store_error() {
            tracing::error!(
                code = self.error_code(),
                details = %self.details(),
                "{}",
                self
            );
        }

        let status = self.status_code();
        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        if let Some(db) = e.as_database_error()
            && (db.is_unique_violation() || db.is_check_violation())
        {
            return AppError::store_write_failed(
                "Store rejected the write",
                json!({ "constraint": db.constraint(), "reason": db.message() }),
            );
        }

        AppError::store_unavailable("Database error", json!({ "reason": e.to_string() }))
    }
}

impl From<redis::RedisError> for AppError {
    fn from(e: redis::RedisError) -> Self {
        AppError::store_unavailable("Redis error", json!({ "reason": e.to_string() }))
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        AppError::invalid_url("Invalid URL", json!({ "reason": e.to_string() }))
    }
}
