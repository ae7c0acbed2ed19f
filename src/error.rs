// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

use crate::auth::AuthError;
use crate::database::StorageError;
use crate::filter::error::FilterError;

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    Validation(String),
    InvalidTarget(String),
    InvalidFilter(String),
    InvalidOrder(String),

    // 401 Unauthorized
    Unauthenticated(String),
    PrincipalNotFound(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict (ownership conflicts included, existing clients expect 409 over 403)
    Forbidden(String),
    Conflict(String),

    // 500 Internal Server Error
    Storage(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_)
            | ApiError::InvalidTarget(_)
            | ApiError::InvalidFilter(_)
            | ApiError::InvalidOrder(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthenticated(_) | ApiError::PrincipalNotFound(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Forbidden(_) | ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::Validation(msg)
            | ApiError::InvalidTarget(msg)
            | ApiError::InvalidFilter(msg)
            | ApiError::InvalidOrder(msg)
            | ApiError::Unauthenticated(msg)
            | ApiError::PrincipalNotFound(msg)
            | ApiError::NotFound(msg)
            | ApiError::Forbidden(msg)
            | ApiError::Conflict(msg)
            | ApiError::Storage(msg) => msg,
        }
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "VALIDATION_ERROR",
            ApiError::InvalidTarget(_) => "INVALID_TARGET",
            ApiError::InvalidFilter(_) => "INVALID_FILTER",
            ApiError::InvalidOrder(_) => "INVALID_ORDER",
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::PrincipalNotFound(_) => "PRINCIPAL_NOT_FOUND",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::Storage(_) => "INTERNAL_SERVER_ERROR",
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "Error": self.message(),
            "code": self.error_code()
        })
    }
}

// Static constructor methods
impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::Validation(message.into())
    }

    pub fn invalid_target(message: impl Into<String>) -> Self {
        ApiError::InvalidTarget(message.into())
    }

    pub fn invalid_filter(message: impl Into<String>) -> Self {
        ApiError::InvalidFilter(message.into())
    }

    pub fn invalid_order(message: impl Into<String>) -> Self {
        ApiError::InvalidOrder(message.into())
    }

    pub fn unauthenticated(message: impl Into<String>) -> Self {
        ApiError::Unauthenticated(message.into())
    }

    pub fn principal_not_found(message: impl Into<String>) -> Self {
        ApiError::PrincipalNotFound(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ApiError::Storage(message.into())
    }
}

// Convert other error types to ApiError
impl From<StorageError> for ApiError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(msg) => ApiError::not_found(msg),
            StorageError::Conflict(msg) => ApiError::conflict(msg),
            StorageError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::storage("Server error")
            }
            other => {
                tracing::error!("Storage error: {}", other);
                ApiError::storage("Server error")
            }
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(err: FilterError) -> Self {
        // Filters are composed server-side, so a malformed one is our bug
        tracing::error!("Query composition error: {}", err);
        ApiError::storage("Server error")
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidToken(msg) => {
                tracing::warn!("Rejected credential: {}", msg);
                ApiError::unauthenticated("Not authenticated")
            }
            AuthError::Expired => ApiError::unauthenticated("Not authenticated"),
            other => {
                tracing::error!("Credential service error: {}", other);
                ApiError::storage("Server error")
            }
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status_code(), Json(self.to_json())).into_response()
    }
}
