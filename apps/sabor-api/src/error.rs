//! # API Error Type
//!
//! Unified error type for HTTP handlers.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Sabor POS                              │
//! │                                                                         │
//! │  Handler: Result<T, ApiError>                                          │
//! │         │                                                               │
//! │         ├── body rejected by serde ──────────► INVALID_INPUT    400    │
//! │         ├── loose field not a number ────────► INVALID_INPUT    400    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  EngineError { kind, message }                                          │
//! │         ├── InvalidInput ────────────────────► INVALID_INPUT    400    │
//! │         ├── Unauthorized ────────────────────► UNAUTHORIZED     401    │
//! │         ├── NotFound ────────────────────────► NOT_FOUND        404    │
//! │         ├── DuplicateKey ────────────────────► DUPLICATE_KEY    409    │
//! │         ├── InsufficientStock ───────────────► INSUFFICIENT_STOCK 409  │
//! │         ├── ConcurrencyConflict ─────────────► CONCURRENCY_CONFLICT 409│
//! │         └── Unavailable ─────────────────────► UNAVAILABLE      500    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The body is always `{"code": "...", "message": "..."}`. Storage details
//! never reach it; the engine has already logged them.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use sabor_core::ValidationError;
use sabor_engine::{EngineError, ErrorKind};

/// API error returned from handlers.
///
/// ```json
/// {
///   "code": "INSUFFICIENT_STOCK",
///   "message": "Insufficient stock for Kernel Burger: 2 available, 5 requested"
/// }
/// ```
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// 400
    InvalidInput,
    /// 401
    Unauthorized,
    /// 404
    NotFound,
    /// 409
    DuplicateKey,
    /// 409
    InsufficientStock,
    /// 409, retryable
    ConcurrencyConflict,
    /// 500
    Unavailable,
}

impl ErrorCode {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::DuplicateKey
            | ErrorCode::InsufficientStock
            | ErrorCode::ConcurrencyConflict => StatusCode::CONFLICT,
            ErrorCode::Unavailable => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl ApiError {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::InvalidInput, message)
    }

    pub fn unauthorized() -> Self {
        ApiError::new(ErrorCode::Unauthorized, "Authentication required")
    }
}

impl From<ErrorKind> for ErrorCode {
    fn from(kind: ErrorKind) -> Self {
        match kind {
            ErrorKind::InvalidInput => ErrorCode::InvalidInput,
            ErrorKind::Unauthorized => ErrorCode::Unauthorized,
            ErrorKind::NotFound => ErrorCode::NotFound,
            ErrorKind::DuplicateKey => ErrorCode::DuplicateKey,
            ErrorKind::InsufficientStock => ErrorCode::InsufficientStock,
            ErrorKind::ConcurrencyConflict => ErrorCode::ConcurrencyConflict,
            ErrorKind::Unavailable => ErrorCode::Unavailable,
        }
    }
}

impl From<EngineError> for ApiError {
    fn from(err: EngineError) -> Self {
        ApiError::new(err.kind.into(), err.message)
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::invalid_input(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected JSON body");
        ApiError::invalid_input(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::invalid_input(format!("Invalid query string: {}", rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.code.status(), Json(self)).into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;
