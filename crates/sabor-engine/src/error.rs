//! # Engine Error Types
//!
//! The error taxonomy every caller of the engine sees.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                              ErrorKind                          │
//! │  ──────                              ─────────                          │
//! │  ValidationError                 →   InvalidInput                       │
//! │  CoreError::ProductNotFound      →   NotFound                           │
//! │  CoreError::InsufficientStock    →   InsufficientStock                  │
//! │  DbError::NotFound               →   NotFound                           │
//! │  DbError::UniqueViolation        →   DuplicateKey                       │
//! │  DbError::Busy / PoolExhausted   →   ConcurrencyConflict                │
//! │  anything else from storage      →   Unavailable (logged, generic msg)  │
//! │  bad password / bad token        →   Unauthorized                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::fmt;

use thiserror::Error;
use tracing::error;

use sabor_core::{CoreError, ValidationError};
use sabor_db::DbError;

/// Category of an engine failure. Transports map this to their own codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or out-of-domain request data. Rejected before any write.
    InvalidInput,
    /// Referenced product, operator or sale does not exist.
    NotFound,
    /// Requested quantity exceeds what is on hand.
    InsufficientStock,
    /// Barcode or login collision on creation.
    DuplicateKey,
    /// A concurrent mutation invalidated an earlier read. Retryable.
    ConcurrencyConflict,
    /// Storage failure. Details are logged, never returned.
    Unavailable,
    /// Missing or invalid credentials.
    Unauthorized,
}

impl ErrorKind {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::InvalidInput => "INVALID_INPUT",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::InsufficientStock => "INSUFFICIENT_STOCK",
            ErrorKind::DuplicateKey => "DUPLICATE_KEY",
            ErrorKind::ConcurrencyConflict => "CONCURRENCY_CONFLICT",
            ErrorKind::Unavailable => "UNAVAILABLE",
            ErrorKind::Unauthorized => "UNAUTHORIZED",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An engine failure: a kind plus a caller-safe message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("[{kind}] {message}")]
pub struct EngineError {
    pub kind: ErrorKind,
    pub message: String,
}

impl EngineError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        EngineError {
            kind,
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        EngineError::new(ErrorKind::InvalidInput, message)
    }

    pub fn not_found(entity: &str, id: impl fmt::Display) -> Self {
        EngineError::new(ErrorKind::NotFound, format!("{entity} not found: {id}"))
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        EngineError::new(ErrorKind::Unauthorized, message)
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        EngineError::new(ErrorKind::ConcurrencyConflict, message)
    }

    /// Generic processing failure. The cause goes to the log only.
    pub fn unavailable(context: &str, cause: impl fmt::Display) -> Self {
        error!(context, error = %cause, "Storage failure");
        EngineError::new(ErrorKind::Unavailable, "Failed to process the request")
    }
}

/// Result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::invalid_input(err.to_string())
    }
}

impl From<CoreError> for EngineError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ProductNotFound(id) => EngineError::not_found("Product", id),
            err @ CoreError::InsufficientStock { .. } => {
                EngineError::new(ErrorKind::InsufficientStock, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<DbError> for EngineError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => EngineError::not_found(&entity, id),
            DbError::UniqueViolation { field, value } => EngineError::new(
                ErrorKind::DuplicateKey,
                format!("{field} '{value}' already exists"),
            ),
            err if err.is_busy() => {
                tracing::warn!(error = %err, "Storage contention");
                EngineError::conflict("The operation conflicted with a concurrent change; retry")
            }
            other => EngineError::unavailable("database", other),
        }
    }
}
