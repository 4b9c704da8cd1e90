//! # sabor-api: HTTP Back-Office for Sabor POS
//!
//! JSON over HTTP for the cashier screen and the back-office pages.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  HTTP request                                                           │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  TraceLayer ──► router ──► CurrentOperator (cookie / bearer)            │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                   dto: loose JSON ──► typed request                     │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                   sabor-engine service ──► sabor-db (SQLite)            │
//! │                               │                                         │
//! │                               ▼                                         │
//! │                   dto response  or  ApiError {code, message}            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod session;
pub mod state;

pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult, ErrorCode};
pub use routes::router;
pub use state::{AppState, CookieSettings};

use tracing_subscriber::EnvFilter;

/// Initializes the tracing subscriber for logging.
///
/// `RUST_LOG` overrides the default filter.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sabor=debug,sqlx=warn,tower_http=debug"));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}
