//! # sabor-core: Pure Business Logic for Sabor POS
//!
//! Everything the back-office decides without touching storage lives here:
//! exact money arithmetic, cart pricing against an authoritative catalog
//! snapshot, the stock-delta rule behind manual adjustments, and the
//! arithmetic behind sales reports.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sabor POS Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 apps/sabor-api (axum routes)                    │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │       sabor-engine (SaleEngine, StockAdjustmentService, ...)    │   │
//! │  └──────────────┬──────────────────────────────────┬───────────────┘   │
//! │                 │                                  │                    │
//! │  ┌──────────────▼──────────────────┐   ┌───────────▼───────────────┐   │
//! │  │   ★ sabor-core (THIS CRATE) ★   │   │   sabor-db (SQLite)       │   │
//! │  │                                 │   │   repositories,           │   │
//! │  │  money   pricing   ledger       │◄──│   unit of work            │   │
//! │  │  types   validation report      │   │                           │   │
//! │  │                                 │   └───────────────────────────┘   │
//! │  │  NO I/O • NO DATABASE • PURE    │                                    │
//! │  └─────────────────────────────────┘                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain records (Product, Sale, StockMovement, Operator)
//! - [`money`] - Integer-cent money with decimal parsing
//! - [`error`] - Domain error types
//! - [`validation`] - Boundary validation and normalisation
//! - [`pricing`] - Cart validation and re-pricing
//! - [`ledger`] - Stock movement drafts and the adjustment delta rule
//! - [`report`] - Paging and summary arithmetic
//!
//! ## Example Usage
//!
//! ```rust
//! use sabor_core::money::Money;
//!
//! let price: Money = "22,00".parse().unwrap();
//! let total = price.multiply_quantity(3);
//! assert_eq!(total.to_string(), "66.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod ledger;
pub mod money;
pub mod pricing;
pub mod report;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Payment tag recorded when the cashier leaves the payment method blank.
pub const DEFAULT_PAYMENT_TAG: &str = "Dinheiro";

/// Page size used by the sales listing when none is requested.
pub const DEFAULT_PAGE_SIZE: i64 = 20;

/// Upper bound for the sales listing page size.
///
/// Larger requests are clamped, never rejected.
pub const MAX_PAGE_SIZE: i64 = 100;

/// Maximum length accepted for free-text names and tags.
pub const MAX_NAME_LENGTH: usize = 200;
