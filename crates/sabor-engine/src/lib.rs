//! # sabor-engine: Sale & Inventory Transaction Engine
//!
//! The services that change state in Sabor POS, and the error taxonomy
//! their callers see.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  sabor-api handlers (authenticated Operator from the session)          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  sabor-engine (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │  SaleEngine            cart → sale + items + stock + ledger    │   │
//! │  │  StockAdjustmentService  set-to quantity + ledger              │   │
//! │  │  CatalogService        register / list / barcode lookup        │   │
//! │  │  SalesReportService    page + full-history summary             │   │
//! │  │  AuthService           login, session tokens                   │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │ pure rules                      │ storage                      │
//! │       ▼                                 ▼                              │
//! │  sabor-core (pricing, ledger)      sabor-db (UnitOfWork, repos)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every multi-row write runs inside one `sabor_db::UnitOfWork`. Validation
//! happens before the unit of work opens, so rejected requests never write.

pub mod auth;
pub mod catalog;
pub mod error;
pub mod report;
pub mod sale;
pub mod stock;

pub use auth::{AuthService, LoginOutcome, SessionManager, SessionToken};
pub use catalog::{CatalogService, ProductRegistration};
pub use error::{EngineError, EngineResult, ErrorKind};
pub use report::SalesReportService;
pub use sale::SaleEngine;
pub use stock::StockAdjustmentService;
