//! # sabor-db: Database Layer for Sabor POS
//!
//! This crate provides database access for the Sabor POS back-office.
//! It uses SQLite with sqlx for async operations.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Sabor POS Data Flow                              │
//! │                                                                         │
//! │  sabor-engine service (SaleEngine, StockAdjustmentService, ...)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     sabor-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │  + Stores     │    │  (embedded)  │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ SqlitePool    │◄───│ ProductRepo   │    │ 001_initial_ │  │   │
//! │  │   │ UnitOfWork    │    │ SaleRepo      │    │ schema.sql   │  │   │
//! │  │   │               │    │ MovementRepo  │    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database (WAL)                       │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Repositories (pool reads) and stores (transactional writes)
//! - [`unit_of_work`] - Transaction scope handed to the engine
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sabor_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("path/to/sabor.db")).await?;
//!
//! let products = db.products().list_all().await?;
//!
//! let mut uow = db.begin().await?;
//! uow.products().set_stock(products[0].id, 10).await?;
//! uow.commit().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod unit_of_work;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};
pub use unit_of_work::UnitOfWork;

// Repository re-exports for convenience
pub use repository::movement::{MovementLedger, MovementRepository};
pub use repository::operator::{OperatorCredentials, OperatorRepository};
pub use repository::product::{NewProduct, ProductRepository, ProductStore};
pub use repository::sale::{NewSale, SaleRepository, SaleStore, SaleTotals};
