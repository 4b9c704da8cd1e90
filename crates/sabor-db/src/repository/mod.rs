//! # Repository Module
//!
//! Database repository implementations for Sabor POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Each entity has up to two faces:                                       │
//! │                                                                         │
//! │  XRepository          owns a SqlitePool clone; reads and standalone    │
//! │                       single-statement writes                          │
//! │                                                                         │
//! │  XStore<'tx>          borrows the connection of a UnitOfWork; every    │
//! │                       write that must commit together with others      │
//! │                                                                         │
//! │  Services get stores only from `UnitOfWork`, so a multi-row write      │
//! │  cannot accidentally run outside a transaction.                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`product`] - Catalog reads, stock writes
//! - [`sale`] - Sale headers, line items, report aggregates
//! - [`movement`] - Stock movement ledger
//! - [`operator`] - Operators and password hashes

pub mod movement;
pub mod operator;
pub mod product;
pub mod sale;
