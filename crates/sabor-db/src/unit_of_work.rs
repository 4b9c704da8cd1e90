//! # Unit of Work
//!
//! An explicit transaction scope. Services open one, obtain transaction-bound
//! stores from it, and end it with [`UnitOfWork::commit`] or
//! [`UnitOfWork::rollback`]. Dropping it without committing rolls back.
//!
//! ## Shape of a Write
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  let mut uow = db.begin().await?;                                       │
//! │                                                                         │
//! │  uow.products().take_stock(..)     ─┐                                   │
//! │  uow.sales().insert_sale(..)        │  same connection, same           │
//! │  uow.sales().insert_item(..)        │  SQLite transaction              │
//! │  uow.movements().append(..)        ─┘                                   │
//! │                                                                         │
//! │  uow.commit().await?;      all rows become visible at once             │
//! │  (early return / drop)     nothing persists                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every read inside a unit of work must go through its stores. The pool may
//! have a single connection (in-memory databases), which this scope holds.

use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::movement::MovementLedger;
use crate::repository::product::ProductStore;
use crate::repository::sale::SaleStore;

/// A single SQLite transaction with typed access to the stores.
pub struct UnitOfWork {
    tx: Transaction<'static, Sqlite>,
}

impl UnitOfWork {
    /// Begins a deferred transaction.
    ///
    /// The write lock is taken by the first write statement. Writers that
    /// start with a write wait out the busy timeout instead of failing.
    pub async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool.begin().await.map_err(|e| match DbError::from(e) {
            DbError::Internal(msg) => DbError::TransactionFailed(msg),
            other => other,
        })?;

        debug!("Unit of work started");
        Ok(UnitOfWork { tx })
    }

    pub fn products(&mut self) -> ProductStore<'_> {
        ProductStore::new(&mut *self.tx)
    }

    pub fn sales(&mut self) -> SaleStore<'_> {
        SaleStore::new(&mut *self.tx)
    }

    pub fn movements(&mut self) -> MovementLedger<'_> {
        MovementLedger::new(&mut *self.tx)
    }

    /// Makes every write of this unit of work durable.
    pub async fn commit(self) -> DbResult<()> {
        self.tx.commit().await.map_err(|e| match DbError::from(e) {
            DbError::Internal(msg) => DbError::TransactionFailed(msg),
            other => other,
        })?;

        debug!("Unit of work committed");
        Ok(())
    }

    /// Discards every write of this unit of work.
    pub async fn rollback(self) -> DbResult<()> {
        self.tx
            .rollback()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!("Unit of work rolled back");
        Ok(())
    }
}
