//! # Stock Movement Ledger
//!
//! Append-only log of every on-hand quantity change. The write path is
//! [`MovementLedger::append`], always inside the unit of work that changed
//! the stock. The engine never reads the ledger back; the read side exists
//! for audit consumers.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use sabor_core::ledger::MovementDraft;
use sabor_core::StockMovement;

const MOVEMENT_COLUMNS: &str = "id, product_id, quantity, kind, reason, sale_id, created_at";

/// Ledger reads for audit views.
#[derive(Debug, Clone)]
pub struct MovementRepository {
    pool: SqlitePool,
}

impl MovementRepository {
    pub fn new(pool: SqlitePool) -> Self {
        MovementRepository { pool }
    }

    /// Movements of one product, newest first.
    pub async fn for_product(&self, product_id: i64) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE product_id = ?1 ORDER BY id DESC"
        ))
        .bind(product_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    /// Movements written by one sale.
    pub async fn for_sale(&self, sale_id: i64) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(&format!(
            "SELECT {MOVEMENT_COLUMNS} FROM stock_movements WHERE sale_id = ?1 ORDER BY id"
        ))
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }

    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM stock_movements")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

/// Ledger appends bound to one unit of work.
pub struct MovementLedger<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> MovementLedger<'a> {
    pub(crate) fn new(conn: &'a mut SqliteConnection) -> Self {
        MovementLedger { conn }
    }

    /// Appends one immutable movement row.
    pub async fn append(&mut self, draft: &MovementDraft) -> DbResult<StockMovement> {
        debug!(
            product_id = draft.product_id,
            quantity = draft.quantity,
            kind = draft.kind.as_str(),
            reason = draft.reason.as_str(),
            "Appending stock movement"
        );

        let movement = sqlx::query_as::<_, StockMovement>(&format!(
            r#"
            INSERT INTO stock_movements (product_id, quantity, kind, reason, sale_id, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            RETURNING {MOVEMENT_COLUMNS}
            "#
        ))
        .bind(draft.product_id)
        .bind(draft.quantity)
        .bind(draft.kind)
        .bind(draft.reason)
        .bind(draft.sale_id)
        .bind(Utc::now())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(movement)
    }
}
