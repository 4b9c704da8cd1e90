//! # Stock Adjustment Service
//!
//! Manual "set to" corrections of on-hand quantity.
//!
//! ```text
//! adjust_stock(id, 50) with 32 on hand
//!      │
//!      ▼
//! UnitOfWork
//!      ├── products.lock_for_update(id)     → current = 32 (NotFound if absent)
//!      ├── plan_adjustment(id, 32, 50)      → ENTRADA 18 AJUSTE_MANUAL
//!      ├── products.set_stock(id, 50)
//!      ├── movements.append(draft)          (skipped when delta == 0)
//!      └── commit
//! ```

use tracing::{debug, info};

use crate::error::{EngineError, EngineResult};
use sabor_core::ledger::plan_adjustment;
use sabor_core::validation::{validate_id, validate_stock_level};
use sabor_core::Product;
use sabor_db::Database;

#[derive(Debug, Clone)]
pub struct StockAdjustmentService {
    db: Database,
}

impl StockAdjustmentService {
    pub fn new(db: Database) -> Self {
        StockAdjustmentService { db }
    }

    /// Sets a product's on-hand quantity to `target` and records the
    /// difference in the ledger.
    ///
    /// ## Errors
    /// - `InvalidInput` - non-positive id or negative target
    /// - `NotFound` - unknown product
    pub async fn adjust_stock(&self, product_id: i64, target: i64) -> EngineResult<Product> {
        let product_id = validate_id("id", product_id)?;
        let target = validate_stock_level("quantity", target)?;

        let mut uow = self.db.begin().await?;

        let current = uow.products().lock_for_update(product_id).await?;
        let plan = plan_adjustment(product_id, current.stock_quantity, target);

        debug!(
            product_id,
            previous = plan.previous,
            target = plan.target,
            "Adjusting stock"
        );

        uow.products().set_stock(product_id, plan.target).await?;

        if let Some(draft) = &plan.movement {
            uow.movements().append(draft).await?;
        }

        let updated = uow
            .products()
            .get_by_id(product_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", product_id))?;

        uow.commit().await?;

        info!(
            product_id,
            previous = plan.previous,
            stock = updated.stock_quantity,
            delta = plan.delta(),
            "Stock adjusted"
        );
        Ok(updated)
    }
}
