//! # Sale Transaction Engine
//!
//! Turns an untrusted cart into a committed, stock-consistent sale.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         submit_sale                                     │
//! │                                                                         │
//! │  VALIDATE (no writes, any failure returns before the unit of work)     │
//! │  1. validate_cart            empty cart, non-positive id/quantity      │
//! │  2. normalize_payment_tag    blank → "Dinheiro"                        │
//! │  3. operator still exists    NotFound                                  │
//! │  4. products.get_many(ids)   one catalog read                          │
//! │  5. price_cart               ProductNotFound / InsufficientStock,      │
//! │                              prices frozen from the catalog            │
//! │                                                                         │
//! │  COMMIT (one unit of work, all or nothing)                             │
//! │  6. take_stock per product   WHERE stock >= q AND price = p            │
//! │       └── 0 rows → re-read → InsufficientStock | ConcurrencyConflict   │
//! │  7. insert_sale              total, tag, operator, now                 │
//! │  8. insert_item per line     frozen unit price                         │
//! │  9. append SAIDA/VENDA per product                                     │
//! │ 10. commit                                                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Step 6 is the first statement of the unit of work and a write, so the
//! SQLite write lock is taken before anything is decided inside it. Two
//! sales racing for the last unit serialise there; the loser's conditional
//! update matches no row.

use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult};
use sabor_core::ledger::MovementDraft;
use sabor_core::pricing::{price_cart, referenced_product_ids, validate_cart, CartLine, PricedCart};
use sabor_core::report::SaleDetail;
use sabor_core::validation::normalize_payment_tag;
use sabor_core::{CoreError, Operator};
use sabor_db::{Database, NewSale, UnitOfWork};

#[derive(Debug, Clone)]
pub struct SaleEngine {
    db: Database,
}

impl SaleEngine {
    pub fn new(db: Database) -> Self {
        SaleEngine { db }
    }

    /// Commits a sale for `operator`, or nothing.
    ///
    /// ## Errors
    /// - `InvalidInput` - empty cart, non-positive id or quantity, or a
    ///   subtotal or total past the `i64` cents range
    /// - `NotFound` - unknown product (named) or operator
    /// - `InsufficientStock` - demand exceeds stock, named per product
    /// - `ConcurrencyConflict` - a concurrent change invalidated the pricing
    /// - `Unavailable` - storage failure
    pub async fn submit_sale(
        &self,
        items: &[CartLine],
        payment_tag: Option<&str>,
        operator: &Operator,
    ) -> EngineResult<SaleDetail> {
        validate_cart(items)?;
        let payment_tag = normalize_payment_tag(payment_tag)?;

        debug!(
            operator_id = operator.id,
            lines = items.len(),
            payment_tag = %payment_tag,
            "Submitting sale"
        );

        if self.db.operators().get_by_id(operator.id).await?.is_none() {
            warn!(operator_id = operator.id, "Sale by unknown operator");
            return Err(EngineError::not_found("Operator", operator.id));
        }

        let ids = referenced_product_ids(items);
        let catalog = self.db.products().get_many(&ids).await?;

        let priced = price_cart(items, &catalog).map_err(|e| {
            warn!(error = %e, "Sale rejected");
            EngineError::from(e)
        })?;

        let sale_id = self.commit(&priced, &payment_tag, operator.id).await?;

        let detail = self
            .db
            .sales()
            .get_detail(sale_id)
            .await?
            .ok_or_else(|| EngineError::not_found("Sale", sale_id))?;

        info!(
            sale_id,
            operator_id = operator.id,
            total = %detail.total,
            items = detail.items.len(),
            payment_tag = %detail.payment_tag,
            "Sale committed"
        );
        Ok(detail)
    }

    /// Runs steps 6-10. Returns the new sale id.
    async fn commit(
        &self,
        priced: &PricedCart,
        payment_tag: &str,
        operator_id: i64,
    ) -> EngineResult<i64> {
        let mut uow = self.db.begin().await?;

        for demand in &priced.demand {
            let taken = uow
                .products()
                .take_stock(demand.product_id, demand.quantity, demand.unit_price)
                .await?;

            if !taken {
                let err = Self::explain_rejected_take(
                    &mut uow,
                    demand.product_id,
                    &demand.product_name,
                    demand.quantity,
                )
                .await?;
                uow.rollback().await?;
                warn!(product_id = demand.product_id, error = %err, "Sale rolled back");
                return Err(err);
            }
        }

        let sale = uow
            .sales()
            .insert_sale(&NewSale {
                total: priced.total,
                payment_tag: payment_tag.to_string(),
                operator_id,
            })
            .await?;

        for line in &priced.lines {
            uow.sales()
                .insert_item(sale.id, line.product_id, line.quantity, line.unit_price)
                .await?;
        }

        for demand in &priced.demand {
            uow.movements()
                .append(&MovementDraft::sale(demand.product_id, demand.quantity, sale.id))
                .await?;
        }

        uow.commit().await?;

        Ok(sale.id)
    }

    /// Works out why a conditional decrement matched no row, reading through
    /// the unit of work's own connection.
    async fn explain_rejected_take(
        uow: &mut UnitOfWork,
        product_id: i64,
        product_name: &str,
        requested: i64,
    ) -> EngineResult<EngineError> {
        let current = uow.products().get_by_id(product_id).await?;

        Ok(match current {
            None => CoreError::ProductNotFound(product_id).into(),
            Some(product) if !product.has_stock_for(requested) => CoreError::InsufficientStock {
                product: product_name.to_string(),
                available: product.stock_quantity,
                requested,
            }
            .into(),
            Some(_) => EngineError::conflict(format!(
                "The price of {product_name} changed while the sale was being processed; retry"
            )),
        })
    }
}
