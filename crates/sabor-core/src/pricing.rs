//! # Cart Pricing
//!
//! Turns an untrusted cart into a priced, stock-checked plan using only the
//! authoritative catalog snapshot. Client-asserted prices never enter here.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  [(id, qty), ...]                                                       │
//! │       │                                                                 │
//! │       ▼  validate_cart        1. non-empty  2. positive ids/quantities  │
//! │       │                                                                 │
//! │       ▼  (engine reads the products in one query)                      │
//! │       │                                                                 │
//! │       ▼  price_cart           3. every id resolves                      │
//! │       │                       4. aggregate demand <= stock per product  │
//! │       │                       5. subtotal = catalog price × qty         │
//! │       ▼                                                                 │
//! │  PricedCart { lines, demand, total }                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The same product may appear on several lines. Each line is kept (one
//! sale item per cart entry) but stock is checked and later decremented
//! against the per-product sum.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::Product;
use crate::validation::{validate_id, validate_quantity, ValidationResult};

/// One entry of a proposed cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub product_id: i64,
    pub quantity: i64,
}

impl CartLine {
    pub const fn new(product_id: i64, quantity: i64) -> Self {
        CartLine {
            product_id,
            quantity,
        }
    }
}

/// A cart line priced from the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedLine {
    pub product_id: i64,
    pub quantity: i64,
    /// Catalog price at pricing time; becomes the price-at-moment.
    pub unit_price: Money,
    pub subtotal: Money,
}

/// Total quantity requested for one product across all cart lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDemand {
    pub product_id: i64,
    pub product_name: String,
    pub quantity: i64,
    /// Price the cart was priced at. The commit only succeeds if the
    /// catalog still holds this price.
    pub unit_price: Money,
}

/// Result of pricing a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PricedCart {
    /// One entry per cart line, in cart order.
    pub lines: Vec<PricedLine>,
    /// One entry per distinct product, in first-seen order.
    pub demand: Vec<ProductDemand>,
    pub total: Money,
}

/// Checks the cart shape before anything is read from storage.
///
/// ## Rules
/// - At least one line
/// - Every product id and quantity is a positive integer
pub fn validate_cart(lines: &[CartLine]) -> ValidationResult<()> {
    if lines.is_empty() {
        return Err(ValidationError::Empty {
            field: "items".to_string(),
        });
    }

    for (index, line) in lines.iter().enumerate() {
        validate_id(&format!("items[{index}].productId"), line.product_id)?;
        validate_quantity(&format!("items[{index}].quantity"), line.quantity)?;
    }

    Ok(())
}

/// Distinct product ids referenced by the cart, in first-seen order.
pub fn referenced_product_ids(lines: &[CartLine]) -> Vec<i64> {
    let mut ids = Vec::with_capacity(lines.len());
    for line in lines {
        if !ids.contains(&line.product_id) {
            ids.push(line.product_id);
        }
    }
    ids
}

/// Prices a validated cart against a catalog snapshot.
///
/// ## Errors
/// - `ProductNotFound` for the first cart line whose product is missing
/// - `InsufficientStock` for the first product whose aggregate demand
///   exceeds its on-hand quantity, including demand too large to count
/// - `Validation` when a subtotal or the cart total does not fit in an
///   `i64` of cents
pub fn price_cart(lines: &[CartLine], catalog: &[Product]) -> CoreResult<PricedCart> {
    let by_id: HashMap<i64, &Product> = catalog.iter().map(|p| (p.id, p)).collect();

    // Step 3: every referenced product must exist
    if let Some(missing) = lines.iter().find(|l| !by_id.contains_key(&l.product_id)) {
        return Err(CoreError::ProductNotFound(missing.product_id));
    }

    // Step 4: aggregate demand per product, then compare against stock
    let mut demand: Vec<ProductDemand> = Vec::new();
    for line in lines {
        let product = by_id[&line.product_id];
        match demand.iter_mut().find(|d| d.product_id == line.product_id) {
            Some(existing) => {
                // No stock level can cover a sum past i64::MAX
                existing.quantity = existing.quantity.checked_add(line.quantity).ok_or_else(
                    || CoreError::InsufficientStock {
                        product: product.name.clone(),
                        available: product.stock_quantity,
                        requested: i64::MAX,
                    },
                )?;
            }
            None => demand.push(ProductDemand {
                product_id: product.id,
                product_name: product.name.clone(),
                quantity: line.quantity,
                unit_price: product.price(),
            }),
        }
    }

    for wanted in &demand {
        let product = by_id[&wanted.product_id];
        if !product.has_stock_for(wanted.quantity) {
            return Err(CoreError::InsufficientStock {
                product: product.name.clone(),
                available: product.stock_quantity,
                requested: wanted.quantity,
            });
        }
    }

    // Step 5: price every line from the catalog
    let mut priced: Vec<PricedLine> = Vec::with_capacity(lines.len());
    let mut total = Money::zero();
    for (index, line) in lines.iter().enumerate() {
        let unit_price = by_id[&line.product_id].price();
        let subtotal = unit_price
            .checked_multiply_quantity(line.quantity)
            .ok_or_else(|| amount_out_of_range(format!("items[{index}].quantity")))?;
        total = total
            .checked_add(subtotal)
            .ok_or_else(|| amount_out_of_range("items".to_string()))?;

        priced.push(PricedLine {
            product_id: line.product_id,
            quantity: line.quantity,
            unit_price,
            subtotal,
        });
    }

    Ok(PricedCart {
        lines: priced,
        demand,
        total,
    })
}

fn amount_out_of_range(field: String) -> CoreError {
    CoreError::Validation(ValidationError::InvalidFormat {
        field,
        reason: "sale amount is out of range".to_string(),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
