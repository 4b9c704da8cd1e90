//! # Domain Types
//!
//! Records shared by every layer of Sabor POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │  StockMovement  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  barcode (key)  │◄──│  total_cents    │   │  product_id     │       │
//! │  │  price_cents    │   │  payment_tag    │   │  quantity (>0)  │       │
//! │  │  stock_quantity │   │  operator_id    │   │  kind           │       │
//! │  └─────────────────┘   └────────┬────────┘   │  reason         │       │
//! │                                 │ owns        └─────────────────┘       │
//! │                        ┌────────▼────────┐                              │
//! │                        │    SaleItem     │   price frozen at commit     │
//! │                        │  unit_price_cents                              │
//! │                        └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity
//! Products carry a surrogate `id` used for relations and a `barcode`
//! business key used by the cashier scan flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Operator
// =============================================================================

/// An authenticated person permitted to ring sales and manage stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Operator {
    pub id: i64,
    /// Display name shown on sales history.
    pub name: String,
    /// Unique login name.
    pub login: String,
}

// =============================================================================
// Product
// =============================================================================

/// A sellable catalog item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Display name shown to the cashier.
    pub name: String,

    /// Barcode (EAN-13 in practice). Unique, never changes after creation.
    pub barcode: String,

    /// Current list price in cents.
    pub price_cents: i64,

    /// On-hand quantity, never negative.
    pub stock_quantity: i64,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Product {
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if the requested quantity can be taken from stock.
    #[inline]
    pub fn has_stock_for(&self, quantity: i64) -> bool {
        self.stock_quantity >= quantity
    }
}

// =============================================================================
// Stock Movement
// =============================================================================

/// Direction of a stock movement.
///
/// The magnitude always lives in `StockMovement::quantity`; the sign lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum MovementKind {
    /// Stock increased.
    #[serde(rename = "ENTRADA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "ENTRADA"))]
    Inbound,
    /// Stock decreased.
    #[serde(rename = "SAIDA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "SAIDA"))]
    Outbound,
}

impl MovementKind {
    /// Ledger tag as stored and exchanged.
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementKind::Inbound => "ENTRADA",
            MovementKind::Outbound => "SAIDA",
        }
    }
}

/// Why stock moved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[ts(export)]
pub enum MovementReason {
    /// Initial stocking when the product was registered.
    #[serde(rename = "CADASTRO")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "CADASTRO"))]
    InitialStock,
    /// Operator-driven correction.
    #[serde(rename = "AJUSTE_MANUAL")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "AJUSTE_MANUAL"))]
    ManualAdjustment,
    /// Decrement caused by a committed sale.
    #[serde(rename = "VENDA")]
    #[cfg_attr(feature = "sqlx", sqlx(rename = "VENDA"))]
    Sale,
}

impl MovementReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            MovementReason::InitialStock => "CADASTRO",
            MovementReason::ManualAdjustment => "AJUSTE_MANUAL",
            MovementReason::Sale => "VENDA",
        }
    }
}

/// One immutable row of the stock ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct StockMovement {
    pub id: i64,
    /// Weak reference, cleared if the product is ever removed.
    pub product_id: Option<i64>,
    /// Magnitude of the change, always positive.
    pub quantity: i64,
    pub kind: MovementKind,
    pub reason: MovementReason,
    /// Sale that caused the movement, for `VENDA` rows.
    pub sale_id: Option<i64>,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Sale
// =============================================================================

/// A committed sale header. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    /// Sum of line subtotals at commit time, never recomputed.
    pub total_cents: i64,
    pub payment_tag: String,
    pub operator_id: i64,
}

impl Sale {
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

/// A line item owned by exactly one sale.
/// Uses the snapshot pattern: the unit price is frozen at commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleItem {
    pub id: i64,
    pub sale_id: i64,
    /// Weak reference to the product.
    pub product_id: Option<i64>,
    pub quantity: i64,
    /// Price-at-moment in cents.
    pub unit_price_cents: i64,
}

impl SaleItem {
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn subtotal(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
