//! # Stock Ledger Rules
//!
//! Pure rules for what the stock movement ledger records. Storage appends
//! whatever [`MovementDraft`] these functions produce; it never decides.
//!
//! ## Adjustment Delta
//! ```text
//! current = 32, target = 50  →  delta +18  →  ENTRADA 18 AJUSTE_MANUAL
//! current = 32, target = 30  →  delta  -2  →  SAIDA    2 AJUSTE_MANUAL
//! current = 32, target = 32  →  delta   0  →  (no movement)
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{MovementKind, MovementReason};

/// A ledger row waiting to be appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementDraft {
    pub product_id: i64,
    /// Magnitude, always positive.
    pub quantity: i64,
    pub kind: MovementKind,
    pub reason: MovementReason,
    pub sale_id: Option<i64>,
}

impl MovementDraft {
    /// Initial stocking at registration. `None` when nothing was stocked.
    pub fn initial_stock(product_id: i64, quantity: i64) -> Option<Self> {
        (quantity > 0).then_some(MovementDraft {
            product_id,
            quantity,
            kind: MovementKind::Inbound,
            reason: MovementReason::InitialStock,
            sale_id: None,
        })
    }

    /// Stock leaving because of a committed sale.
    pub fn sale(product_id: i64, quantity: i64, sale_id: i64) -> Self {
        MovementDraft {
            product_id,
            quantity,
            kind: MovementKind::Outbound,
            reason: MovementReason::Sale,
            sale_id: Some(sale_id),
        }
    }
}

/// The outcome of setting a product's stock to an absolute target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdjustmentPlan {
    pub previous: i64,
    pub target: i64,
    /// Movement to append, or `None` when the target equals current stock.
    pub movement: Option<MovementDraft>,
}

impl AdjustmentPlan {
    /// Signed change `target - previous`.
    pub fn delta(&self) -> i64 {
        self.target - self.previous
    }
}

/// Plans a manual "set to" adjustment.
///
/// Both quantities are expected to be non-negative; validation happens at
/// the boundary.
pub fn plan_adjustment(product_id: i64, current: i64, target: i64) -> AdjustmentPlan {
    let delta = target - current;

    let movement = match delta {
        0 => None,
        d => Some(MovementDraft {
            product_id,
            quantity: d.abs(),
            kind: if d > 0 {
                MovementKind::Inbound
            } else {
                MovementKind::Outbound
            },
            reason: MovementReason::ManualAdjustment,
            sale_id: None,
        }),
    };

    AdjustmentPlan {
        previous: current,
        target,
        movement,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_increase_is_entrada() {
        let plan = plan_adjustment(1, 32, 50);
        let movement = plan.movement.unwrap();
        assert_eq!(plan.delta(), 18);
        assert_eq!(movement.quantity, 18);
        assert_eq!(movement.kind, MovementKind::Inbound);
        assert_eq!(movement.reason, MovementReason::ManualAdjustment);
    }

    #[test]
    fn test_decrease_is_saida_with_magnitude() {
        let movement = plan_adjustment(1, 32, 30).movement.unwrap();
        assert_eq!(movement.quantity, 2);
        assert_eq!(movement.kind, MovementKind::Outbound);
    }

    #[test]
    fn test_no_change_writes_nothing() {
        let plan = plan_adjustment(1, 7, 7);
        assert_eq!(plan.delta(), 0);
        assert!(plan.movement.is_none());
    }

    #[test]
    fn test_initial_stock_only_when_positive() {
        assert!(MovementDraft::initial_stock(3, 0).is_none());
        let draft = MovementDraft::initial_stock(3, 35).unwrap();
        assert_eq!(draft.reason, MovementReason::InitialStock);
        assert_eq!(draft.kind, MovementKind::Inbound);
    }

    #[test]
    fn test_sale_movement_links_sale() {
        let draft = MovementDraft::sale(3, 2, 99);
        assert_eq!(draft.kind, MovementKind::Outbound);
        assert_eq!(draft.reason, MovementReason::Sale);
        assert_eq!(draft.sale_id, Some(99));
    }
}
