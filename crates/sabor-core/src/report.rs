//! # Sales Report Arithmetic
//!
//! Paging rules and the summary block of the sales history. Storage supplies
//! raw counts and sums; everything derived from them is computed here in
//! integer cents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

// =============================================================================
// Paging
// =============================================================================

/// A clamped page request. Out-of-range input is corrected, never rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub page_size: i64,
}

impl PageRequest {
    /// Clamps `page` to at least 1 and `page_size` to `1..=MAX_PAGE_SIZE`.
    ///
    /// ## Example
    /// ```rust
    /// use sabor_core::report::PageRequest;
    ///
    /// let req = PageRequest::new(Some(0), Some(5000));
    /// assert_eq!((req.page, req.page_size), (1, 100));
    ///
    /// let req = PageRequest::new(None, None);
    /// assert_eq!((req.page, req.page_size), (1, 20));
    /// ```
    pub fn new(page: Option<i64>, page_size: Option<i64>) -> Self {
        PageRequest {
            page: page.unwrap_or(1).max(1),
            page_size: page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Rows to skip before this page.
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.page_size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        PageRequest::new(None, None)
    }
}

/// Position of a page within the full result set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PageInfo {
    pub page: i64,
    pub page_size: i64,
    pub total_records: i64,
    pub total_pages: i64,
}

impl PageInfo {
    pub fn new(request: PageRequest, total_records: i64) -> Self {
        let total_pages = if total_records <= 0 {
            0
        } else {
            (total_records + request.page_size - 1) / request.page_size
        };

        PageInfo {
            page: request.page,
            page_size: request.page_size,
            total_records,
            total_pages,
        }
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Count and sum of sales sharing one payment tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PaymentBreakdown {
    pub payment_tag: String,
    pub count: i64,
    pub total: Money,
}

/// Aggregates over every persisted sale, independent of the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesSummary {
    pub total_sales: i64,
    pub total_revenue: Money,
    /// `total_revenue / total_sales`, zero when there are no sales.
    pub average_sale: Money,
    #[ts(as = "Option<String>")]
    pub first_sale_at: Option<DateTime<Utc>>,
    #[ts(as = "Option<String>")]
    pub last_sale_at: Option<DateTime<Utc>>,
    pub by_payment: Vec<PaymentBreakdown>,
}

impl SalesSummary {
    /// Builds the summary; the breakdown is ordered by count, then tag.
    pub fn new(
        total_sales: i64,
        total_revenue: Money,
        first_sale_at: Option<DateTime<Utc>>,
        last_sale_at: Option<DateTime<Utc>>,
        mut by_payment: Vec<PaymentBreakdown>,
    ) -> Self {
        by_payment.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.payment_tag.cmp(&b.payment_tag))
        });

        SalesSummary {
            total_sales,
            total_revenue,
            average_sale: Money::average(total_revenue, total_sales),
            first_sale_at,
            last_sale_at,
            by_payment,
        }
    }

    /// Summary of an empty history.
    pub fn empty() -> Self {
        SalesSummary::new(0, Money::zero(), None, None, Vec::new())
    }
}

// =============================================================================
// Sale Detail
// =============================================================================

/// Operator identity as displayed on a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct OperatorRef {
    pub id: i64,
    pub name: String,
}

/// Live product identity resolved at read time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProductRef {
    pub id: i64,
    pub name: String,
    pub barcode: String,
}

/// A line item with its frozen price and live product identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLineDetail {
    pub id: i64,
    pub quantity: i64,
    /// Price-at-moment; never the current catalog price.
    pub unit_price: Money,
    /// `None` when the product no longer exists.
    pub product: Option<ProductRef>,
}

impl SaleLineDetail {
    pub fn subtotal(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

/// A sale with its operator and line items, as returned to callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleDetail {
    pub id: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub total: Money,
    pub payment_tag: String,
    pub operator: OperatorRef,
    pub items: Vec<SaleLineDetail>,
}

/// One page of sales history plus the full-history summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesPage {
    pub sales: Vec<SaleDetail>,
    pub summary: SalesSummary,
    pub page_info: PageInfo,
}
