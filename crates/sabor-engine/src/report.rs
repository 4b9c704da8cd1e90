//! # Sales Reporting
//!
//! Read-only paging over the sales history plus a summary of the whole
//! history. Summary figures never depend on which page was requested, and
//! are read from the same snapshot as the page.

use tracing::debug;

use crate::error::EngineResult;
use sabor_core::report::{PageInfo, PageRequest, SalesPage, SalesSummary};
use sabor_core::Money;
use sabor_db::Database;

#[derive(Debug, Clone)]
pub struct SalesReportService {
    db: Database,
}

impl SalesReportService {
    pub fn new(db: Database) -> Self {
        SalesReportService { db }
    }

    /// Lists one page of sales, most recent first.
    ///
    /// Out-of-range `page`/`page_size` values are clamped (defaults: page 1,
    /// 20 per page, at most 100).
    pub async fn list_sales(
        &self,
        page: Option<i64>,
        page_size: Option<i64>,
    ) -> EngineResult<SalesPage> {
        let request = PageRequest::new(page, page_size);

        // One read transaction, so a sale committed mid-report cannot make the
        // summary and the page disagree.
        let mut uow = self.db.begin().await?;
        let (totals, breakdown, rows) = {
            let mut sales = uow.sales();
            let totals = sales.totals().await?;
            let breakdown = sales.payment_breakdown().await?;
            let rows = sales.list_page(request).await?;
            (totals, breakdown, rows)
        };
        uow.rollback().await?;

        debug!(
            page = request.page,
            page_size = request.page_size,
            returned = rows.len(),
            total_records = totals.total_sales,
            "Sales page assembled"
        );

        let summary = SalesSummary::new(
            totals.total_sales,
            Money::from_cents(totals.total_cents),
            totals.first_sale_at,
            totals.last_sale_at,
            breakdown,
        );

        Ok(SalesPage {
            sales: rows,
            summary,
            page_info: PageInfo::new(request, totals.total_sales),
        })
    }
}
