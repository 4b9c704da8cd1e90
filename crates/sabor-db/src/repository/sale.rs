//! # Sale Repository
//!
//! Database operations for sales and their line items.
//!
//! ## Sale Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sale Lifecycle                                    │
//! │                                                                         │
//! │  1. COMMIT (SaleStore, inside the engine's unit of work)               │
//! │     └── insert_sale() → Sale                                           │
//! │     └── insert_item() → SaleItem (one per cart entry)                  │
//! │                                                                         │
//! │  2. READ (SaleRepository, or SaleStore for one snapshot)               │
//! │     └── get_detail() / list_page() with live product joins             │
//! │     └── totals() / payment_breakdown() over the whole history          │
//! │                                                                         │
//! │  There is no step 3: sales are append-only (enforced by triggers).     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::DbResult;
use sabor_core::report::{
    OperatorRef, PageRequest, PaymentBreakdown, ProductRef, SaleDetail, SaleLineDetail,
};
use sabor_core::{Money, Sale, SaleItem};

// =============================================================================
// Row Types
// =============================================================================

#[derive(Debug, FromRow)]
struct SaleHeaderRow {
    id: i64,
    created_at: DateTime<Utc>,
    total_cents: i64,
    payment_tag: String,
    operator_id: i64,
    operator_name: String,
}

#[derive(Debug, FromRow)]
struct SaleLineRow {
    id: i64,
    sale_id: i64,
    quantity: i64,
    unit_price_cents: i64,
    product_id: Option<i64>,
    product_name: Option<String>,
    product_barcode: Option<String>,
}

impl SaleLineRow {
    fn into_detail(self) -> SaleLineDetail {
        let product = match (self.product_id, self.product_name, self.product_barcode) {
            (Some(id), Some(name), Some(barcode)) => Some(ProductRef { id, name, barcode }),
            _ => None,
        };

        SaleLineDetail {
            id: self.id,
            quantity: self.quantity,
            unit_price: Money::from_cents(self.unit_price_cents),
            product,
        }
    }
}

/// Count, sum and date bounds over every sale.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct SaleTotals {
    pub total_sales: i64,
    pub total_cents: i64,
    pub first_sale_at: Option<DateTime<Utc>>,
    pub last_sale_at: Option<DateTime<Utc>>,
}

#[derive(Debug, FromRow)]
struct PaymentRow {
    payment_tag: String,
    count: i64,
    total_cents: i64,
}

const HEADER_SELECT: &str = r#"
    SELECT s.id, s.created_at, s.total_cents, s.payment_tag, s.operator_id,
           o.name AS operator_name
    FROM sales s
    JOIN operators o ON o.id = s.operator_id
"#;

// =============================================================================
// Pool-backed reads
// =============================================================================

/// Repository for sale reads.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Gets a sale header by id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Sale>> {
        let sale = sqlx::query_as::<_, Sale>(
            "SELECT id, created_at, total_cents, payment_tag, operator_id FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(sale)
    }

    /// Gets the raw line items of a sale, in insertion order.
    pub async fn get_items(&self, sale_id: i64) -> DbResult<Vec<SaleItem>> {
        let items = sqlx::query_as::<_, SaleItem>(
            r#"
            SELECT id, sale_id, product_id, quantity, unit_price_cents
            FROM sale_items
            WHERE sale_id = ?1
            ORDER BY id
            "#,
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Gets a sale with operator and line items resolved.
    pub async fn get_detail(&self, id: i64) -> DbResult<Option<SaleDetail>> {
        let mut conn = self.pool.acquire().await?;
        fetch_detail(&mut conn, id).await
    }

    /// Loads one page of sales, most recent first.
    pub async fn list_page(&self, page: PageRequest) -> DbResult<Vec<SaleDetail>> {
        let mut conn = self.pool.acquire().await?;
        fetch_page(&mut conn, page).await
    }

    /// Count, revenue and date bounds over every sale.
    pub async fn totals(&self) -> DbResult<SaleTotals> {
        let mut conn = self.pool.acquire().await?;
        fetch_totals(&mut conn).await
    }

    /// Count and sum per payment tag over every sale.
    pub async fn payment_breakdown(&self) -> DbResult<Vec<PaymentBreakdown>> {
        let mut conn = self.pool.acquire().await?;
        fetch_payment_breakdown(&mut conn).await
    }
}

// =============================================================================
// Connection-level queries
// =============================================================================
//
// Shared by the pool-backed repository and the transaction-bound store, so a
// report can read every figure from one snapshot.

async fn fetch_detail(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<SaleDetail>> {
    let header = sqlx::query_as::<_, SaleHeaderRow>(&format!("{HEADER_SELECT} WHERE s.id = ?1"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

    match header {
        Some(header) => Ok(attach_items(conn, vec![header]).await?.pop()),
        None => Ok(None),
    }
}

async fn fetch_page(conn: &mut SqliteConnection, page: PageRequest) -> DbResult<Vec<SaleDetail>> {
    debug!(page = page.page, page_size = page.page_size, "Listing sales page");

    let headers = sqlx::query_as::<_, SaleHeaderRow>(&format!(
        "{HEADER_SELECT} ORDER BY s.created_at DESC, s.id DESC LIMIT ?1 OFFSET ?2"
    ))
    .bind(page.page_size)
    .bind(page.offset())
    .fetch_all(&mut *conn)
    .await?;

    attach_items(conn, headers).await
}

async fn fetch_totals(conn: &mut SqliteConnection) -> DbResult<SaleTotals> {
    let totals = sqlx::query_as::<_, SaleTotals>(
        r#"
        SELECT COUNT(*) AS total_sales,
               COALESCE(SUM(total_cents), 0) AS total_cents,
               MIN(created_at) AS first_sale_at,
               MAX(created_at) AS last_sale_at
        FROM sales
        "#,
    )
    .fetch_one(&mut *conn)
    .await?;

    Ok(totals)
}

async fn fetch_payment_breakdown(conn: &mut SqliteConnection) -> DbResult<Vec<PaymentBreakdown>> {
    let rows = sqlx::query_as::<_, PaymentRow>(
        r#"
        SELECT payment_tag,
               COUNT(*) AS count,
               COALESCE(SUM(total_cents), 0) AS total_cents
        FROM sales
        GROUP BY payment_tag
        "#,
    )
    .fetch_all(&mut *conn)
    .await?;

    Ok(rows
        .into_iter()
        .map(|row| PaymentBreakdown {
            payment_tag: row.payment_tag,
            count: row.count,
            total: Money::from_cents(row.total_cents),
        })
        .collect())
}

/// Fetches the line items for a batch of headers and assembles details,
/// keeping the header order.
async fn attach_items(
    conn: &mut SqliteConnection,
    headers: Vec<SaleHeaderRow>,
) -> DbResult<Vec<SaleDetail>> {
    if headers.is_empty() {
        return Ok(Vec::new());
    }

    let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
        r#"
        SELECT i.id, i.sale_id, i.quantity, i.unit_price_cents,
               p.id AS product_id, p.name AS product_name, p.barcode AS product_barcode
        FROM sale_items i
        LEFT JOIN products p ON p.id = i.product_id
        WHERE i.sale_id IN ("#,
    );
    let mut separated = builder.separated(", ");
    for header in &headers {
        separated.push_bind(header.id);
    }
    separated.push_unseparated(") ORDER BY i.sale_id, i.id");

    let lines = builder
        .build_query_as::<SaleLineRow>()
        .fetch_all(&mut *conn)
        .await?;

    let mut by_sale: HashMap<i64, Vec<SaleLineDetail>> = HashMap::new();
    for line in lines {
        by_sale
            .entry(line.sale_id)
            .or_default()
            .push(line.into_detail());
    }

    Ok(headers
        .into_iter()
        .map(|h| SaleDetail {
            id: h.id,
            created_at: h.created_at,
            total: Money::from_cents(h.total_cents),
            payment_tag: h.payment_tag,
            operator: OperatorRef {
                id: h.operator_id,
                name: h.operator_name,
            },
            items: by_sale.remove(&h.id).unwrap_or_default(),
        })
        .collect())
}

// =============================================================================
// Transaction-scoped access
// =============================================================================

/// Header fields of a sale about to be committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewSale {
    pub total: Money,
    pub payment_tag: String,
    pub operator_id: i64,
}

/// Sale writes, and snapshot reads, bound to one unit of work.
pub struct SaleStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SaleStore<'a> {
    pub(crate) fn new(conn: &'a mut SqliteConnection) -> Self {
        SaleStore { conn }
    }

    /// Inserts a sale header stamped with the commit time.
    pub async fn insert_sale(&mut self, sale: &NewSale) -> DbResult<Sale> {
        debug!(total = %sale.total, operator_id = sale.operator_id, "Inserting sale");

        let inserted = sqlx::query_as::<_, Sale>(
            r#"
            INSERT INTO sales (created_at, total_cents, payment_tag, operator_id)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, created_at, total_cents, payment_tag, operator_id
            "#,
        )
        .bind(Utc::now())
        .bind(sale.total.cents())
        .bind(&sale.payment_tag)
        .bind(sale.operator_id)
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(inserted)
    }

    /// Inserts one line item with its frozen unit price.
    pub async fn insert_item(
        &mut self,
        sale_id: i64,
        product_id: i64,
        quantity: i64,
        unit_price: Money,
    ) -> DbResult<SaleItem> {
        let item = sqlx::query_as::<_, SaleItem>(
            r#"
            INSERT INTO sale_items (sale_id, product_id, quantity, unit_price_cents)
            VALUES (?1, ?2, ?3, ?4)
            RETURNING id, sale_id, product_id, quantity, unit_price_cents
            "#,
        )
        .bind(sale_id)
        .bind(product_id)
        .bind(quantity)
        .bind(unit_price.cents())
        .fetch_one(&mut *self.conn)
        .await?;

        Ok(item)
    }

    /// [`SaleRepository::list_page`] inside this unit of work.
    pub async fn list_page(&mut self, page: PageRequest) -> DbResult<Vec<SaleDetail>> {
        fetch_page(&mut *self.conn, page).await
    }

    /// [`SaleRepository::totals`] inside this unit of work.
    pub async fn totals(&mut self) -> DbResult<SaleTotals> {
        fetch_totals(&mut *self.conn).await
    }

    /// [`SaleRepository::payment_breakdown`] inside this unit of work.
    pub async fn payment_breakdown(&mut self) -> DbResult<Vec<PaymentBreakdown>> {
        fetch_payment_breakdown(&mut *self.conn).await
    }
}
