//! # Product Repository
//!
//! Database operations for products.
//!
//! ## Two Access Paths
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ProductRepository (pool)          ProductStore<'tx> (unit of work)     │
//! │  ─────────────────────────         ──────────────────────────────────   │
//! │  list_all                          insert                               │
//! │  get_by_id / get_by_barcode        lock_for_update                      │
//! │  get_many (cart validation)        get_by_id (authoritative re-read)    │
//! │                                    set_stock                            │
//! │                                    take_stock (conditional decrement)   │
//! │                                    update_details                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Stock is only ever written through `ProductStore`, so every quantity
//! change happens inside a unit of work next to its ledger row.

use chrono::Utc;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use sabor_core::{Money, Product};

const PRODUCT_COLUMNS: &str =
    "id, name, barcode, price_cents, stock_quantity, created_at, updated_at";

/// Fields of a product about to be registered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub barcode: String,
    pub price: Money,
    pub stock_quantity: i64,
}

// =============================================================================
// Pool-backed reads
// =============================================================================

/// Repository for product reads outside any transaction.
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product ordered by name.
    pub async fn list_all(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY name, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its id.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Gets a product by barcode (exact match).
    pub async fn get_by_barcode(&self, barcode: &str) -> DbResult<Option<Product>> {
        debug!(barcode = %barcode, "Looking up product by barcode");

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE barcode = ?1"
        ))
        .bind(barcode)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Resolves several products in one read. Missing ids are simply absent
    /// from the result.
    pub async fn get_many(&self, ids: &[i64]) -> DbResult<Vec<Product>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id IN ("
        ));
        let mut separated = builder.separated(", ");
        for id in ids {
            separated.push_bind(*id);
        }
        separated.push_unseparated(")");

        let products = builder
            .build_query_as::<Product>()
            .fetch_all(&self.pool)
            .await?;

        debug!(requested = ids.len(), found = products.len(), "Resolved products");
        Ok(products)
    }

    /// Counts products (for diagnostics and seeding).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Transaction-scoped writes
// =============================================================================

/// Product operations bound to one unit of work.
pub struct ProductStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> ProductStore<'a> {
    pub(crate) fn new(conn: &'a mut SqliteConnection) -> Self {
        ProductStore { conn }
    }

    /// Inserts a new product.
    ///
    /// ## Returns
    /// * `Err(DbError::UniqueViolation)` - barcode already registered
    pub async fn insert(&mut self, product: &NewProduct) -> DbResult<Product> {
        debug!(barcode = %product.barcode, "Inserting product");

        let now = Utc::now();

        let inserted = sqlx::query_as::<_, Product>(&format!(
            r#"
            INSERT INTO products (name, barcode, price_cents, stock_quantity, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.barcode)
        .bind(product.price.cents())
        .bind(product.stock_quantity)
        .bind(now)
        .fetch_one(&mut *self.conn)
        .await
        .map_err(|e| DbError::from(e).with_duplicate_value(&product.barcode))?;

        Ok(inserted)
    }

    /// Reads a product through this unit of work's connection.
    pub async fn get_by_id(&mut self, id: i64) -> DbResult<Option<Product>> {
        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.conn)
        .await?;

        Ok(product)
    }

    /// Takes the database write lock on behalf of a product and returns its
    /// current state.
    ///
    /// SQLite has no `SELECT ... FOR UPDATE`. Writing to the row first makes
    /// this connection the only writer until commit, so the returned stock
    /// cannot change underneath the caller.
    pub async fn lock_for_update(&mut self, id: i64) -> DbResult<Product> {
        let result = sqlx::query("UPDATE products SET updated_at = ?2 WHERE id = ?1")
            .bind(id)
            .bind(Utc::now())
            .execute(&mut *self.conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Sets the absolute on-hand quantity.
    pub async fn set_stock(&mut self, id: i64, quantity: i64) -> DbResult<()> {
        debug!(id, quantity, "Setting stock");

        let result = sqlx::query(
            "UPDATE products SET stock_quantity = ?2, updated_at = ?3 WHERE id = ?1",
        )
        .bind(id)
        .bind(quantity)
        .bind(Utc::now())
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }

    /// Decrements stock only if enough is on hand and the price is still the
    /// one the cart was priced at.
    ///
    /// ## Returns
    /// * `Ok(true)` - stock decremented
    /// * `Ok(false)` - precondition no longer holds, nothing written
    pub async fn take_stock(
        &mut self,
        id: i64,
        quantity: i64,
        expected_price: Money,
    ) -> DbResult<bool> {
        debug!(id, quantity, "Taking stock");

        let result = sqlx::query(
            r#"
            UPDATE products
            SET stock_quantity = stock_quantity - ?2,
                updated_at = ?4
            WHERE id = ?1
              AND stock_quantity >= ?2
              AND price_cents = ?3
            "#,
        )
        .bind(id)
        .bind(quantity)
        .bind(expected_price.cents())
        .bind(Utc::now())
        .execute(&mut *self.conn)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    /// Updates the mutable display fields (name and list price).
    pub async fn update_details(&mut self, id: i64, name: &str, price: Money) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE products SET name = ?2, price_cents = ?3, updated_at = ?4 WHERE id = ?1",
        )
        .bind(id)
        .bind(name)
        .bind(price.cents())
        .bind(Utc::now())
        .execute(&mut *self.conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Product", id));
        }

        Ok(())
    }
}
