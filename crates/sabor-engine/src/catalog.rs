//! # Catalog Service
//!
//! Product registration and the catalog reads used by the cashier and the
//! back-office.
//!
//! ## Registration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  register_product(name, barcode, price, initial_quantity)               │
//! │       │                                                                 │
//! │       ├── validate (trim, non-empty, price >= 0, quantity >= 0)        │
//! │       ▼                                                                 │
//! │  UnitOfWork                                                             │
//! │       ├── products.insert(..)          UNIQUE(barcode) → DuplicateKey   │
//! │       ├── movements.append(ENTRADA / CADASTRO)   only if quantity > 0  │
//! │       └── commit                                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info, warn};

use crate::error::{EngineError, EngineResult, ErrorKind};
use sabor_core::ledger::MovementDraft;
use sabor_core::validation::{
    validate_barcode, validate_id, validate_price, validate_product_name, validate_stock_level,
};
use sabor_core::{Money, Product, StockMovement};
use sabor_db::{Database, NewProduct};

/// Input for [`CatalogService::register_product`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductRegistration {
    pub name: String,
    pub barcode: String,
    pub price: Money,
    pub initial_quantity: i64,
}

/// Product catalog operations.
#[derive(Debug, Clone)]
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db: Database) -> Self {
        CatalogService { db }
    }

    /// Registers a product and records its initial stock in the ledger.
    ///
    /// ## Errors
    /// - `InvalidInput` - blank name/barcode, negative price or quantity
    /// - `DuplicateKey` - barcode already registered
    pub async fn register_product(&self, request: ProductRegistration) -> EngineResult<Product> {
        let new_product = NewProduct {
            name: validate_product_name(&request.name)?,
            barcode: validate_barcode(&request.barcode)?,
            price: validate_price(request.price)?,
            stock_quantity: validate_stock_level("initialQuantity", request.initial_quantity)?,
        };

        debug!(barcode = %new_product.barcode, "Registering product");

        let mut uow = self.db.begin().await?;

        let product = match uow.products().insert(&new_product).await {
            Ok(product) => product,
            Err(e) => {
                let err = EngineError::from(e);
                if err.kind == ErrorKind::DuplicateKey {
                    warn!(barcode = %new_product.barcode, "Barcode already registered");
                }
                return Err(err);
            }
        };

        if let Some(draft) = MovementDraft::initial_stock(product.id, product.stock_quantity) {
            uow.movements().append(&draft).await?;
        }

        uow.commit().await?;

        info!(
            product_id = product.id,
            barcode = %product.barcode,
            price = %product.price(),
            stock = product.stock_quantity,
            "Product registered"
        );
        Ok(product)
    }

    /// Every product, ordered by name.
    pub async fn list_products(&self) -> EngineResult<Vec<Product>> {
        Ok(self.db.products().list_all().await?)
    }

    pub async fn get_product(&self, id: i64) -> EngineResult<Product> {
        let id = validate_id("id", id)?;

        self.db
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", id))
    }

    /// Exact barcode lookup for the scan flow.
    ///
    /// A product with nothing on hand is reported as out of stock so it is
    /// never added to a cart.
    pub async fn find_by_barcode(&self, barcode: &str) -> EngineResult<Product> {
        let barcode = validate_barcode(barcode)?;

        let product = self
            .db
            .products()
            .get_by_barcode(&barcode)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", &barcode))?;

        if product.stock_quantity <= 0 {
            return Err(EngineError::new(
                ErrorKind::InsufficientStock,
                format!("{} is out of stock", product.name),
            ));
        }

        Ok(product)
    }

    /// Ledger history of one product, newest first.
    pub async fn movements_for_product(&self, product_id: i64) -> EngineResult<Vec<StockMovement>> {
        let product_id = validate_id("productId", product_id)?;
        Ok(self.db.movements().for_product(product_id).await?)
    }

    /// Replaces the display name and list price. Past sales keep their frozen
    /// prices.
    pub async fn update_details(&self, id: i64, name: &str, price: Money) -> EngineResult<Product> {
        let id = validate_id("id", id)?;
        let name = validate_product_name(name)?;
        let price = validate_price(price)?;

        let mut uow = self.db.begin().await?;
        uow.products().update_details(id, &name, price).await?;
        let product = uow
            .products()
            .get_by_id(id)
            .await?
            .ok_or_else(|| EngineError::not_found("Product", id))?;
        uow.commit().await?;

        info!(product_id = id, price = %price, "Product details updated");
        Ok(product)
    }
}
