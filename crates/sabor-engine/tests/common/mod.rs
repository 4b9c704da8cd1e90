//! Shared fixtures for engine integration tests.

#![allow(dead_code)]

use sabor_core::{Money, Operator, Product};
use sabor_db::{Database, DbConfig};
use sabor_engine::{CatalogService, ProductRegistration};

pub async fn memory_db() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

/// Inserts an operator without hashing a real password.
pub async fn operator(db: &Database) -> Operator {
    db.operators()
        .insert("Operador Master", "operador.master", "$argon2id$unused")
        .await
        .unwrap()
}

pub async fn product(db: &Database, name: &str, barcode: &str, price: &str, stock: i64) -> Product {
    CatalogService::new(db.clone())
        .register_product(ProductRegistration {
            name: name.to_string(),
            barcode: barcode.to_string(),
            price: price.parse::<Money>().unwrap(),
            initial_quantity: stock,
        })
        .await
        .unwrap()
}

/// Kernel Burger, 22.00, 35 on hand.
pub async fn kernel_burger(db: &Database) -> Product {
    product(db, "Kernel Burger", "1111111111111", "22.00", 35).await
}

pub async fn stock_of(db: &Database, product_id: i64) -> i64 {
    db.products()
        .get_by_id(product_id)
        .await
        .unwrap()
        .unwrap()
        .stock_quantity
}
