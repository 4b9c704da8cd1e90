//! # Seed Data
//!
//! Provisions the default operator and the demo menu.
//!
//! ## Usage
//! ```bash
//! # Database from SABOR_DB_PATH or the platform default
//! cargo run -p sabor-api --bin seed
//!
//! # Specify database path
//! cargo run -p sabor-api --bin seed -- --db ./data/sabor.db
//! ```
//!
//! Safe to run repeatedly. Products are matched by barcode: existing ones get
//! name and price refreshed and their stock set back to the menu quantity
//! through a normal stock adjustment, so the ledger records the difference.

use std::env;

use anyhow::Context;
use sabor_api::config::resolve_database_path;
use sabor_api::init_tracing;
use sabor_core::validation::parse_price;
use sabor_db::{Database, DbConfig};
use sabor_engine::auth::DEFAULT_SESSION_LIFETIME_SECS;
use sabor_engine::{
    AuthService, CatalogService, ProductRegistration, SessionManager, StockAdjustmentService,
};

const OPERATOR_NAME: &str = "Operador Master";
const OPERATOR_LOGIN: &str = "operador.master";
const OPERATOR_PASSWORD: &str = "123456";

/// `(name, barcode, price, stock)`
const MENU: &[(&str, &str, &str, i64)] = &[
    ("Kernel Burger", "1111111111111", "22.00", 35),
    ("Dual-Core Burger", "2222222222222", "28.00", 30),
    ("BaconByte", "3333333333333", "26.00", 28),
    ("Firewall (Frango Crocante)", "4444444444444", "25.00", 32),
    ("Debug Burger", "5555555555555", "27.00", 25),
    ("TeraBurger", "6666666666666", "35.00", 20),
    ("MegaFritas P", "7777777777771", "8.00", 40),
    ("MegaFritas M", "7777777777772", "12.00", 35),
    ("MegaFritas G", "7777777777773", "15.00", 30),
    ("Anéis de Rede", "8888888888888", "16.00", 28),
    ("Nuggets.zip 6", "9999999999996", "10.00", 32),
    ("Nuggets.zip 10", "9999999999990", "15.00", 26),
    ("Refrigerante Lata", "1010101010101", "6.00", 60),
    ("Refrigerante 500ml", "1010101010105", "8.00", 48),
    ("Suco Natural", "2020202020202", "9.00", 36),
    ("Água H2O-S", "3030303030303", "5.00", 42),
    ("Sundae Overflow", "4040404040404", "14.00", 24),
    ("Mouse de Chocolate", "5050505050505", "10.00", 30),
    ("Cookie Cache", "6060606060606", "7.00", 34),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let args: Vec<String> = env::args().collect();
    let mut db_arg: Option<String> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_arg = Some(args[i + 1].clone());
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Sabor POS Seed");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: SABOR_DB_PATH or platform data dir)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    let db_path = resolve_database_path(db_arg.or_else(|| env::var("SABOR_DB_PATH").ok()))?;

    println!("🌱 Sabor POS Seed");
    println!("=================");
    println!("Database: {}", db_path.display());
    println!();

    let db = Database::new(DbConfig::new(db_path))
        .await
        .context("Failed to open database")?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    // The seed never issues tokens; the manager only satisfies AuthService.
    let sessions = SessionManager::new("seed", DEFAULT_SESSION_LIFETIME_SECS)?;
    let auth = AuthService::new(db.clone(), sessions);
    let operator = auth
        .upsert_operator(OPERATOR_NAME, OPERATOR_LOGIN, OPERATOR_PASSWORD)
        .await?;
    println!("✓ Operator '{}' (id {})", operator.login, operator.id);

    let catalog = CatalogService::new(db.clone());
    let stock = StockAdjustmentService::new(db.clone());

    let mut created = 0;
    let mut refreshed = 0;

    for &(name, barcode, price, quantity) in MENU {
        let price = parse_price(price)?;

        match db.products().get_by_barcode(barcode).await? {
            Some(existing) => {
                catalog.update_details(existing.id, name, price).await?;
                stock.adjust_stock(existing.id, quantity).await?;
                refreshed += 1;
            }
            None => {
                catalog
                    .register_product(ProductRegistration {
                        name: name.to_string(),
                        barcode: barcode.to_string(),
                        price,
                        initial_quantity: quantity,
                    })
                    .await?;
                created += 1;
            }
        }
    }

    println!("✓ Products: {} created, {} refreshed", created, refreshed);

    db.close().await;
    println!();
    println!("🎉 Seed complete!");
    Ok(())
}
