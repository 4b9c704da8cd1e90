//! Repository and unit-of-work behaviour against a real SQLite schema.

use sabor_core::ledger::MovementDraft;
use sabor_core::report::PageRequest;
use sabor_core::{Money, MovementKind, MovementReason};
use sabor_db::{Database, DbConfig, DbError, NewProduct, NewSale};

async fn setup() -> Database {
    Database::new(DbConfig::in_memory()).await.unwrap()
}

fn kernel_burger() -> NewProduct {
    NewProduct {
        name: "Kernel Burger".to_string(),
        barcode: "1111111111111".to_string(),
        price: Money::from_cents(2200),
        stock_quantity: 35,
    }
}

async fn insert_product(db: &Database, product: &NewProduct) -> i64 {
    let mut uow = db.begin().await.unwrap();
    let inserted = uow.products().insert(product).await.unwrap();
    uow.commit().await.unwrap();
    inserted.id
}

async fn insert_operator(db: &Database) -> i64 {
    db.operators()
        .insert("Operador Master", "operador.master", "$argon2id$placeholder")
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn test_insert_and_lookup_product() {
    let db = setup().await;
    let id = insert_product(&db, &kernel_burger()).await;

    let by_id = db.products().get_by_id(id).await.unwrap().unwrap();
    assert_eq!(by_id.name, "Kernel Burger");
    assert_eq!(by_id.price(), Money::from_cents(2200));
    assert_eq!(by_id.stock_quantity, 35);

    let by_barcode = db
        .products()
        .get_by_barcode("1111111111111")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(by_barcode.id, id);

    assert!(db.products().get_by_barcode("0000").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_barcode_is_unique_violation() {
    let db = setup().await;
    insert_product(&db, &kernel_burger()).await;

    let mut uow = db.begin().await.unwrap();
    let err = uow.products().insert(&kernel_burger()).await.unwrap_err();
    uow.rollback().await.unwrap();

    match err {
        DbError::UniqueViolation { field, value } => {
            assert_eq!(field, "barcode");
            assert_eq!(value, "1111111111111");
        }
        other => panic!("expected unique violation, got {other:?}"),
    }
    assert_eq!(db.products().count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_get_many_skips_missing_ids() {
    let db = setup().await;
    let id = insert_product(&db, &kernel_burger()).await;

    let found = db.products().get_many(&[id, 999]).await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, id);

    assert!(db.products().get_many(&[]).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_take_stock_is_conditional() {
    let db = setup().await;
    let id = insert_product(&db, &kernel_burger()).await;

    let mut uow = db.begin().await.unwrap();
    // Not enough on hand
    assert!(!uow
        .products()
        .take_stock(id, 36, Money::from_cents(2200))
        .await
        .unwrap());
    // Price moved since the cart was priced
    assert!(!uow
        .products()
        .take_stock(id, 3, Money::from_cents(2100))
        .await
        .unwrap());
    assert!(uow
        .products()
        .take_stock(id, 3, Money::from_cents(2200))
        .await
        .unwrap());
    uow.commit().await.unwrap();

    let product = db.products().get_by_id(id).await.unwrap().unwrap();
    assert_eq!(product.stock_quantity, 32);
}

#[tokio::test]
async fn test_dropped_unit_of_work_rolls_back() {
    let db = setup().await;
    let id = insert_product(&db, &kernel_burger()).await;

    {
        let mut uow = db.begin().await.unwrap();
        uow.products().set_stock(id, 0).await.unwrap();
    }

    let product = db.products().get_by_id(id).await.unwrap().unwrap();
    assert_eq!(product.stock_quantity, 35);
}

#[tokio::test]
async fn test_lock_for_update_missing_product() {
    let db = setup().await;

    let mut uow = db.begin().await.unwrap();
    let err = uow.products().lock_for_update(42).await.unwrap_err();
    uow.rollback().await.unwrap();

    assert!(matches!(err, DbError::NotFound { .. }));
}

#[tokio::test]
async fn test_negative_stock_rejected_by_schema() {
    let db = setup().await;
    let id = insert_product(&db, &kernel_burger()).await;

    let mut uow = db.begin().await.unwrap();
    let err = uow.products().set_stock(id, -1).await.unwrap_err();
    uow.rollback().await.unwrap();

    assert!(matches!(err, DbError::CheckViolation { .. }));
}

#[tokio::test]
async fn test_sale_detail_and_report_aggregates() {
    let db = setup().await;
    let product_id = insert_product(&db, &kernel_burger()).await;
    let operator_id = insert_operator(&db).await;

    let mut uow = db.begin().await.unwrap();
    let sale = uow
        .sales()
        .insert_sale(&NewSale {
            total: Money::from_cents(6600),
            payment_tag: "Pix".to_string(),
            operator_id,
        })
        .await
        .unwrap();
    uow.sales()
        .insert_item(sale.id, product_id, 3, Money::from_cents(2200))
        .await
        .unwrap();
    uow.movements()
        .append(&MovementDraft::sale(product_id, 3, sale.id))
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let detail = db.sales().get_detail(sale.id).await.unwrap().unwrap();
    assert_eq!(detail.total.to_string(), "66.00");
    assert_eq!(detail.operator.name, "Operador Master");
    assert_eq!(detail.items.len(), 1);
    assert_eq!(detail.items[0].subtotal(), Money::from_cents(6600));
    assert_eq!(
        detail.items[0].product.as_ref().map(|p| p.barcode.as_str()),
        Some("1111111111111")
    );

    let totals = db.sales().totals().await.unwrap();
    assert_eq!(totals.total_sales, 1);
    assert_eq!(totals.total_cents, 6600);
    assert!(totals.first_sale_at.is_some());

    let breakdown = db.sales().payment_breakdown().await.unwrap();
    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].payment_tag, "Pix");
    assert_eq!(breakdown[0].count, 1);

    let page = db.sales().list_page(PageRequest::default()).await.unwrap();
    assert_eq!(page.len(), 1);

    let movements = db.movements().for_sale(sale.id).await.unwrap();
    assert_eq!(movements.len(), 1);
    assert_eq!(movements[0].kind, MovementKind::Outbound);
    assert_eq!(movements[0].reason, MovementReason::Sale);
}

#[tokio::test]
async fn test_empty_history_totals() {
    let db = setup().await;

    let totals = db.sales().totals().await.unwrap();
    assert_eq!(totals.total_sales, 0);
    assert_eq!(totals.total_cents, 0);
    assert!(totals.first_sale_at.is_none());
    assert!(totals.last_sale_at.is_none());
    assert!(db.sales().payment_breakdown().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_ledger_rows_are_append_only() {
    let db = setup().await;
    let product_id = insert_product(&db, &kernel_burger()).await;

    let mut uow = db.begin().await.unwrap();
    let movement = uow
        .movements()
        .append(&MovementDraft::initial_stock(product_id, 35).unwrap())
        .await
        .unwrap();
    uow.commit().await.unwrap();

    let update = sqlx::query("UPDATE stock_movements SET quantity = 1 WHERE id = ?1")
        .bind(movement.id)
        .execute(db.pool())
        .await;
    assert!(update.is_err());

    let delete = sqlx::query("DELETE FROM stock_movements WHERE id = ?1")
        .bind(movement.id)
        .execute(db.pool())
        .await;
    assert!(delete.is_err());

    let history = db.movements().for_product(product_id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].quantity, 35);
    assert_eq!(history[0].reason, MovementReason::InitialStock);
}

#[tokio::test]
async fn test_duplicate_operator_login() {
    let db = setup().await;
    insert_operator(&db).await;

    let err = db
        .operators()
        .insert("Outro", "operador.master", "hash")
        .await
        .unwrap_err();

    assert!(matches!(err, DbError::UniqueViolation { ref field, .. } if field == "login"));
}

#[tokio::test]
async fn test_file_database_second_writer_waits_for_lock() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(DbConfig::new(dir.path().join("sabor.db")).max_connections(2))
        .await
        .unwrap();
    let id = insert_product(&db, &kernel_burger()).await;

    let mut first = db.begin().await.unwrap();
    assert!(first
        .products()
        .take_stock(id, 35, Money::from_cents(2200))
        .await
        .unwrap());

    let second_db = db.clone();
    let second = tokio::spawn(async move {
        let mut uow = second_db.begin().await.unwrap();
        let taken = uow
            .products()
            .take_stock(id, 1, Money::from_cents(2200))
            .await
            .unwrap();
        uow.rollback().await.unwrap();
        taken
    });

    first.commit().await.unwrap();

    // The second writer ran after the first committed and saw zero stock.
    assert!(!second.await.unwrap());
}

async fn commit_sale(db: &Database, operator_id: i64, product_id: i64, payment_tag: &str) {
    let mut uow = db.begin().await.unwrap();
    let sale = uow
        .sales()
        .insert_sale(&NewSale {
            total: Money::from_cents(2200),
            payment_tag: payment_tag.to_string(),
            operator_id,
        })
        .await
        .unwrap();
    uow.sales()
        .insert_item(sale.id, product_id, 1, Money::from_cents(2200))
        .await
        .unwrap();
    uow.commit().await.unwrap();
}

#[tokio::test]
async fn test_report_reads_share_one_snapshot() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::new(DbConfig::new(dir.path().join("sabor.db")).max_connections(2))
        .await
        .unwrap();
    let product_id = insert_product(&db, &kernel_burger()).await;
    let operator_id = insert_operator(&db).await;
    commit_sale(&db, operator_id, product_id, "Dinheiro").await;

    let mut reader = db.begin().await.unwrap();
    let totals = reader.sales().totals().await.unwrap();
    assert_eq!(totals.total_sales, 1);

    // Lands between the summary and the page
    commit_sale(&db, operator_id, product_id, "Pix").await;

    let breakdown = reader.sales().payment_breakdown().await.unwrap();
    let page = reader.sales().list_page(PageRequest::default()).await.unwrap();
    reader.rollback().await.unwrap();

    assert_eq!(breakdown.len(), 1);
    assert_eq!(breakdown[0].payment_tag, "Dinheiro");
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].items.len(), 1);

    assert_eq!(db.sales().totals().await.unwrap().total_sales, 2);
}
