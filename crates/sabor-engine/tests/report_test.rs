//! Sales listing: paging, ordering and full-history summary.

mod common;

use sabor_core::pricing::CartLine;
use sabor_core::Money;
use sabor_engine::{SaleEngine, SalesReportService};

use common::{kernel_burger, memory_db, operator, product};

#[tokio::test]
async fn test_empty_history() {
    let db = memory_db().await;

    let page = SalesReportService::new(db).list_sales(None, None).await.unwrap();

    assert!(page.sales.is_empty());
    assert_eq!(page.summary.total_sales, 0);
    assert_eq!(page.summary.total_revenue, Money::zero());
    assert_eq!(page.summary.average_sale, Money::zero());
    assert!(page.summary.first_sale_at.is_none());
    assert!(page.summary.by_payment.is_empty());
    assert_eq!(page.page_info.total_pages, 0);
    assert_eq!(page.page_info.page_size, 20);
}

#[tokio::test]
async fn test_summary_covers_every_page() {
    let db = memory_db().await;
    let op = operator(&db).await;
    let burger = kernel_burger(&db).await;
    let soda = product(&db, "Segfault Soda", "4444444444444", "6.00", 50).await;
    let engine = SaleEngine::new(db.clone());

    // 22.00 Dinheiro, 12.00 Pix, 44.00 Pix
    engine
        .submit_sale(&[CartLine::new(burger.id, 1)], None, &op)
        .await
        .unwrap();
    engine
        .submit_sale(&[CartLine::new(soda.id, 2)], Some("Pix"), &op)
        .await
        .unwrap();
    let last = engine
        .submit_sale(&[CartLine::new(burger.id, 2)], Some("Pix"), &op)
        .await
        .unwrap();

    let report = SalesReportService::new(db.clone());
    let page = report.list_sales(Some(1), Some(2)).await.unwrap();

    assert_eq!(page.sales.len(), 2);
    assert_eq!(page.sales[0].id, last.id);
    assert_eq!(page.page_info.total_records, 3);
    assert_eq!(page.page_info.total_pages, 2);

    assert_eq!(page.summary.total_sales, 3);
    assert_eq!(page.summary.total_revenue.to_string(), "78.00");
    assert_eq!(page.summary.average_sale.to_string(), "26.00");
    assert!(page.summary.first_sale_at <= page.summary.last_sale_at);

    assert_eq!(page.summary.by_payment.len(), 2);
    assert_eq!(page.summary.by_payment[0].payment_tag, "Pix");
    assert_eq!(page.summary.by_payment[0].count, 2);
    assert_eq!(page.summary.by_payment[0].total, Money::from_cents(5600));
    assert_eq!(page.summary.by_payment[1].payment_tag, "Dinheiro");

    let second = report.list_sales(Some(2), Some(2)).await.unwrap();
    assert_eq!(second.sales.len(), 1);
    assert_eq!(second.summary, page.summary);
}

#[tokio::test]
async fn test_out_of_range_paging_is_clamped() {
    let db = memory_db().await;
    let op = operator(&db).await;
    let burger = kernel_burger(&db).await;
    SaleEngine::new(db.clone())
        .submit_sale(&[CartLine::new(burger.id, 1)], None, &op)
        .await
        .unwrap();

    let page = SalesReportService::new(db)
        .list_sales(Some(-5), Some(10_000))
        .await
        .unwrap();

    assert_eq!(page.page_info.page, 1);
    assert_eq!(page.page_info.page_size, 100);
    assert_eq!(page.sales.len(), 1);
    assert_eq!(page.sales[0].items[0].product.as_ref().map(|p| p.id), Some(burger.id));
}
