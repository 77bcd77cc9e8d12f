use std::sync::Arc;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use restock_core::domain::product::ProductId;
use restock_core::domain::sale::NewSale;
use restock_core::domain::stock::NewStockSnapshot;
use restock_core::errors::SuggestionError;
use restock_core::history::SalesHistory;
use restock_core::replenishment::{ForecastMethod, ReplenishmentEngine, SuggestionBasis};
use restock_core::history::StockLedger;
use restock_db::repositories::{
    InMemoryStockRepository, RepositoryError, SaleRepository, SqlSaleRepository,
    SqlStockRepository, StockRepository,
};
use restock_db::{connect_with_settings, migrations, DbPool, DemoDataset};

async fn migrated_pool() -> DbPool {
    let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
    migrations::run_pending(&pool).await.expect("run migrations");
    pool
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

#[tokio::test]
async fn demo_products_produce_their_expected_suggestions() {
    let pool = migrated_pool().await;
    DemoDataset::load(&pool).await.expect("load demo history");

    let sales = SqlSaleRepository::new(pool.clone());
    let stock = SqlStockRepository::new(pool.clone());
    let engine = ReplenishmentEngine::default();

    for product in DemoDataset::products() {
        let suggestion =
            engine.suggest(product.product_id, &sales, &stock).await.expect("suggestion");
        assert_eq!(suggestion.method, product.expected_method, "{}", product.description);
        assert_eq!(
            suggestion.suggested_quantity, product.expected_quantity,
            "{}",
            product.description
        );
    }
}

#[tokio::test]
async fn demo_fallback_reports_latest_stock_snapshot() {
    let pool = migrated_pool().await;
    DemoDataset::load(&pool).await.expect("load demo history");

    let suggestion = ReplenishmentEngine::default()
        .suggest(
            ProductId(303),
            &SqlSaleRepository::new(pool.clone()),
            &SqlStockRepository::new(pool.clone()),
        )
        .await
        .expect("suggestion");

    assert_eq!(
        suggestion.basis,
        SuggestionBasis::Fallback { weeks_observed: 3, fallback_quantity: 3, current_stock: 40 }
    );
}

#[tokio::test]
async fn ingested_rows_flow_through_trait_objects() {
    let pool = migrated_pool().await;
    let sales: Arc<dyn SaleRepository> = Arc::new(SqlSaleRepository::new(pool.clone()));
    let stock: Arc<dyn StockRepository> = Arc::new(SqlStockRepository::new(pool.clone()));

    let first = sales
        .save(NewSale {
            product_id: ProductId(7),
            quantity: 10,
            unit_price: Decimal::new(999, 2),
            sale_date: date(2025, 5, 12),
        })
        .await
        .expect("save first sale");
    let second = sales
        .save(NewSale {
            product_id: ProductId(7),
            quantity: 5,
            unit_price: Decimal::new(999, 2),
            sale_date: date(2025, 5, 12),
        })
        .await
        .expect("save second sale");
    assert!(second.id > first.id);

    stock
        .save(NewStockSnapshot {
            product_id: ProductId(7),
            quantity_on_hand: 4,
            record_date: date(2025, 5, 13),
        })
        .await
        .expect("save snapshot");

    let listed = sales.list_sales_by_product(ProductId(7)).await.expect("list sales");
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].unit_price, Decimal::new(999, 2));

    // last sale 5, mean 7.5 * 1.5 = 11.25 -> 11, minus stock 4
    let suggestion = ReplenishmentEngine::default()
        .suggest(ProductId(7), sales.as_ref(), stock.as_ref())
        .await
        .expect("suggestion");
    assert_eq!(suggestion.method, ForecastMethod::FallbackInsufficientData);
    assert_eq!(suggestion.suggested_quantity, 7);
}

#[tokio::test]
async fn stock_dates_beyond_year_9999_are_refused_by_every_store() {
    let pool = migrated_pool().await;
    let sql = SqlStockRepository::new(pool.clone());
    let memory = InMemoryStockRepository::default();
    let far_future = NewStockSnapshot {
        product_id: ProductId(9),
        quantity_on_hand: 99,
        record_date: date(10000, 1, 1),
    };
    let ordinary = NewStockSnapshot {
        product_id: ProductId(9),
        quantity_on_hand: 1,
        record_date: date(2025, 1, 1),
    };

    for store in [&sql as &dyn StockRepository, &memory as &dyn StockRepository] {
        let refused = store.save(far_future.clone()).await.expect_err("five-digit year");
        assert!(matches!(refused, RepositoryError::Rejected(_)));
        store.save(ordinary.clone()).await.expect("save ordinary snapshot");

        let latest = store
            .latest_stock_by_product(ProductId(9))
            .await
            .expect("latest stock")
            .expect("snapshot present");
        assert_eq!(latest.quantity_on_hand, 1);
        assert_eq!(latest.record_date, date(2025, 1, 1));
    }
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let pool = migrated_pool().await;

    let error = ReplenishmentEngine::default()
        .suggest(
            ProductId(999),
            &SqlSaleRepository::new(pool.clone()),
            &SqlStockRepository::new(pool.clone()),
        )
        .await
        .expect_err("no history");

    assert_eq!(error, SuggestionError::NoSalesHistory { product_id: ProductId(999) });
}

#[tokio::test]
async fn closed_pool_surfaces_accessor_failure() {
    let pool = migrated_pool().await;
    let sales = SqlSaleRepository::new(pool.clone());
    let stock = SqlStockRepository::new(pool.clone());
    pool.close().await;

    let error = ReplenishmentEngine::default()
        .suggest(ProductId(101), &sales, &stock)
        .await
        .expect_err("closed pool");

    assert!(matches!(error, SuggestionError::Accessor(_)));
}
