use sqlx::Executor;

use restock_core::domain::product::ProductId;
use restock_core::replenishment::ForecastMethod;

use crate::connection::DbPool;
use crate::repositories::RepositoryError;

/// Demo history contract: one product per suggestion branch.
const DEMO_PRODUCTS: &[DemoProduct] = &[
    DemoProduct {
        product_id: ProductId(101),
        sale_ids: &[1, 2, 3, 4, 5, 6, 7],
        stock_ids: &[],
        expected_method: ForecastMethod::MovingAverage,
        expected_quantity: 15,
        description: "six weeks of sales, moving average over the last four",
    },
    DemoProduct {
        product_id: ProductId(202),
        sale_ids: &[8, 9],
        stock_ids: &[1],
        expected_method: ForecastMethod::FallbackInsufficientData,
        expected_quantity: 5,
        description: "single week of sales, low stock triggers a purchase",
    },
    DemoProduct {
        product_id: ProductId(303),
        sale_ids: &[10, 11, 12],
        stock_ids: &[2, 3],
        expected_method: ForecastMethod::FallbackInsufficientData,
        expected_quantity: 0,
        description: "three weeks of sales, latest stock covers fallback demand",
    },
];

/// Deterministic demo sales and stock history.
///
/// Rows carry explicit ids and are inserted with `INSERT OR IGNORE`, so
/// loading twice leaves the tables unchanged.
pub struct DemoDataset;

impl DemoDataset {
    pub const SQL: &str = include_str!("../../../config/fixtures/demo_history.sql");

    pub fn products() -> &'static [DemoProduct] {
        DEMO_PRODUCTS
    }

    pub async fn load(pool: &DbPool) -> Result<SeedResult, RepositoryError> {
        let mut tx = pool.begin().await?;
        tx.execute(sqlx::query(Self::SQL)).await?;
        tx.commit().await?;

        Ok(SeedResult { products_seeded: DEMO_PRODUCTS.iter().collect() })
    }

    /// Checks that every demo row exists under the expected product.
    pub async fn verify(pool: &DbPool) -> Result<VerificationResult, RepositoryError> {
        let mut checks = Vec::new();

        for product in DEMO_PRODUCTS {
            let sale_count = count_owned_rows(pool, "sales_data", product, product.sale_ids).await?;
            checks.push((product.sales_label(), sale_count == product.sale_ids.len() as i64));

            let stock_count =
                count_owned_rows(pool, "stock_data", product, product.stock_ids).await?;
            checks.push((product.stock_label(), stock_count == product.stock_ids.len() as i64));
        }

        let all_present = checks.iter().all(|(_, present)| *present);
        Ok(VerificationResult { all_present, checks })
    }

    /// Removes the demo rows, leaving anything ingested afterwards in place.
    pub async fn clean(pool: &DbPool) -> Result<(), RepositoryError> {
        let mut tx = pool.begin().await?;

        let sale_ids = sql_id_list(DEMO_PRODUCTS.iter().flat_map(|product| product.sale_ids));
        let stock_ids = sql_id_list(DEMO_PRODUCTS.iter().flat_map(|product| product.stock_ids));

        sqlx::query(&format!("DELETE FROM sales_data WHERE id IN {sale_ids}"))
            .execute(&mut *tx)
            .await?;
        sqlx::query(&format!("DELETE FROM stock_data WHERE id IN {stock_ids}"))
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }
}

async fn count_owned_rows(
    pool: &DbPool,
    table: &str,
    product: &DemoProduct,
    ids: &[i64],
) -> Result<i64, RepositoryError> {
    if ids.is_empty() {
        return Ok(0);
    }
    let id_list = sql_id_list(ids);
    let count: i64 = sqlx::query_scalar(&format!(
        "SELECT COUNT(1) FROM {table} WHERE product_id = ?1 AND id IN {id_list}"
    ))
    .bind(product.product_id.0)
    .fetch_one(pool)
    .await?;
    Ok(count)
}

fn sql_id_list<'a>(ids: impl IntoIterator<Item = &'a i64>) -> String {
    let joined = ids.into_iter().map(i64::to_string).collect::<Vec<_>>().join(",");
    format!("({joined})")
}

#[derive(Debug, Clone, Copy)]
pub struct DemoProduct {
    pub product_id: ProductId,
    sale_ids: &'static [i64],
    stock_ids: &'static [i64],
    pub expected_method: ForecastMethod,
    pub expected_quantity: u64,
    pub description: &'static str,
}

impl DemoProduct {
    fn sales_label(&self) -> &'static str {
        match self.product_id.0 {
            101 => "sales-101",
            202 => "sales-202",
            _ => "sales-303",
        }
    }

    fn stock_label(&self) -> &'static str {
        match self.product_id.0 {
            101 => "stock-101",
            202 => "stock-202",
            _ => "stock-303",
        }
    }
}

#[derive(Debug)]
pub struct SeedResult {
    pub products_seeded: Vec<&'static DemoProduct>,
}

#[derive(Debug)]
pub struct VerificationResult {
    pub all_present: bool,
    pub checks: Vec<(&'static str, bool)>,
}
