use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::Row;

use restock_core::domain::product::ProductId;
use restock_core::domain::sale::{NewSale, SaleId, SaleRecord};
use restock_core::errors::AccessorError;
use restock_core::history::SalesHistory;

use super::{decode_err, encode_date, RepositoryError, SaleRepository, DATE_FORMAT};
use crate::DbPool;

pub struct SqlSaleRepository {
    pool: DbPool,
}

impl SqlSaleRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn row_to_sale(row: &sqlx::sqlite::SqliteRow) -> Result<SaleRecord, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(decode_err)?;
    let product_id: i64 = row.try_get("product_id").map_err(decode_err)?;
    let quantity: i64 = row.try_get("quantity").map_err(decode_err)?;
    let unit_price: String = row.try_get("unit_price").map_err(decode_err)?;
    let sale_date: String = row.try_get("sale_date").map_err(decode_err)?;

    Ok(SaleRecord {
        id: SaleId(id),
        product_id: ProductId(product_id),
        quantity: u32::try_from(quantity)
            .map_err(|_| RepositoryError::Decode(format!("sale {id} has quantity {quantity}")))?,
        unit_price: Decimal::from_str(&unit_price).map_err(decode_err)?,
        sale_date: NaiveDate::parse_from_str(&sale_date, DATE_FORMAT).map_err(decode_err)?,
    })
}

impl SqlSaleRepository {
    async fn fetch_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<SaleRecord>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT id, product_id, quantity, unit_price, sale_date
             FROM sales_data
             WHERE product_id = ?
             ORDER BY id ASC",
        )
        .bind(product_id.0)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_sale).collect::<Result<Vec<_>, _>>()
    }
}

#[async_trait::async_trait]
impl SalesHistory for SqlSaleRepository {
    async fn list_sales_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<SaleRecord>, AccessorError> {
        Ok(self.fetch_by_product(product_id).await?)
    }
}

#[async_trait::async_trait]
impl SaleRepository for SqlSaleRepository {
    async fn save(&self, sale: NewSale) -> Result<SaleRecord, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO sales_data (product_id, quantity, unit_price, sale_date)
             VALUES (?, ?, ?, ?)",
        )
        .bind(sale.product_id.0)
        .bind(i64::from(sale.quantity))
        .bind(sale.unit_price.to_string())
        .bind(encode_date(sale.sale_date)?)
        .execute(&self.pool)
        .await?;

        Ok(sale.into_record(SaleId(result.last_insert_rowid())))
    }
}
