use chrono::NaiveDate;
use sqlx::Row;

use restock_core::domain::product::ProductId;
use restock_core::domain::stock::{NewStockSnapshot, StockRecord, StockRecordId};
use restock_core::errors::AccessorError;
use restock_core::history::StockLedger;

use super::{decode_err, encode_date, RepositoryError, StockRepository, DATE_FORMAT};
use crate::DbPool;

pub struct SqlStockRepository {
    pool: DbPool,
}

impl SqlStockRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    async fn fetch_latest(
        &self,
        product_id: ProductId,
    ) -> Result<Option<StockRecord>, RepositoryError> {
        let row = sqlx::query(
            "SELECT id, product_id, quantity_on_hand, record_date
             FROM stock_data
             WHERE product_id = ?
             ORDER BY record_date DESC, id DESC
             LIMIT 1",
        )
        .bind(product_id.0)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_stock).transpose()
    }
}

fn row_to_stock(row: &sqlx::sqlite::SqliteRow) -> Result<StockRecord, RepositoryError> {
    let id: i64 = row.try_get("id").map_err(decode_err)?;
    let product_id: i64 = row.try_get("product_id").map_err(decode_err)?;
    let quantity_on_hand: i64 = row.try_get("quantity_on_hand").map_err(decode_err)?;
    let record_date: String = row.try_get("record_date").map_err(decode_err)?;

    Ok(StockRecord {
        id: StockRecordId(id),
        product_id: ProductId(product_id),
        quantity_on_hand: u32::try_from(quantity_on_hand).map_err(|_| {
            RepositoryError::Decode(format!("stock record {id} has quantity {quantity_on_hand}"))
        })?,
        record_date: NaiveDate::parse_from_str(&record_date, DATE_FORMAT).map_err(decode_err)?,
    })
}

#[async_trait::async_trait]
impl StockLedger for SqlStockRepository {
    async fn latest_stock_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<StockRecord>, AccessorError> {
        Ok(self.fetch_latest(product_id).await?)
    }
}

#[async_trait::async_trait]
impl StockRepository for SqlStockRepository {
    async fn save(&self, snapshot: NewStockSnapshot) -> Result<StockRecord, RepositoryError> {
        let result = sqlx::query(
            "INSERT INTO stock_data (product_id, quantity_on_hand, record_date)
             VALUES (?, ?, ?)",
        )
        .bind(snapshot.product_id.0)
        .bind(i64::from(snapshot.quantity_on_hand))
        .bind(encode_date(snapshot.record_date)?)
        .execute(&self.pool)
        .await?;

        Ok(snapshot.into_record(StockRecordId(result.last_insert_rowid())))
    }
}
