use std::collections::HashMap;

use tokio::sync::RwLock;

use restock_core::domain::ensure_record_date;
use restock_core::domain::product::ProductId;
use restock_core::domain::sale::{NewSale, SaleId, SaleRecord};
use restock_core::domain::stock::{NewStockSnapshot, StockRecord, StockRecordId};
use restock_core::errors::AccessorError;
use restock_core::history::{SalesHistory, StockLedger};

use super::{RepositoryError, SaleRepository, StockRepository};

#[derive(Default)]
pub struct InMemorySaleRepository {
    sales: RwLock<Vec<SaleRecord>>,
}

#[async_trait::async_trait]
impl SalesHistory for InMemorySaleRepository {
    async fn list_sales_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<SaleRecord>, AccessorError> {
        let sales = self.sales.read().await;
        Ok(sales.iter().filter(|sale| sale.product_id == product_id).cloned().collect())
    }
}

#[async_trait::async_trait]
impl SaleRepository for InMemorySaleRepository {
    async fn save(&self, sale: NewSale) -> Result<SaleRecord, RepositoryError> {
        ensure_record_date("sale date", sale.sale_date)?;
        let mut sales = self.sales.write().await;
        let record = sale.into_record(SaleId(sales.len() as i64 + 1));
        sales.push(record.clone());
        Ok(record)
    }
}

#[derive(Default)]
pub struct InMemoryStockRepository {
    snapshots: RwLock<HashMap<ProductId, Vec<StockRecord>>>,
    next_id: RwLock<i64>,
}

#[async_trait::async_trait]
impl StockLedger for InMemoryStockRepository {
    async fn latest_stock_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<StockRecord>, AccessorError> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots
            .get(&product_id)
            .and_then(|records| records.iter().max_by_key(|record| (record.record_date, record.id)))
            .cloned())
    }
}

#[async_trait::async_trait]
impl StockRepository for InMemoryStockRepository {
    async fn save(&self, snapshot: NewStockSnapshot) -> Result<StockRecord, RepositoryError> {
        ensure_record_date("record date", snapshot.record_date)?;
        let mut next_id = self.next_id.write().await;
        *next_id += 1;
        let record = snapshot.into_record(StockRecordId(*next_id));

        let mut snapshots = self.snapshots.write().await;
        snapshots.entry(record.product_id).or_default().push(record.clone());
        Ok(record)
    }
}
