//! Read-only accessors the replenishment engine consumes.
//!
//! Persistence lives in `restock-db`; tests and tools can plug in any
//! implementation that honours these two lookups.

use async_trait::async_trait;

use crate::domain::product::ProductId;
use crate::domain::sale::SaleRecord;
use crate::domain::stock::StockRecord;
use crate::errors::AccessorError;

#[async_trait]
pub trait SalesHistory: Send + Sync {
    /// All sales for the product in ingestion order.
    async fn list_sales_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Vec<SaleRecord>, AccessorError>;
}

#[async_trait]
pub trait StockLedger: Send + Sync {
    /// The snapshot with the latest `record_date`; later ingestion wins a tie.
    async fn latest_stock_by_product(
        &self,
        product_id: ProductId,
    ) -> Result<Option<StockRecord>, AccessorError>;
}
