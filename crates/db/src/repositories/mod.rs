use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

use restock_core::domain::ensure_record_date;
use restock_core::domain::sale::{NewSale, SaleRecord};
use restock_core::domain::stock::{NewStockSnapshot, StockRecord};
use restock_core::errors::{AccessorError, DomainError};
use restock_core::history::{SalesHistory, StockLedger};

pub mod memory;
pub mod sale;
pub mod stock;

pub use memory::{InMemorySaleRepository, InMemoryStockRepository};
pub use sale::SqlSaleRepository;
pub use stock::SqlStockRepository;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("decode error: {0}")]
    Decode(String),
    #[error("rejected record: {0}")]
    Rejected(#[from] DomainError),
}

impl From<RepositoryError> for AccessorError {
    fn from(value: RepositoryError) -> Self {
        AccessorError(value.to_string())
    }
}

/// Sale history storage: append-only ingestion plus the engine's read path.
#[async_trait]
pub trait SaleRepository: SalesHistory {
    async fn save(&self, sale: NewSale) -> Result<SaleRecord, RepositoryError>;
}

/// Stock snapshot storage: append-only ingestion plus the engine's read path.
#[async_trait]
pub trait StockRepository: StockLedger {
    async fn save(&self, snapshot: NewStockSnapshot) -> Result<StockRecord, RepositoryError>;
}

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";

/// Text encoding for date columns; refuses years that would break lexical order.
pub(crate) fn encode_date(date: NaiveDate) -> Result<String, RepositoryError> {
    Ok(ensure_record_date("date column", date)?.format(DATE_FORMAT).to_string())
}

pub(crate) fn decode_err(error: impl std::fmt::Display) -> RepositoryError {
    RepositoryError::Decode(error.to_string())
}
