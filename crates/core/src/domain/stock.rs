use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::ensure_record_date;
use crate::domain::product::ProductId;
use crate::errors::DomainError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StockRecordId(pub i64);

/// Point-in-time stock level for a product.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: StockRecordId,
    pub product_id: ProductId,
    pub quantity_on_hand: u32,
    pub record_date: NaiveDate,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewStockSnapshot {
    pub product_id: ProductId,
    pub quantity_on_hand: u32,
    pub record_date: NaiveDate,
}

impl NewStockSnapshot {
    pub fn new(
        product_id: ProductId,
        quantity_on_hand: u32,
        record_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        let record_date = ensure_record_date("record date", record_date)?;
        Ok(Self { product_id, quantity_on_hand, record_date })
    }

    pub fn into_record(self, id: StockRecordId) -> StockRecord {
        StockRecord {
            id,
            product_id: self.product_id,
            quantity_on_hand: self.quantity_on_hand,
            record_date: self.record_date,
        }
    }
}
