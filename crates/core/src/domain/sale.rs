use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::ensure_record_date;
use crate::domain::product::ProductId;
use crate::errors::DomainError;

/// Storage identity of a sale row. Ascending ids follow ingestion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SaleId(pub i64);

/// A single sale event as ingested. Never mutated after it is stored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleRecord {
    pub id: SaleId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub sale_date: NaiveDate,
}

/// A sale that has been validated but not yet assigned a storage id.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSale {
    pub product_id: ProductId,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub sale_date: NaiveDate,
}

impl NewSale {
    pub fn new(
        product_id: ProductId,
        quantity: u32,
        unit_price: Decimal,
        sale_date: NaiveDate,
    ) -> Result<Self, DomainError> {
        if unit_price.is_sign_negative() && !unit_price.is_zero() {
            return Err(DomainError::InvariantViolation(format!(
                "unit price must not be negative, got {unit_price}"
            )));
        }
        let sale_date = ensure_record_date("sale date", sale_date)?;
        Ok(Self { product_id, quantity, unit_price, sale_date })
    }

    pub fn into_record(self, id: SaleId) -> SaleRecord {
        SaleRecord {
            id,
            product_id: self.product_id,
            quantity: self.quantity,
            unit_price: self.unit_price,
            sale_date: self.sale_date,
        }
    }
}
