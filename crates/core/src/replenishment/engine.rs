//! Replenishment engine implementation

use crate::domain::product::ProductId;
use crate::domain::sale::SaleRecord;
use crate::errors::{DomainError, SuggestionError};
use crate::history::{SalesHistory, StockLedger};

use super::types::{ForecastMethod, Suggestion, SuggestionBasis};
use super::weekly::{trailing_average, weekly_buckets, weeks_spanned};
use super::{round_quantity, ReplenishmentPolicy, SuggestionResult};

/// Computes purchase suggestions from sales and stock history.
///
/// Holds no per-request state; one instance can serve concurrent callers.
#[derive(Debug, Clone, Default)]
pub struct ReplenishmentEngine {
    policy: ReplenishmentPolicy,
}

impl ReplenishmentEngine {
    pub fn new(policy: ReplenishmentPolicy) -> Result<Self, DomainError> {
        policy.validate()?;
        Ok(Self { policy })
    }

    pub fn policy(&self) -> &ReplenishmentPolicy {
        &self.policy
    }

    /// Suggest how many units of `product_id` to buy.
    ///
    /// Stock is only looked up when the fallback branch runs.
    pub async fn suggest<S, L>(
        &self,
        product_id: ProductId,
        sales: &S,
        stock: &L,
    ) -> SuggestionResult<Suggestion>
    where
        S: SalesHistory + ?Sized,
        L: StockLedger + ?Sized,
    {
        let records = sales.list_sales_by_product(product_id).await?;
        if records.is_empty() {
            return Err(SuggestionError::NoSalesHistory { product_id });
        }

        let window_weeks = self.policy.window_weeks;
        let weeks_observed = weeks_spanned(&records);
        let buckets = weekly_buckets(&records, window_weeks);

        if let Some(weekly_average) = trailing_average(&buckets, window_weeks) {
            return Ok(Suggestion {
                product_id,
                suggested_quantity: round_quantity(weekly_average),
                method: ForecastMethod::MovingAverage,
                note: "Suggestion based on historical weekly consumption.".to_string(),
                basis: SuggestionBasis::MovingAverage { window_weeks, weekly_average },
            });
        }

        let fallback_quantity = self.fallback_quantity(&records);
        let current_stock = stock
            .latest_stock_by_product(product_id)
            .await?
            .map(|record| u64::from(record.quantity_on_hand))
            .unwrap_or(0);

        let (suggested_quantity, note) = if current_stock >= fallback_quantity {
            (
                0,
                format!(
                    "Insufficient data ({weeks_observed} weeks). Current stock ({current_stock} units) already covers fallback demand."
                ),
            )
        } else {
            (
                fallback_quantity - current_stock,
                format!(
                    "Insufficient data ({weeks_observed} weeks). Suggestion based on last sale/simple average ({fallback_quantity} units) minus current stock ({current_stock} units)."
                ),
            )
        };

        Ok(Suggestion {
            product_id,
            suggested_quantity,
            method: ForecastMethod::FallbackInsufficientData,
            note,
            basis: SuggestionBasis::Fallback { weeks_observed, fallback_quantity, current_stock },
        })
    }

    /// max(last sale quantity, rounded mean sale quantity × multiplier)
    fn fallback_quantity(&self, records: &[SaleRecord]) -> u64 {
        let last_sale_quantity = last_sale(records).map(|sale| u64::from(sale.quantity)).unwrap_or(0);
        let scaled_mean = mean_quantity(records) * self.policy.fallback_multiplier;
        last_sale_quantity.max(round_quantity(scaled_mean))
    }
}

/// Latest sale by date; among same-day sales the one ingested last wins.
fn last_sale(records: &[SaleRecord]) -> Option<&SaleRecord> {
    records.iter().enumerate().max_by_key(|(position, sale)| (sale.sale_date, *position)).map(
        |(_, sale)| sale,
    )
}

fn mean_quantity(records: &[SaleRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }
    let total: u64 = records.iter().map(|sale| u64::from(sale.quantity)).sum();
    total as f64 / records.len() as f64
}
