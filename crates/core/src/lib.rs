pub mod config;
pub mod domain;
pub mod errors;
pub mod history;
pub mod replenishment;

pub use domain::product::ProductId;
pub use domain::sale::{NewSale, SaleId, SaleRecord};
pub use domain::stock::{NewStockSnapshot, StockRecord, StockRecordId};
pub use errors::{AccessorError, DomainError, InterfaceError, SuggestionError};
pub use history::{SalesHistory, StockLedger};
pub use replenishment::{
    ForecastMethod, ReplenishmentEngine, ReplenishmentPolicy, Suggestion, SuggestionBasis,
    WeeklyBucket,
};
