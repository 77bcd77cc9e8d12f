//! Types produced by the replenishment engine

use serde::{Deserialize, Serialize};

use crate::domain::product::ProductId;

/// Which branch of the heuristic produced a suggestion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForecastMethod {
    /// Trailing average of weekly demand
    MovingAverage,
    /// Too few weeks of history; last-sale/mean heuristic blended with stock
    FallbackInsufficientData,
}

impl ForecastMethod {
    pub fn label(&self) -> &'static str {
        match self {
            Self::MovingAverage => "moving_average",
            Self::FallbackInsufficientData => "fallback_insufficient_data",
        }
    }
}

/// The figures a branch used, kept so callers can render their own wording
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SuggestionBasis {
    MovingAverage {
        /// Weeks averaged
        window_weeks: usize,
        /// Unrounded average weekly quantity
        weekly_average: f64,
    },
    Fallback {
        /// Weekly buckets available, below the window size
        weeks_observed: usize,
        /// max(last sale, rounded mean × multiplier)
        fallback_quantity: u64,
        /// Latest stock on hand, 0 when no snapshot exists
        current_stock: u64,
    },
}

/// A purchase-quantity suggestion for one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Product the suggestion is for
    pub product_id: ProductId,
    /// Units to purchase, never negative
    pub suggested_quantity: u64,
    /// Branch that produced the quantity
    pub method: ForecastMethod,
    /// Human-readable explanation
    pub note: String,
    /// Inputs behind the quantity
    pub basis: SuggestionBasis,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{ForecastMethod, Suggestion, SuggestionBasis};
    use crate::domain::product::ProductId;

    #[test]
    fn suggestion_serializes_with_stable_labels() {
        let suggestion = Suggestion {
            product_id: ProductId(101),
            suggested_quantity: 8,
            method: ForecastMethod::FallbackInsufficientData,
            note: "Insufficient data (1 weeks).".to_string(),
            basis: SuggestionBasis::Fallback {
                weeks_observed: 1,
                fallback_quantity: 8,
                current_stock: 0,
            },
        };

        let value = serde_json::to_value(&suggestion).expect("serialize suggestion");

        assert_eq!(value["product_id"], json!(101));
        assert_eq!(value["method"], json!(ForecastMethod::FallbackInsufficientData.label()));
        assert_eq!(value["basis"]["kind"], json!("fallback"));
        assert_eq!(value["basis"]["fallback_quantity"], json!(8));
    }
}
