//! Purchase-quantity suggestions from weekly sales history.
//!
//! Sales are bucketed into Sunday-ending weeks. With enough weeks the
//! suggestion is the trailing moving average of weekly demand; otherwise a
//! fallback blends the last sale, the mean sale size and current stock.

mod engine;
mod types;
pub mod weekly;

pub use engine::ReplenishmentEngine;
pub use types::{ForecastMethod, Suggestion, SuggestionBasis};
pub use weekly::{trailing_average, week_ending, weekly_buckets, weeks_spanned, WeeklyBucket};

use serde::{Deserialize, Serialize};

use crate::errors::{DomainError, SuggestionError};

/// Result type for suggestion operations
pub type SuggestionResult<T> = Result<T, SuggestionError>;

/// Weeks in the trailing moving-average window
pub const DEFAULT_WINDOW_WEEKS: usize = 4;

/// Factor applied to the mean sale size when history is too short
pub const DEFAULT_FALLBACK_MULTIPLIER: f64 = 1.5;

/// Tunable parameters of the suggestion heuristic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReplenishmentPolicy {
    /// Number of most recent weekly buckets averaged; also the minimum
    /// history needed before the moving average is used.
    pub window_weeks: usize,
    /// Multiplier on the mean sale quantity in the fallback branch.
    pub fallback_multiplier: f64,
}

impl Default for ReplenishmentPolicy {
    fn default() -> Self {
        Self {
            window_weeks: DEFAULT_WINDOW_WEEKS,
            fallback_multiplier: DEFAULT_FALLBACK_MULTIPLIER,
        }
    }
}

impl ReplenishmentPolicy {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.window_weeks == 0 {
            return Err(DomainError::InvalidPolicy(
                "window_weeks must be greater than zero".to_string(),
            ));
        }
        if !self.fallback_multiplier.is_finite() || self.fallback_multiplier < 0.0 {
            return Err(DomainError::InvalidPolicy(format!(
                "fallback_multiplier must be a finite non-negative number, got {}",
                self.fallback_multiplier
            )));
        }
        Ok(())
    }
}

/// Rounds half away from zero and clamps to the non-negative range.
pub fn round_quantity(value: f64) -> u64 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round() as u64
}

#[cfg(test)]
mod tests {
    use super::{round_quantity, ReplenishmentPolicy};

    #[test]
    fn default_policy_uses_four_week_window() {
        let policy = ReplenishmentPolicy::default();
        assert_eq!(policy.window_weeks, 4);
        assert!((policy.fallback_multiplier - 1.5).abs() < f64::EPSILON);
        assert!(policy.validate().is_ok());
    }

    #[test]
    fn zero_window_is_rejected() {
        let policy = ReplenishmentPolicy { window_weeks: 0, ..ReplenishmentPolicy::default() };
        assert!(policy.validate().is_err());
    }

    #[test]
    fn negative_or_nan_multiplier_is_rejected() {
        let negative =
            ReplenishmentPolicy { fallback_multiplier: -0.5, ..ReplenishmentPolicy::default() };
        let nan =
            ReplenishmentPolicy { fallback_multiplier: f64::NAN, ..ReplenishmentPolicy::default() };
        assert!(negative.validate().is_err());
        assert!(nan.validate().is_err());
    }

    #[test]
    fn rounding_goes_half_away_from_zero() {
        assert_eq!(round_quantity(7.5), 8);
        assert_eq!(round_quantity(2.5), 3);
        assert_eq!(round_quantity(2.49), 2);
        assert_eq!(round_quantity(0.0), 0);
    }

    #[test]
    fn rounding_clamps_negative_and_non_finite_values() {
        assert_eq!(round_quantity(-3.7), 0);
        assert_eq!(round_quantity(f64::NAN), 0);
        assert_eq!(round_quantity(f64::NEG_INFINITY), 0);
    }
}
