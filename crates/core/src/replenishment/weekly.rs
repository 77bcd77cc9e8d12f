//! Weekly bucketing of sale events.

use std::collections::BTreeMap;

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::domain::sale::SaleRecord;

/// Total quantity sold in the week ending on `week_end_date` (a Sunday).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyBucket {
    pub week_end_date: NaiveDate,
    pub summed_quantity: u64,
}

/// The Sunday that closes the week containing `date`.
pub fn week_ending(date: NaiveDate) -> NaiveDate {
    let days_to_sunday = 6 - date.weekday().num_days_from_monday();
    date.checked_add_days(Days::new(u64::from(days_to_sunday))).unwrap_or(NaiveDate::MAX)
}

/// Number of weeks from the first sale's week to the last, inclusive.
///
/// Counted arithmetically, so a wide gap between two sales costs nothing.
pub fn weeks_spanned(sales: &[SaleRecord]) -> usize {
    let Some((first, last)) = date_span(sales) else {
        return 0;
    };
    let days = week_ending(last).signed_duration_since(week_ending(first)).num_days();
    usize::try_from(days / 7 + 1).unwrap_or(usize::MAX)
}

/// The most recent `limit` weeks of the dense, ascending weekly grid.
///
/// Weeks inside the span with no sales appear with a zero sum. Input order
/// does not matter. Only the trailing slots are materialized.
pub fn weekly_buckets(sales: &[SaleRecord], limit: usize) -> Vec<WeeklyBucket> {
    let Some((_, last)) = date_span(sales) else {
        return Vec::new();
    };

    let last_week = week_ending(last);
    let mut grid = BTreeMap::new();
    for offset in 0..weeks_spanned(sales).min(limit) {
        let Some(week) = u64::try_from(offset)
            .ok()
            .and_then(|offset| last_week.checked_sub_days(Days::new(offset * 7)))
        else {
            break;
        };
        grid.insert(week, 0u64);
    }

    for sale in sales {
        if let Some(sum) = grid.get_mut(&week_ending(sale.sale_date)) {
            *sum += u64::from(sale.quantity);
        }
    }

    grid.into_iter()
        .map(|(week_end_date, summed_quantity)| WeeklyBucket { week_end_date, summed_quantity })
        .collect()
}

fn date_span(sales: &[SaleRecord]) -> Option<(NaiveDate, NaiveDate)> {
    let first = sales.iter().map(|sale| sale.sale_date).min()?;
    let last = sales.iter().map(|sale| sale.sale_date).max()?;
    Some((first, last))
}

/// Mean of the last `window` bucket sums, or `None` when fewer buckets exist.
pub fn trailing_average(buckets: &[WeeklyBucket], window: usize) -> Option<f64> {
    if window == 0 || buckets.len() < window {
        return None;
    }
    let total: u64 =
        buckets[buckets.len() - window..].iter().map(|bucket| bucket.summed_quantity).sum();
    Some(total as f64 / window as f64)
}
