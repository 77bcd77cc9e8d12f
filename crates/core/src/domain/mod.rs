pub mod product;
pub mod sale;
pub mod stock;

use chrono::{Datelike, NaiveDate};

use crate::errors::DomainError;

/// Years accepted on ingested records. Stored `YYYY-MM-DD` text only orders
/// chronologically while the year has exactly four digits.
pub const ACCEPTED_YEARS: std::ops::RangeInclusive<i32> = 1..=9999;

pub fn ensure_record_date(field: &str, date: NaiveDate) -> Result<NaiveDate, DomainError> {
    if ACCEPTED_YEARS.contains(&date.year()) {
        Ok(date)
    } else {
        Err(DomainError::InvariantViolation(format!(
            "{field} must fall between 0001-01-01 and 9999-12-31, got {date}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::ensure_record_date;

    #[test]
    fn record_dates_outside_four_digit_years_are_rejected() {
        let far_future = NaiveDate::from_ymd_opt(10000, 1, 1).expect("valid date");
        let before_common_era = NaiveDate::from_ymd_opt(0, 12, 31).expect("valid date");
        let last_accepted = NaiveDate::from_ymd_opt(9999, 12, 31).expect("valid date");

        assert!(ensure_record_date("data_venda", far_future).is_err());
        assert!(ensure_record_date("data_venda", before_common_era).is_err());
        assert_eq!(ensure_record_date("data_venda", last_accepted), Ok(last_accepted));
    }
}
